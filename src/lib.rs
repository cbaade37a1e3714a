//! Call relay: forwards inbound Aircall calls to the caller's HubSpot owner.

pub mod config;
pub mod crm;
pub mod error;
pub mod routing;
pub mod server;
pub mod telephony;
