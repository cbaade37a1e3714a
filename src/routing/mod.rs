//! Call routing pipeline.
//!
//! Every inbound webhook event flows through:
//! 1. `classifier::classify()`: is this a new inbound call?
//! 2. `contacts::find_contact()`: caller's CRM contact and owner id
//! 3. `agents::resolve_owner_email()` + `agents::find_available_agent()`
//! 4. `forwarder::forward()`: transfer to the agent
//!
//! `router::CallRouter` strings the stages together. Each event is handled
//! independently; nothing is kept between events.

pub mod agents;
pub mod classifier;
pub mod contacts;
pub mod forwarder;
pub mod router;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use router::CallRouter;
