//! CRM access: contact search and owner lookup.

pub mod hubspot;

pub use hubspot::HubspotClient;

use async_trait::async_trait;

use crate::error::CrmError;
use crate::routing::types::{Contact, Owner};

/// The CRM operations the router needs.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// First contact whose `phone` property equals `phone`, if any.
    async fn search_contact_by_phone(&self, phone: &str) -> Result<Option<Contact>, CrmError>;

    /// Fetch an owner record by id.
    async fn get_owner(&self, owner_id: &str) -> Result<Owner, CrmError>;
}
