//! Contact resolver: phone number to CRM contact and owner.

use tracing::{info, warn};

use crate::crm::ContactDirectory;
use crate::routing::types::ContactLookup;

/// Look up the caller in the CRM.
///
/// `phone` must already be normalized. Transport and parse failures are
/// folded into [`ContactLookup::LookupFailed`].
pub async fn find_contact(crm: &dyn ContactDirectory, phone: &str) -> ContactLookup {
    let contact = match crm.search_contact_by_phone(phone).await {
        Ok(Some(contact)) => contact,
        Ok(None) => {
            info!(phone, "User not found on HubSpot, aborting redirection");
            return ContactLookup::NotFound;
        }
        Err(e) => {
            warn!(phone, error = %e, "HubSpot contact search failed");
            return ContactLookup::LookupFailed(e.to_string());
        }
    };

    info!(first_name = %contact.first_name, "User found on HubSpot");

    if contact.owner_id.is_none() {
        info!(
            first_name = %contact.first_name,
            "User has no owner assigned on HubSpot, aborting redirection"
        );
        return ContactLookup::OwnerMissing;
    }

    ContactLookup::Found(contact)
}
