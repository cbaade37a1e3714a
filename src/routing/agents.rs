//! Agent resolver: CRM owner to an available telephony user.
//!
//! Two steps, both required:
//! 1. `resolve_owner_email()`: owner id → email (CRM)
//! 2. `find_available_agent()`: email → telephony user id, checking live
//!    availability against the full directory listing

use tracing::{info, warn};

use crate::crm::ContactDirectory;
use crate::routing::types::{AgentLookup, OwnerLookup};
use crate::telephony::CallPlatform;

/// Resolve a CRM owner id to the owner's email address.
pub async fn resolve_owner_email(crm: &dyn ContactDirectory, owner_id: &str) -> OwnerLookup {
    match crm.get_owner(owner_id).await {
        Ok(owner) => match owner.email.filter(|email| !email.is_empty()) {
            Some(email) => {
                info!(owner_id, email = %email, "Owner on HubSpot found");
                OwnerLookup::Found(email)
            }
            None => {
                warn!(owner_id, "HubSpot owner has no email address");
                OwnerLookup::LookupFailed(format!("owner {owner_id} has no email"))
            }
        },
        Err(e) => {
            warn!(owner_id, error = %e, "HubSpot owner lookup failed");
            OwnerLookup::LookupFailed(e.to_string())
        }
    }
}

/// Find the telephony user with exactly `agent_email` and check that they
/// can take a call right now.
///
/// Matching is case-sensitive string equality; the first match wins.
pub async fn find_available_agent(telephony: &dyn CallPlatform, agent_email: &str) -> AgentLookup {
    let users = match telephony.list_users().await {
        Ok(users) => users,
        Err(e) => {
            warn!(email = agent_email, error = %e, "Aircall user listing failed");
            return AgentLookup::LookupFailed(e.to_string());
        }
    };

    let Some(agent) = users.into_iter().find(|user| user.email == agent_email) else {
        info!(email = agent_email, "No agent found on Aircall, aborting redirection");
        return AgentLookup::NotFound;
    };

    info!(
        agent_id = %agent.id,
        available = agent.available,
        availability_status = %agent.availability_status,
        "Agent availability"
    );

    if !agent.can_take_calls() {
        info!(agent_id = %agent.id, "Agent not available, aborting redirection");
        return AgentLookup::Unavailable;
    }

    AgentLookup::Available(agent.id)
}
