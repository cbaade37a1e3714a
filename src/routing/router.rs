//! Call router: runs one webhook event through every stage.
//!
//! Flow:
//! 1. Classify the event → may short-circuit
//! 2. Find the caller's CRM contact and owner
//! 3. Resolve the owner's email, then an available telephony agent
//! 4. Forward the call
//!
//! Every stop is an [`AbortReason`]; nothing is returned as an error.

use std::sync::Arc;

use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::crm::ContactDirectory;
use crate::routing::agents::{find_available_agent, resolve_owner_email};
use crate::routing::classifier::{classify, normalize_phone_number};
use crate::routing::contacts::find_contact;
use crate::routing::forwarder::forward;
use crate::routing::types::{
    AbortReason, AgentLookup, ContactLookup, Decision, ForwardResult, OwnerLookup,
    RoutingOutcome, WebhookEvent,
};
use crate::telephony::CallPlatform;

/// Routes inbound calls to the CRM owner's telephony agent.
///
/// Holds no per-call state; one instance serves every concurrent event.
pub struct CallRouter {
    crm: Arc<dyn ContactDirectory>,
    telephony: Arc<dyn CallPlatform>,
}

impl CallRouter {
    pub fn new(crm: Arc<dyn ContactDirectory>, telephony: Arc<dyn CallPlatform>) -> Self {
        Self { crm, telephony }
    }

    /// Run the full pipeline for one event.
    pub async fn route(&self, event: WebhookEvent) -> RoutingOutcome {
        let span = info_span!(
            "route_call",
            event_id = %Uuid::new_v4(),
            call_id = %event.call_id
        );

        async move {
            let outcome = self.run(&event).await;
            match &outcome {
                RoutingOutcome::Forwarded { .. } => info!("Routing finished"),
                RoutingOutcome::Aborted(reason) => {
                    info!(reason = reason.label(), "Routing aborted")
                }
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run(&self, event: &WebhookEvent) -> RoutingOutcome {
        // Step 1: classify
        match classify(event) {
            Decision::Route => {}
            Decision::IgnoreDirection => {
                info!(direction = %event.direction, "Event direction non-handled");
                return abort(AbortReason::IgnoredDirection(event.direction.to_string()));
            }
            Decision::IgnoreEventType => {
                info!(event = %event.event_type, "Event non-handled");
                return abort(AbortReason::IgnoredEventType(event.event_type.clone()));
            }
        }

        // Missing `data` fields deserialize to empty strings
        if event.call_id.trim().is_empty() {
            warn!("Inbound call event has no call id");
            return abort(AbortReason::MissingCallId);
        }

        let phone = normalize_phone_number(&event.raw_caller_number);
        if phone.is_empty() {
            warn!("Inbound call event has no caller number");
            return abort(AbortReason::MissingCallerNumber);
        }
        info!(phone = %phone, "Inbound call");

        // Step 2: contact and owner id
        let owner_id = match find_contact(self.crm.as_ref(), &phone).await {
            ContactLookup::Found(contact) => match contact.owner_id {
                Some(owner_id) => owner_id,
                None => return abort(AbortReason::OwnerMissing),
            },
            ContactLookup::NotFound => return abort(AbortReason::ContactNotFound),
            ContactLookup::OwnerMissing => return abort(AbortReason::OwnerMissing),
            ContactLookup::LookupFailed(reason) => {
                return abort(AbortReason::ContactLookupFailed(reason));
            }
        };

        // Step 3: owner email, then telephony agent
        let email = match resolve_owner_email(self.crm.as_ref(), &owner_id).await {
            OwnerLookup::Found(email) => email,
            OwnerLookup::LookupFailed(reason) => {
                return abort(AbortReason::OwnerLookupFailed(reason));
            }
        };

        let agent_id = match find_available_agent(self.telephony.as_ref(), &email).await {
            AgentLookup::Available(agent_id) => agent_id,
            AgentLookup::NotFound => return abort(AbortReason::AgentNotFound),
            AgentLookup::Unavailable => return abort(AbortReason::AgentUnavailable),
            AgentLookup::LookupFailed(reason) => {
                return abort(AbortReason::AgentLookupFailed(reason));
            }
        };

        // Step 4: forward
        info!(agent_id = %agent_id, "Agent found on Aircall, transferring call");
        match forward(self.telephony.as_ref(), &event.call_id, &agent_id).await {
            ForwardResult::Sent => RoutingOutcome::Forwarded {
                call_id: event.call_id.clone(),
                agent_id,
            },
            ForwardResult::Failed(reason) => abort(AbortReason::TransferFailed(reason)),
        }
    }
}

fn abort(reason: AbortReason) -> RoutingOutcome {
    RoutingOutcome::Aborted(reason)
}
