//! Event classifier: decides whether a webhook is a call worth routing.

use crate::routing::types::{CallDirection, Decision, WebhookEvent};

/// The only event type the router acts on.
pub const CALL_CREATED: &str = "call.created";

/// Classify a webhook event. Pure; callers log the ignored cases.
pub fn classify(event: &WebhookEvent) -> Decision {
    if event.event_type != CALL_CREATED {
        return Decision::IgnoreEventType;
    }
    if event.direction != CallDirection::Inbound {
        return Decision::IgnoreDirection;
    }
    Decision::Route
}

/// Strip every whitespace character from a phone number.
pub fn normalize_phone_number(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}
