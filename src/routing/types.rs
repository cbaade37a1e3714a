//! Shared types for the call routing pipeline.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ── Inbound webhook ─────────────────────────────────────────────────

/// Raw webhook body as posted by Aircall.
///
/// Only the fields the router reads are modelled; everything else in the
/// payload is ignored. Missing `data` fields default to empty so that
/// events we do not route still parse.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub event: String,
    #[serde(default)]
    pub data: WebhookCallData,
}

/// The `data` object of a call webhook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookCallData {
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub raw_digits: String,
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
}

/// Direction of a call as reported by the telephony provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallDirection {
    Inbound,
    Outbound,
    Other(String),
}

impl From<String> for CallDirection {
    fn from(value: String) -> Self {
        match value.as_str() {
            "inbound" => Self::Inbound,
            "outbound" => Self::Outbound,
            _ => Self::Other(value),
        }
    }
}

impl From<CallDirection> for String {
    fn from(value: CallDirection) -> Self {
        value.to_string()
    }
}

impl fmt::Display for CallDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inbound => f.write_str("inbound"),
            Self::Outbound => f.write_str("outbound"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

/// A single webhook event, owned by the task handling it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEvent {
    /// Event name, e.g. `call.created`.
    pub event_type: String,
    pub direction: CallDirection,
    /// Caller number exactly as received (may contain spaces).
    pub raw_caller_number: String,
    pub call_id: String,
}

impl From<WebhookPayload> for WebhookEvent {
    fn from(payload: WebhookPayload) -> Self {
        Self {
            event_type: payload.event,
            direction: CallDirection::from(payload.data.direction),
            raw_caller_number: payload.data.raw_digits,
            call_id: payload.data.id,
        }
    }
}

// ── CRM records ─────────────────────────────────────────────────────

/// A CRM contact matched by phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub first_name: String,
    /// CRM owner id. `None` when no owner is assigned.
    pub owner_id: Option<String>,
}

/// The CRM user a contact is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub email: Option<String>,
}

// ── Telephony records ───────────────────────────────────────────────

/// Status string Aircall reports for a user who can take calls.
pub const AVAILABLE_STATUS: &str = "available";

/// A user in the telephony provider's directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelephonyAgent {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub availability_status: String,
}

impl TelephonyAgent {
    /// Both the boolean flag and the granular status must agree.
    pub fn can_take_calls(&self) -> bool {
        self.available && self.availability_status == AVAILABLE_STATUS
    }
}

/// Redirect `call_id` to `target_agent_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCommand {
    pub call_id: String,
    pub target_agent_id: String,
}

// ── Stage results ───────────────────────────────────────────────────

/// Event classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Route,
    IgnoreDirection,
    IgnoreEventType,
}

/// Contact resolver output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactLookup {
    Found(Contact),
    NotFound,
    OwnerMissing,
    LookupFailed(String),
}

/// Owner email resolution output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerLookup {
    Found(String),
    LookupFailed(String),
}

/// Agent resolver output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentLookup {
    Available(String),
    NotFound,
    Unavailable,
    LookupFailed(String),
}

/// Call forwarder output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardResult {
    Sent,
    Failed(String),
}

// ── Pipeline outcome ────────────────────────────────────────────────

/// Why a pipeline run stopped before forwarding the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    IgnoredEventType(String),
    IgnoredDirection(String),
    MissingCallId,
    MissingCallerNumber,
    ContactNotFound,
    OwnerMissing,
    AgentNotFound,
    AgentUnavailable,
    ContactLookupFailed(String),
    OwnerLookupFailed(String),
    AgentLookupFailed(String),
    TransferFailed(String),
}

impl AbortReason {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::IgnoredEventType(_) => "ignored_event_type",
            Self::IgnoredDirection(_) => "ignored_direction",
            Self::MissingCallId => "missing_call_id",
            Self::MissingCallerNumber => "missing_caller_number",
            Self::ContactNotFound => "contact_not_found",
            Self::OwnerMissing => "owner_missing",
            Self::AgentNotFound => "agent_not_found",
            Self::AgentUnavailable => "agent_unavailable",
            Self::ContactLookupFailed(_) => "contact_lookup_failed",
            Self::OwnerLookupFailed(_) => "owner_lookup_failed",
            Self::AgentLookupFailed(_) => "agent_lookup_failed",
            Self::TransferFailed(_) => "transfer_failed",
        }
    }
}

/// Terminal state of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingOutcome {
    Forwarded { call_id: String, agent_id: String },
    Aborted(AbortReason),
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Accept ids sent either as JSON strings or numbers.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
