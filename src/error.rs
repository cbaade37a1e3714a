//! Error types for the call relay.

/// Top-level error type for the relay.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("CRM error: {0}")]
    Crm(#[from] CrmError),

    #[error("Telephony error: {0}")]
    Telephony(#[from] TelephonyError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors talking to the CRM (HubSpot).
#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    #[error("CRM request {operation} failed: {reason}")]
    RequestFailed { operation: String, reason: String },

    #[error("CRM request {operation} returned HTTP {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Invalid CRM response for {operation}: {reason}")]
    InvalidResponse { operation: String, reason: String },
}

/// Errors talking to the telephony provider (Aircall).
#[derive(Debug, thiserror::Error)]
pub enum TelephonyError {
    #[error("Telephony request {operation} failed: {reason}")]
    RequestFailed { operation: String, reason: String },

    #[error("Telephony request {operation} returned HTTP {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Invalid telephony response for {operation}: {reason}")]
    InvalidResponse { operation: String, reason: String },
}

/// Result type alias for the relay.
pub type Result<T> = std::result::Result<T, Error>;
