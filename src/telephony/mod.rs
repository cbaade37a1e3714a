//! Telephony provider access: user directory and call transfers.

pub mod aircall;

pub use aircall::AircallClient;

use async_trait::async_trait;

use crate::error::TelephonyError;
use crate::routing::types::{TelephonyAgent, TransferCommand};

/// The telephony operations the router needs.
#[async_trait]
pub trait CallPlatform: Send + Sync {
    /// Every user in the directory.
    async fn list_users(&self) -> Result<Vec<TelephonyAgent>, TelephonyError>;

    /// Redirect an in-progress call to a user.
    ///
    /// Called at most once per webhook event and never retried.
    async fn transfer_call(&self, command: &TransferCommand) -> Result<(), TelephonyError>;
}
