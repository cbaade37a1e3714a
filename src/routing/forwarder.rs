//! Call forwarder: the pipeline's only externally visible action.

use tracing::{info, warn};

use crate::routing::types::{ForwardResult, TransferCommand};
use crate::telephony::CallPlatform;

/// Transfer `call_id` to `agent_id`. Issued once, never retried.
pub async fn forward(telephony: &dyn CallPlatform, call_id: &str, agent_id: &str) -> ForwardResult {
    let command = TransferCommand {
        call_id: call_id.to_string(),
        target_agent_id: agent_id.to_string(),
    };

    match telephony.transfer_call(&command).await {
        Ok(()) => {
            info!(call_id, agent_id, "Call {call_id} transferred to {agent_id}");
            ForwardResult::Sent
        }
        Err(e) => {
            warn!(call_id, agent_id, error = %e, "Call transfer rejected");
            ForwardResult::Failed(e.to_string())
        }
    }
}
