//! HTTP surface: the Aircall webhook endpoint and a health check.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::RelayConfig;
use crate::crm::HubspotClient;
use crate::error::Result;
use crate::routing::CallRouter;
use crate::routing::types::{RoutingOutcome, WebhookEvent, WebhookPayload};
use crate::telephony::AircallClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<CallRouter>,
}

/// Build the Axum router with the webhook and health routes.
pub fn relay_routes(router: Arc<CallRouter>) -> Router {
    let state = AppState { router };

    Router::new()
        .route("/", get(health))
        .route("/aircall/calls", post(aircall_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire the HubSpot and Aircall clients into a [`CallRouter`].
pub fn build_call_router(config: &RelayConfig) -> Result<CallRouter> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.http_timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build()?;

    let crm = Arc::new(HubspotClient::new(&config.hubspot, client.clone()));
    let telephony = Arc::new(AircallClient::new(&config.aircall, client));
    Ok(CallRouter::new(crm, telephony))
}

/// Bind and serve until ctrl-c.
pub async fn serve(config: RelayConfig) -> Result<()> {
    let router = Arc::new(build_call_router(&config)?);
    let app = relay_routes(router);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Call relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Call relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Server is running" }))
}

// ── Webhook ─────────────────────────────────────────────────────────────

/// Acknowledge immediately and route in the background.
///
/// Always answers 200, even for bodies we cannot parse, so Aircall does not
/// keep re-delivering the event.
async fn aircall_webhook(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, bytes = body.len(), "Ignoring malformed webhook body");
            return StatusCode::OK;
        }
    };

    spawn_routing(Arc::clone(&state.router), WebhookEvent::from(payload));

    StatusCode::OK
}

/// Route `event` on its own task.
///
/// A supervising task awaits the routing task so a panic is logged instead
/// of vanishing with the dropped handle. Resolves to `None` on panic.
pub(crate) fn spawn_routing(
    router: Arc<CallRouter>,
    event: WebhookEvent,
) -> JoinHandle<Option<RoutingOutcome>> {
    let call_id = event.call_id.clone();
    let handle = tokio::spawn(async move { router.route(event).await });

    tokio::spawn(async move {
        match handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!(call_id = %call_id, error = %e, "Routing task panicked");
                None
            }
        }
    })
}
