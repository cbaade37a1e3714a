//! Aircall public API v1 client.
//!
//! Authenticates with HTTP basic auth (`API_ID:API_TOKEN`).

use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use super::CallPlatform;
use crate::config::AircallConfig;
use crate::error::TelephonyError;
use crate::routing::types::{TelephonyAgent, TransferCommand};

/// Page size requested from `/v1/users` (Aircall's maximum).
const USERS_PER_PAGE: u32 = 50;

/// Stop following `next_page_link` after this many pages.
const MAX_USER_PAGES: usize = 100;

pub struct AircallClient {
    base_url: String,
    api_id: String,
    api_token: SecretString,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UsersPage {
    #[serde(default)]
    users: Vec<TelephonyAgent>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    #[serde(default)]
    next_page_link: Option<String>,
}

impl AircallClient {
    pub fn new(config: &AircallConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_id: config.api_id.clone(),
            api_token: config.api_token.clone(),
            client,
        }
    }

    /// `{base_url}/v1/{segments...}`, each segment percent-encoded on its own.
    ///
    /// Ids come from webhook payloads, so empty, `.` and `..` segments are
    /// refused rather than letting them reshape the path.
    fn api_url(&self, operation: &str, segments: &[&str]) -> Result<Url, TelephonyError> {
        let invalid = |reason: String| TelephonyError::RequestFailed {
            operation: operation.to_string(),
            reason,
        };

        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(invalid(format!("refusing path segment '{bad}'")));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("invalid base URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| invalid(format!("base URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    /// Resolve a `next_page_link`, accepting only links on our own origin so
    /// credentials are never sent elsewhere.
    fn same_origin_link(&self, operation: &str, link: &str) -> Result<Url, TelephonyError> {
        let invalid = |reason: String| TelephonyError::InvalidResponse {
            operation: operation.to_string(),
            reason,
        };

        let base = Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("invalid base URL {}: {e}", self.base_url)))?;
        let next = base
            .join(link)
            .map_err(|e| invalid(format!("invalid next_page_link '{link}': {e}")))?;
        if next.origin() != base.origin() {
            return Err(invalid(format!(
                "next_page_link points outside {}: {}",
                base.origin().ascii_serialization(),
                next.origin().ascii_serialization()
            )));
        }
        Ok(next)
    }

    async fn send(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, TelephonyError> {
        let resp = request
            .basic_auth(&self.api_id, Some(self.api_token.expose_secret()))
            .send()
            .await
            .map_err(|e| TelephonyError::RequestFailed {
                operation: operation.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TelephonyError::Status {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl CallPlatform for AircallClient {
    async fn list_users(&self) -> Result<Vec<TelephonyAgent>, TelephonyError> {
        const OP: &str = "list users";

        let mut users = Vec::new();
        let mut request = self
            .client
            .get(self.api_url(OP, &["users"])?)
            .query(&[("per_page", USERS_PER_PAGE)]);

        for page in 1..=MAX_USER_PAGES {
            let resp = self.send(OP, request).await?;
            let body: UsersPage = resp.json().await.map_err(|e| TelephonyError::InvalidResponse {
                operation: OP.to_string(),
                reason: e.to_string(),
            })?;
            users.extend(body.users);

            match body.meta.and_then(|m| m.next_page_link) {
                Some(next) if !next.is_empty() => {
                    let next = self.same_origin_link(OP, &next)?;
                    debug!(page, next = %next, "Fetching next Aircall users page");
                    request = self.client.get(next);
                }
                _ => return Ok(users),
            }
        }

        warn!(
            pages = MAX_USER_PAGES,
            users = users.len(),
            "Aircall user directory exceeded page limit; using partial listing"
        );
        Ok(users)
    }

    async fn transfer_call(&self, command: &TransferCommand) -> Result<(), TelephonyError> {
        const OP: &str = "transfer call";

        let url = self.api_url(OP, &["calls", command.call_id.as_str(), "transfers"])?;
        let request = self
            .client
            .post(url)
            .json(&serde_json::json!({ "user_id": user_id_value(&command.target_agent_id) }));

        self.send(OP, request).await?;
        Ok(())
    }
}

/// Aircall user ids are integers; send them back as numbers when they are.
fn user_id_value(agent_id: &str) -> serde_json::Value {
    agent_id
        .parse::<u64>()
        .map(serde_json::Value::from)
        .unwrap_or_else(|_| serde_json::Value::from(agent_id))
}
