//! HubSpot CRM v3 client.

use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::ContactDirectory;
use crate::config::HubspotConfig;
use crate::error::CrmError;
use crate::routing::types::{Contact, Owner};

/// Contact properties requested from the search endpoint.
const CONTACT_PROPERTIES: [&str; 2] = ["firstname", "hubspot_owner_id"];

/// HubSpot client authenticated with a `hapikey` query parameter.
pub struct HubspotClient {
    base_url: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl HubspotClient {
    pub fn new(config: &HubspotConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
        }
    }

    /// `{base_url}/crm/v3/{segments...}`, each segment percent-encoded on its
    /// own. Empty, `.` and `..` segments are refused.
    fn api_url(&self, operation: &str, segments: &[&str]) -> Result<Url, CrmError> {
        let invalid = |reason: String| CrmError::RequestFailed {
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
            .extend(["crm", "v3"])
            .extend(segments);
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(
        operation: &str,
        resp: reqwest::Response,
    ) -> Result<T, CrmError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CrmError::Status {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| CrmError::InvalidResponse {
                operation: operation.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Request body for `POST /crm/v3/objects/contacts/search`.
pub(crate) fn contact_search_body(phone: &str) -> serde_json::Value {
    serde_json::json!({
        "filterGroups": [{
            "filters": [{
                "value": phone,
                "propertyName": "phone",
                "operator": "EQ"
            }]
        }],
        "properties": CONTACT_PROPERTIES,
        "limit": 1,
        "after": 0
    })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    properties: ContactProperties,
}

#[derive(Debug, Default, Deserialize)]
struct ContactProperties {
    #[serde(default)]
    firstname: Option<String>,
    #[serde(default)]
    hubspot_owner_id: Option<String>,
}

impl From<ContactProperties> for Contact {
    fn from(props: ContactProperties) -> Self {
        Self {
            first_name: props.firstname.unwrap_or_default(),
            owner_id: props.hubspot_owner_id.filter(|id| !id.is_empty()),
        }
    }
}

#[async_trait]
impl ContactDirectory for HubspotClient {
    async fn search_contact_by_phone(&self, phone: &str) -> Result<Option<Contact>, CrmError> {
        const OP: &str = "contact search";

        let resp = self
            .client
            .post(self.api_url(OP, &["objects", "contacts", "search"])?)
            .query(&[("hapikey", self.api_key.expose_secret())])
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&contact_search_body(phone))
            .send()
            .await
            .map_err(|e| CrmError::RequestFailed {
                operation: OP.to_string(),
                reason: e.without_url().to_string(),
            })?;

        let found: SearchResponse = Self::read_json(OP, resp).await?;
        Ok(found
            .results
            .into_iter()
            .next()
            .map(|result| Contact::from(result.properties)))
    }

    async fn get_owner(&self, owner_id: &str) -> Result<Owner, CrmError> {
        const OP: &str = "owner lookup";

        let resp = self
            .client
            .get(self.api_url(OP, &["owners", owner_id])?)
            .query(&[
                ("idProperty", "id"),
                ("archived", "false"),
                ("hapikey", self.api_key.expose_secret()),
            ])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| CrmError::RequestFailed {
                operation: OP.to_string(),
                reason: e.without_url().to_string(),
            })?;

        Self::read_json(OP, resp).await
    }
}
