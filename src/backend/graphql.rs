use super::query::{list_query, mutation_document};
use super::{Backend, MutationResult};
use crate::entity::{Entity, EntityKind};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

/// Default BCO GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://ha:13781/graphql";

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Map<String, Value>>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// HTTP client for the BCO GraphQL API.
///
/// Posts `{"query": ...}` bodies and reads the named root field out of
/// `{"data": {...}}`.
pub struct GraphQlClient {
    endpoint: String,
    http_client: Client,
}

impl GraphQlClient {
    /// Create a client for `endpoint` with no request timeout.
    pub fn new(endpoint: String) -> Result<Self> {
        Self::with_timeout(endpoint, None)
    }

    pub fn with_timeout(endpoint: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent("bco-skill/0.1");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            endpoint,
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `document` and deserializes `data.<root>`.
    async fn execute<T: DeserializeOwned>(&self, document: &str, root: &str) -> Result<T> {
        debug!(root = %root, endpoint = %self.endpoint, "Sending GraphQL request");
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&GraphQlRequest { query: document })
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", root))?;

        check_response_status(&response)?;
        let body = response
            .json::<GraphQlResponse>()
            .await
            .with_context(|| format!("Failed to parse {} response", root))?;

        if !body.errors.is_empty() {
            let messages: Vec<&str> = body.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(anyhow!("GraphQL error in {}: {}", root, messages.join("; ")));
        }

        let mut data = body
            .data
            .ok_or_else(|| anyhow!("GraphQL response for {} has no data", root))?;
        let value = data
            .remove(root)
            .filter(|v| !v.is_null())
            .ok_or_else(|| anyhow!("GraphQL response is missing field '{}'", root))?;

        serde_json::from_value(value).with_context(|| format!("Unexpected shape of '{}'", root))
    }
}

#[async_trait]
impl Backend for GraphQlClient {
    async fn list_entities(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        self.execute(&list_query(kind), kind.collection()).await
    }

    async fn mutate(&self, kind: EntityKind, entity_id: &str) -> Result<MutationResult> {
        self.execute(&mutation_document(kind, entity_id), kind.mutation())
            .await
    }
}

/// Maps non-2xx statuses to descriptive errors.
fn check_response_status(response: &reqwest::Response) -> Result<()> {
    match response.status() {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow!(
            "BCO backend rejected the request ({})",
            response.status()
        )),
        s if !s.is_success() => Err(anyhow!("BCO backend error: {}", s)),
        _ => Ok(()),
    }
}
