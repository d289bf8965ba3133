//! Pinecone clients: control plane (describe / create index) and data plane
//! (nearest-neighbour query).
//!
//! The index is populated offline; the live request path only queries it.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use wardrobe_core::{BotError, SearchMatch, VectorIndex};

const API_VERSION: &str = "2024-07";
const READY_POLL_INTERVAL: Duration = Duration::from_secs(1);
const READY_MAX_POLLS: u32 = 120;

/// What to create when the index does not exist yet.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    pub name: String,
    pub dimension: usize,
    pub metric: String,
    pub cloud: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    pub dimension: usize,
    pub metric: String,
    pub host: String,
    pub status: IndexStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexStatus {
    pub ready: bool,
    #[serde(default)]
    pub state: String,
}

pub struct PineconeControl {
    client: Client,
    api_key: String,
    base_url: String,
}

impl PineconeControl {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `None` when the index does not exist.
    pub async fn describe_index(&self, name: &str) -> Result<Option<IndexDescription>> {
        let response = self
            .client
            .get(format!("{}/indexes/{}", self.base_url, name))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await
            .context("Pinecone describe request failed")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        Ok(Some(response.json().await.context("Failed to parse index description")?))
    }

    pub async fn create_index(&self, spec: &IndexSpec) -> Result<()> {
        let body = json!({
            "name": spec.name,
            "dimension": spec.dimension,
            "metric": spec.metric,
            "spec": { "serverless": { "cloud": spec.cloud, "region": spec.region } },
        });
        let response = self
            .client
            .post(format!("{}/indexes", self.base_url))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&body)
            .send()
            .await
            .context("Pinecone create request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Pinecone create returned {}: {}", status, error_body);
        }
        info!(
            index = %spec.name,
            dimension = spec.dimension,
            metric = %spec.metric,
            "Created index"
        );
        Ok(())
    }

    /// Create the index if it is missing, then wait until it reports ready.
    pub async fn ensure_index(&self, spec: &IndexSpec) -> Result<IndexDescription> {
        if self.describe_index(&spec.name).await?.is_none() {
            self.create_index(spec).await?;
        }

        for _ in 0..READY_MAX_POLLS {
            match self.describe_index(&spec.name).await? {
                Some(desc) if desc.status.ready => {
                    if desc.dimension != spec.dimension {
                        anyhow::bail!(
                            "Index {} has dimension {}, expected {}",
                            desc.name,
                            desc.dimension,
                            spec.dimension
                        );
                    }
                    return Ok(desc);
                }
                Some(desc) => {
                    debug!(index = %desc.name, state = %desc.status.state, "Waiting for index")
                }
                None => debug!(index = %spec.name, "Index not visible yet"),
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
        anyhow::bail!("Index {} did not become ready", spec.name)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<SearchMatch>,
}

/// Data-plane handle bound to one index host.
pub struct PineconeIndex {
    client: Client,
    api_key: String,
    host_url: String,
}

impl PineconeIndex {
    /// `host` is either a bare host (as returned by describe) or a full URL.
    pub fn new(api_key: impl Into<String>, host: &str) -> Self {
        let host_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", host.trim_end_matches('/'))
        };
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            host_url,
        }
    }

    async fn query_inner(&self, vector: &[f32], top_k: usize) -> Result<Vec<SearchMatch>> {
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
        };
        let response: QueryResponse = self
            .client
            .post(format!("{}/query", self.host_url))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&body)
            .send()
            .await
            .context("Pinecone query request failed")?
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse Pinecone query response")?;

        let mut matches = response.matches;
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k);
        Ok(matches)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<SearchMatch>, BotError> {
        self.query_inner(vector, top_k).await.map_err(BotError::search)
    }
}
