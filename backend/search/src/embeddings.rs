//! CLIP embeddings over a hosted inference endpoint.
//!
//! Text and images share one vector space, so a text query can be matched
//! against image vectors. The endpoint takes `{"inputs": <text>}` for text
//! and `{"inputs": {"image": <base64 png>}}` for images, and answers with
//! either a flat vector or a batch of one.

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;
use wardrobe_core::{BotError, Embedder};

/// clip-ViT-B-32 output width.
pub const CLIP_DIMENSION: usize = 512;

pub struct ClipEmbeddings {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    dimension: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EmbedResponse {
    Flat(Vec<f32>),
    Batch(Vec<Vec<f32>>),
}

impl EmbedResponse {
    fn into_vector(self) -> Option<Vec<f32>> {
        match self {
            EmbedResponse::Flat(v) => Some(v),
            EmbedResponse::Batch(batch) => batch.into_iter().next(),
        }
    }
}

impl ClipEmbeddings {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
            dimension: CLIP_DIMENSION,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    async fn embed(&self, inputs: Value) -> anyhow::Result<Vec<f32>> {
        let url = format!("{}/models/{}", self.base_url, self.model);
        let mut request = self.client.post(&url).json(&json!({ "inputs": inputs }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response: EmbedResponse = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let vector = response
            .into_vector()
            .ok_or_else(|| anyhow::anyhow!("Empty embedding response"))?;
        if vector.len() != self.dimension {
            anyhow::bail!(
                "Embedding has {} dimensions, expected {}",
                vector.len(),
                self.dimension
            );
        }
        Ok(vector)
    }
}

#[async_trait]
impl Embedder for ClipEmbeddings {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, BotError> {
        debug!(model = %self.model, chars = text.len(), "Embedding text");
        self.embed(json!(text)).await.map_err(BotError::search)
    }

    async fn embed_image(&self, png: Bytes) -> Result<Vec<f32>, BotError> {
        debug!(model = %self.model, bytes = png.len(), "Embedding image");
        let inputs = json!({ "image": STANDARD.encode(&png) });
        self.embed(inputs).await.map_err(BotError::search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, routing::post};

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn echo_app() -> Router {
        // Text → flat vector of 1.0, image → batch of one vector of 2.0.
        Router::new().route(
            "/models/*model",
            post(|Json(body): Json<Value>| async move {
                if body["inputs"].is_string() {
                    Json(json!(vec![1.0f32; 4]))
                } else {
                    Json(json!([vec![2.0f32; 4]]))
                }
            }),
        )
    }

    #[tokio::test]
    async fn accepts_flat_and_batched_vectors() {
        let base = spawn(echo_app()).await;
        let embedder = ClipEmbeddings::new(base, "sentence-transformers/clip-ViT-B-32")
            .with_dimension(4);

        assert_eq!(embedder.embed_text("dark blue jeans").await.unwrap(), vec![1.0; 4]);
        assert_eq!(
            embedder.embed_image(Bytes::from_static(b"png")).await.unwrap(),
            vec![2.0; 4]
        );
    }

    #[tokio::test]
    async fn wrong_dimension_is_search_error() {
        let base = spawn(echo_app()).await;
        let embedder = ClipEmbeddings::new(base, "clip");
        let err = embedder.embed_text("shirt").await.unwrap_err();
        assert!(matches!(err, BotError::Search(_)));
    }
}
