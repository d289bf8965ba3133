use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BotError;
use crate::types::{MediaRef, SearchMatch};

/// Resolves inbound media through the messaging provider.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Download `media` and write it to `dest`. Returns the written path.
    async fn fetch(&self, media: &MediaRef, dest: &Path) -> Result<PathBuf, BotError>;
}

/// Outbound media messages. Delivery is not confirmed.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_media(&self, to: &str, body: &str, media_url: &str) -> Result<(), BotError>;
}

/// Publishes result images at an externally reachable URL.
#[async_trait]
pub trait MediaPublisher: Send + Sync {
    /// Decode `bytes`, re-encode as PNG under `filename`, return the public URL.
    async fn publish_bytes(&self, bytes: Bytes, filename: &str) -> Result<String, BotError>;

    /// Same as [`publish_bytes`](Self::publish_bytes) for an image on disk.
    async fn publish_file(&self, source: &Path, filename: &str) -> Result<String, BotError>;
}

/// Fixed parameters sent along with every try-on request.
#[derive(Debug, Clone, PartialEq)]
pub struct TryOnParams {
    pub garment_description: String,
    pub auto_mask: bool,
    pub auto_crop: bool,
    pub denoise_steps: u32,
    pub seed: u64,
}

impl Default for TryOnParams {
    fn default() -> Self {
        Self {
            garment_description: "A cool description of the garment".to_string(),
            auto_mask: true,
            auto_crop: false,
            denoise_steps: 30,
            seed: 42,
        }
    }
}

/// Hosted virtual try-on generation endpoint.
#[async_trait]
pub trait TryOnModel: Send + Sync {
    fn name(&self) -> &str;

    /// Returns output image paths, best candidate first.
    async fn generate(
        &self,
        person: &Path,
        garment: &Path,
        params: &TryOnParams,
    ) -> Result<Vec<PathBuf>, BotError>;
}

/// Joint text/image embedding model.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn dimension(&self) -> usize;

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, BotError>;

    /// `png` is an already preprocessed RGB image.
    async fn embed_image(&self, png: Bytes) -> Result<Vec<f32>, BotError>;
}

/// Nearest-neighbour index over the candidate corpus.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Up to `top_k` matches, highest inner-product score first.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<SearchMatch>, BotError>;
}

/// The pre-loaded set of product images the index was built from.
#[async_trait]
pub trait Corpus: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Image bytes at corpus position `position`.
    async fn image(&self, position: usize) -> Result<Bytes, BotError>;
}
