//! Publishes result images into the static directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::info;
use wardrobe_core::{BotError, MediaPublisher};

use crate::media_server::STATIC_PREFIX;
use crate::transcode::reencode_png;

/// Writes PNGs under `static_dir` and hands out `{public_base_url}/static/{file}`.
pub struct StaticPublisher {
    static_dir: PathBuf,
    public_base_url: String,
}

impl StaticPublisher {
    pub fn new(static_dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            static_dir: static_dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn public_url(&self, filename: &str) -> String {
        format!("{}{}/{}", self.public_base_url, STATIC_PREFIX, filename)
    }

    async fn write_png(&self, bytes: Bytes, filename: &str) -> anyhow::Result<String> {
        if filename.contains('/') || filename.contains("..") {
            anyhow::bail!("Invalid static filename: {filename}");
        }
        let png = tokio::task::spawn_blocking(move || reencode_png(&bytes))
            .await
            .context("Re-encode task panicked")??;

        fs::create_dir_all(&self.static_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.static_dir.display()))?;
        let target = self.static_dir.join(filename);
        fs::write(&target, &png)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;

        info!(path = %target.display(), "Image published");
        Ok(self.public_url(filename))
    }
}

#[async_trait]
impl MediaPublisher for StaticPublisher {
    async fn publish_bytes(&self, bytes: Bytes, filename: &str) -> Result<String, BotError> {
        Ok(self.write_png(bytes, filename).await?)
    }

    async fn publish_file(&self, source: &Path, filename: &str) -> Result<String, BotError> {
        let bytes = fs::read(source).await?;
        self.publish_bytes(Bytes::from(bytes), filename).await
    }
}
