//! Flow executors: the multi-step work behind a try-on or search turn.
//!
//! Each executor returns `Result<_, BotError>`; the router turns the outcome
//! into a reply. Nothing here touches the session store.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};
use uuid::Uuid;
use wardrobe_core::{
    BotError, Flow, MediaFetcher, MediaPublisher, MediaRef, TryOnModel, TryOnParams,
};
use wardrobe_search::{CatalogHit, CatalogSearch};

use crate::scratch::Scratch;

/// External collaborators a flow needs.
#[derive(Clone)]
pub struct FlowExecutor {
    fetcher: Arc<dyn MediaFetcher>,
    publisher: Arc<dyn MediaPublisher>,
    tryon: Arc<dyn TryOnModel>,
    catalog: CatalogSearch,
    scratch_dir: PathBuf,
}

/// Public URL of the published result, if there was one.
pub type Published = Option<String>;

impl FlowExecutor {
    pub fn new(
        fetcher: Arc<dyn MediaFetcher>,
        publisher: Arc<dyn MediaPublisher>,
        tryon: Arc<dyn TryOnModel>,
        catalog: CatalogSearch,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            publisher,
            tryon,
            catalog,
            scratch_dir: scratch_dir.into(),
        }
    }

    pub async fn try_on(&self, person: &MediaRef, garment: &MediaRef) -> Result<String, BotError> {
        let mut scratch = Scratch::new(&self.scratch_dir);
        let result = self.try_on_in(&mut scratch, person, garment).await;
        scratch.cleanup().await;
        result
    }

    async fn try_on_in(
        &self,
        scratch: &mut Scratch,
        person: &MediaRef,
        garment: &MediaRef,
    ) -> Result<String, BotError> {
        let person_path = self.fetcher.fetch(person, &scratch.reserve("person")).await?;
        let garment_path = self.fetcher.fetch(garment, &scratch.reserve("garment")).await?;

        let outputs = self
            .tryon
            .generate(&person_path, &garment_path, &TryOnParams::default())
            .await?;
        for output in &outputs {
            scratch.adopt(output);
        }

        let first = outputs
            .first()
            .ok_or_else(|| BotError::generation("endpoint returned no images"))?;
        if !tokio::fs::try_exists(first).await.unwrap_or(false) {
            return Err(BotError::generation(format!(
                "output image not found at {}",
                first.display()
            )));
        }
        debug!(model = self.tryon.name(), alternates = outputs.len() - 1, "Try-on output ready");

        self.publisher
            .publish_file(first, &published_name(Flow::TryOn))
            .await
            .map_err(|e| as_kind(e, Flow::TryOn))
    }

    pub async fn text_search(&self, query: &str) -> Result<Published, BotError> {
        let hits = self.catalog.search_text(query).await?;
        self.publish_top(&hits, Flow::TextSearch).await
    }

    pub async fn image_search(&self, image: &MediaRef) -> Result<Published, BotError> {
        let mut scratch = Scratch::new(&self.scratch_dir);
        let result = self.image_search_in(&mut scratch, image).await;
        scratch.cleanup().await;
        result
    }

    async fn image_search_in(
        &self,
        scratch: &mut Scratch,
        image: &MediaRef,
    ) -> Result<Published, BotError> {
        let path = self.fetcher.fetch(image, &scratch.reserve("search")).await?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(BotError::media_fetch)?;
        let hits = self.catalog.search_image_bytes(Bytes::from(bytes)).await?;
        self.publish_top(&hits, Flow::ImageSearch).await
    }

    /// Publish only the top-ranked hit. Zero hits publishes nothing.
    async fn publish_top(&self, hits: &[CatalogHit], flow: Flow) -> Result<Published, BotError> {
        let Some(top) = hits.first() else {
            return Ok(None);
        };
        info!(flow = %flow, position = top.position, score = top.score, "Top match");
        let bytes = self.catalog.image(top).await?;
        let url = self
            .publisher
            .publish_bytes(bytes, &published_name(flow))
            .await
            .map_err(|e| as_kind(e, flow))?;
        Ok(Some(url))
    }
}

/// Unique per result so concurrent flows never overwrite each other.
fn published_name(flow: Flow) -> String {
    format!("{}-{}.png", flow, Uuid::new_v4().simple())
}

/// Attribute a publishing failure to the flow that was publishing.
fn as_kind(err: BotError, flow: Flow) -> BotError {
    match (flow, err) {
        (Flow::TryOn, err @ BotError::Generation(_)) => err,
        (Flow::TryOn, err) => BotError::generation(err),
        (_, err @ BotError::Search(_)) => err,
        (_, err) => BotError::search(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_names_are_unique_pngs() {
        let a = published_name(Flow::TextSearch);
        let b = published_name(Flow::TextSearch);
        assert_ne!(a, b);
        assert!(a.starts_with("text_search-"));
        assert!(a.ends_with(".png"));
    }

    #[test]
    fn publish_errors_take_the_flow_kind() {
        let io = || BotError::Io(std::io::Error::other("disk full"));
        assert!(matches!(as_kind(io(), Flow::TryOn), BotError::Generation(_)));
        assert!(matches!(as_kind(io(), Flow::ImageSearch), BotError::Search(_)));
    }
}
