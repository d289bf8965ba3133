//! Catalog search: embed a query, ask the index for neighbours, and map the
//! returned ids back onto corpus positions.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};
use wardrobe_core::{BotError, Corpus, Embedder, SearchMatch, VectorIndex};
use wardrobe_media::prepare_for_embedding;

/// Neighbours requested per query.
pub const TOP_K: usize = 5;

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogHit {
    pub position: usize,
    pub id: String,
    pub score: f32,
}

#[derive(Clone)]
pub struct CatalogSearch {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    corpus: Arc<dyn Corpus>,
}

impl CatalogSearch {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        corpus: Arc<dyn Corpus>,
    ) -> Self {
        Self {
            embedder,
            index,
            corpus,
        }
    }

    pub async fn search_text(&self, query: &str) -> Result<Vec<CatalogHit>, BotError> {
        let vector = self.embedder.embed_text(query).await?;
        self.search_vector(&vector).await
    }

    /// `image` is the raw upload in any decodable format.
    pub async fn search_image_bytes(&self, image: Bytes) -> Result<Vec<CatalogHit>, BotError> {
        let png = tokio::task::spawn_blocking(move || prepare_for_embedding(&image))
            .await
            .map_err(BotError::search)?
            .map_err(BotError::search)?;
        let vector = self.embedder.embed_image(Bytes::from(png)).await?;
        self.search_vector(&vector).await
    }

    pub async fn search_vector(&self, vector: &[f32]) -> Result<Vec<CatalogHit>, BotError> {
        let matches = self.index.query(vector, TOP_K).await?;
        debug!(matches = matches.len(), "Index query returned");
        Ok(self.resolve(matches))
    }

    /// Bytes of the corpus image behind `hit`.
    pub async fn image(&self, hit: &CatalogHit) -> Result<Bytes, BotError> {
        self.corpus.image(hit.position).await
    }

    fn resolve(&self, mut matches: Vec<SearchMatch>) -> Vec<CatalogHit> {
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches
            .into_iter()
            .filter_map(|m| match m.id.parse::<usize>() {
                Ok(position) if position < self.corpus.len() => Some(CatalogHit {
                    position,
                    id: m.id,
                    score: m.score,
                }),
                _ => {
                    warn!(id = %m.id, corpus = self.corpus.len(), "Index id has no corpus image");
                    None
                }
            })
            .take(TOP_K)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DirectoryCorpus, InMemoryIndex};
    use async_trait::async_trait;
    use serde_json::json;
    use std::io::Cursor;
    use std::sync::Mutex;

    struct FixedEmbedder {
        vector: Vec<f32>,
        seen_images: Mutex<Vec<Bytes>>,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        fn dimension(&self) -> usize {
            self.vector.len()
        }

        async fn embed_text(&self, _text: &str) -> Result<Vec<f32>, BotError> {
            Ok(self.vector.clone())
        }

        async fn embed_image(&self, png: Bytes) -> Result<Vec<f32>, BotError> {
            self.seen_images.lock().unwrap().push(png);
            Ok(self.vector.clone())
        }
    }

    struct ScriptedIndex(Vec<SearchMatch>);

    #[async_trait]
    impl VectorIndex for ScriptedIndex {
        async fn query(
            &self,
            _vector: &[f32],
            _top_k: usize,
        ) -> Result<Vec<SearchMatch>, BotError> {
            Ok(self.0.clone())
        }
    }

    fn corpus(n: usize) -> Arc<DirectoryCorpus> {
        let files = (0..n).map(|i| format!("/corpus/{i:03}.png").into()).collect();
        Arc::new(DirectoryCorpus::from_files(files))
    }

    fn embedder(vector: Vec<f32>) -> Arc<FixedEmbedder> {
        Arc::new(FixedEmbedder {
            vector,
            seen_images: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn text_search_ranks_highest_score_first() {
        let index = ScriptedIndex(vec![SearchMatch::new("3", 0.5), SearchMatch::new("7", 0.9)]);
        let search = CatalogSearch::new(embedder(vec![1.0]), Arc::new(index), corpus(10));

        let hits = search.search_text("dark blue jeans").await.unwrap();
        assert_eq!(hits[0].position, 7);
        assert_eq!(hits[0].score, 0.9);
        assert_eq!(hits[1].position, 3);
    }

    #[tokio::test]
    async fn ids_outside_corpus_are_dropped() {
        let index = ScriptedIndex(vec![
            SearchMatch::new("42", 0.99),
            SearchMatch::new("not-a-number", 0.95),
            SearchMatch::new("1", 0.2),
        ]);
        let search = CatalogSearch::new(embedder(vec![1.0]), Arc::new(index), corpus(2));

        let hits = search.search_text("shirt").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");
    }

    #[tokio::test]
    async fn image_search_embeds_resized_png() {
        let index = InMemoryIndex::new();
        index.upsert("0", vec![0.0, 1.0], json!({})).await;
        index.upsert("1", vec![1.0, 0.0], json!({})).await;
        let embedder = embedder(vec![0.8, 0.2]);
        let search = CatalogSearch::new(embedder.clone(), Arc::new(index), corpus(2));

        let mut upload = Vec::new();
        image::RgbaImage::from_pixel(40, 30, image::Rgba([10, 20, 30, 255]))
            .write_to(&mut Cursor::new(&mut upload), image::ImageFormat::Png)
            .unwrap();

        let hits = search.search_image_bytes(Bytes::from(upload)).await.unwrap();
        assert_eq!(hits[0].position, 1);

        let seen = embedder.seen_images.lock().unwrap();
        let decoded = image::load_from_memory(&seen[0]).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (224, 224));
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
    }

    #[tokio::test]
    async fn undecodable_image_is_search_error() {
        let search =
            CatalogSearch::new(embedder(vec![1.0]), Arc::new(InMemoryIndex::new()), corpus(1));
        let err = search
            .search_image_bytes(Bytes::from_static(b"not an image"))
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::Search(_)));
    }

    #[tokio::test]
    async fn empty_index_yields_no_hits() {
        let search =
            CatalogSearch::new(embedder(vec![1.0]), Arc::new(InMemoryIndex::new()), corpus(3));
        assert!(search.search_text("anything").await.unwrap().is_empty());
    }
}
