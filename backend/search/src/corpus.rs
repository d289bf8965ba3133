//! The candidate corpus: product images whose positions are the index ids.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;
use wardrobe_core::{BotError, Corpus};
use wardrobe_media::{detect_mime_type, is_image};

/// Image files of one directory. Position `n` is the image that was embedded
/// under id `n` when the index was populated, so numeric stems (`0.png`,
/// `2.png`, `10.png`) order by value; other names follow in name order.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    files: Vec<PathBuf>,
}

impl DirectoryCorpus {
    pub fn load(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read corpus directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && is_image(detect_mime_type(&path)) {
                files.push(path);
            }
        }
        files.sort_by_cached_key(|path| corpus_order(path));
        info!(dir = %dir.display(), images = files.len(), "Loaded candidate corpus");
        Ok(Self { files })
    }

    pub fn from_files(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    pub fn path(&self, position: usize) -> Option<&Path> {
        self.files.get(position).map(PathBuf::as_path)
    }
}

/// Numbered files first by value, then everything else by name.
fn corpus_order(path: &Path) -> (bool, u64, PathBuf) {
    let number = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse::<u64>().ok());
    (number.is_none(), number.unwrap_or(0), path.to_path_buf())
}

#[async_trait]
impl Corpus for DirectoryCorpus {
    fn len(&self) -> usize {
        self.files.len()
    }

    async fn image(&self, position: usize) -> Result<Bytes, BotError> {
        let path = self
            .path(position)
            .ok_or_else(|| BotError::search(format!("no corpus image at position {position}")))?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Bytes::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn loads_images_in_name_order() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.png"), b"second").unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"first").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip").unwrap();
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let corpus = DirectoryCorpus::load(dir.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.image(0).await.unwrap(), Bytes::from_static(b"first"));
        assert_eq!(corpus.image(1).await.unwrap(), Bytes::from_static(b"second"));
    }

    #[tokio::test]
    async fn unpadded_numeric_names_follow_their_value() {
        let dir = tempdir().unwrap();
        for n in 0..12 {
            std::fs::write(dir.path().join(format!("{n}.png")), format!("product-{n}")).unwrap();
        }
        std::fs::write(dir.path().join("cover.png"), b"cover").unwrap();

        let corpus = DirectoryCorpus::load(dir.path()).unwrap();
        assert_eq!(corpus.len(), 13);
        assert_eq!(corpus.image(2).await.unwrap(), Bytes::from_static(b"product-2"));
        assert_eq!(corpus.image(10).await.unwrap(), Bytes::from_static(b"product-10"));
        assert_eq!(corpus.image(12).await.unwrap(), Bytes::from_static(b"cover"));
    }

    #[tokio::test]
    async fn out_of_range_position_is_search_error() {
        let corpus = DirectoryCorpus::from_files(vec![]);
        assert!(corpus.is_empty());
        assert!(matches!(corpus.image(3).await, Err(BotError::Search(_))));
    }

    #[test]
    fn missing_directory_fails() {
        assert!(DirectoryCorpus::load(Path::new("/definitely/not/here")).is_err());
    }
}
