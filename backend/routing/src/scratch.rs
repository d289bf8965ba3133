use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

/// Per-request scratch files. Names carry a uuid so concurrent senders never
/// share a path; everything reserved or adopted is removed by `cleanup`.
#[derive(Debug)]
pub struct Scratch {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl Scratch {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
        }
    }

    /// A fresh path under the scratch dir for a download labelled `label`.
    pub fn reserve(&mut self, label: &str) -> PathBuf {
        let path = self.dir.join(format!("{}-{}.jpg", label, Uuid::new_v4()));
        self.files.push(path.clone());
        path
    }

    /// Take ownership of a file someone else wrote, if it lives in the scratch dir.
    pub fn adopt(&mut self, path: &Path) {
        if path.starts_with(&self.dir) && !self.files.iter().any(|f| f == path) {
            self.files.push(path.to_path_buf());
        }
    }

    pub async fn cleanup(self) {
        for file in self.files {
            if tokio::fs::remove_file(&file).await.is_ok() {
                debug!(path = %file.display(), "Removed scratch file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn cleanup_removes_reserved_and_adopted_files() {
        let dir = tempdir().unwrap();
        let mut scratch = Scratch::new(dir.path());
        let a = scratch.reserve("person");
        let b = scratch.reserve("person");
        assert_ne!(a, b);
        std::fs::write(&a, b"x").unwrap();

        let output = dir.path().join("tryon-out.png");
        std::fs::write(&output, b"y").unwrap();
        scratch.adopt(&output);

        let outside = tempdir().unwrap();
        let foreign = outside.path().join("fixture.png");
        std::fs::write(&foreign, b"z").unwrap();
        scratch.adopt(&foreign);

        scratch.cleanup().await;
        assert!(!a.exists());
        assert!(!output.exists());
        assert!(foreign.exists());
    }
}
