use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use wardrobe_core::{BotError, TryOnModel, TryOnParams};

/// A try-on model that returns canned output paths and records its calls.
#[derive(Clone, Default)]
pub struct MockTryOn {
    outputs: Vec<PathBuf>,
    failure: Option<String>,
    calls: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
}

impl MockTryOn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.outputs.push(path.into());
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// (person, garment) pairs seen so far.
    pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TryOnModel for MockTryOn {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        person: &Path,
        garment: &Path,
        _params: &TryOnParams,
    ) -> Result<Vec<PathBuf>, BotError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((person.to_path_buf(), garment.to_path_buf()));
        }
        match &self.failure {
            Some(message) => Err(BotError::generation(message)),
            None => Ok(self.outputs.clone()),
        }
    }
}
