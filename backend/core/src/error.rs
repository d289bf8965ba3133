use thiserror::Error;

/// Top-level error type for the wardrobe bot.
///
/// Flow executors catch every variant and turn it into a reply, so none of
/// these ever reach the webhook transport as a server error.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("media fetch failed: {0}")]
    MediaFetch(String),

    #[error("try-on generation failed: {0}")]
    Generation(String),

    #[error("search failed: {0}")]
    Search(String),

    #[error("invalid menu choice: {0:?}")]
    InvalidMenuChoice(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BotError {
    /// Short stable tag used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            BotError::MediaFetch(_) => "media_fetch",
            BotError::Generation(_) => "generation",
            BotError::Search(_) => "search",
            BotError::InvalidMenuChoice(_) => "invalid_menu_choice",
            BotError::Io(_) => "io",
            BotError::Other(_) => "other",
        }
    }

    pub fn media_fetch(err: impl std::fmt::Display) -> Self {
        BotError::MediaFetch(err.to_string())
    }

    pub fn generation(err: impl std::fmt::Display) -> Self {
        BotError::Generation(err.to_string())
    }

    pub fn search(err: impl std::fmt::Display) -> Self {
        BotError::Search(err.to_string())
    }
}
