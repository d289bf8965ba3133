pub mod error;
pub mod session;
pub mod traits;
pub mod types;

pub use error::BotError;
pub use session::{InMemorySessionStore, SessionState, SessionStore};
pub use traits::{
    Corpus, Embedder, MediaFetcher, MediaPublisher, Messenger, TryOnModel, TryOnParams,
    VectorIndex,
};
pub use types::{Flow, InboundMessage, MediaRef, SearchMatch};
