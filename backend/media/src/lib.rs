//! Media relay: image re-encoding, publishing under `/static`, and the
//! read-only router that serves published files.

pub mod media_server;
pub mod mime_detect;
pub mod publisher;
pub mod transcode;

pub use media_server::{STATIC_PREFIX, media_router};
pub use mime_detect::{PUBLISHED_CONTENT_TYPE, detect_mime_type, is_image};
pub use publisher::StaticPublisher;
pub use transcode::{EMBED_SIZE, prepare_for_embedding, reencode_png};
