//! Static media server: serves published result images over HTTP.
//!
//! Read-only. Only PNG files that exist in the static directory are served;
//! everything else is a 404.

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::{path::PathBuf, sync::Arc};
use tokio::fs;
use tracing::{debug, warn};

use crate::mime_detect::{PUBLISHED_CONTENT_TYPE, detect_mime_type};

/// Path prefix the router is mounted under.
pub const STATIC_PREFIX: &str = "/static";

#[derive(Clone)]
pub struct MediaServerState {
    pub static_dir: Arc<PathBuf>,
}

/// Build the static media router.
///
/// Mount at [`STATIC_PREFIX`]:
///   GET /static/:filename  — serve a published image
pub fn media_router<S>(static_dir: PathBuf) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let state = MediaServerState {
        static_dir: Arc::new(static_dir),
    };
    Router::new()
        .route("/:filename", get(serve_media))
        .with_state(state)
}

async fn serve_media(
    Path(filename): Path<String>,
    State(state): State<MediaServerState>,
) -> Response {
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        warn!(filename = %filename, "Rejected suspicious media path");
        return (StatusCode::NOT_FOUND, "File not found").into_response();
    }

    let path = state.static_dir.join(&filename);
    if detect_mime_type(&path) != PUBLISHED_CONTENT_TYPE {
        debug!(path = %path.display(), "Refusing non-PNG static file");
        return (StatusCode::NOT_FOUND, "File not found").into_response();
    }

    match fs::read(&path).await {
        Ok(bytes) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(PUBLISHED_CONTENT_TYPE),
            );
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=86400"),
            );
            debug!(path = %path.display(), size = bytes.len(), "Serving static file");
            (StatusCode::OK, headers, bytes).into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(filename = %filename, "File not found");
            (StatusCode::NOT_FOUND, "File not found").into_response()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read static file");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file").into_response()
        }
    }
}
