//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing::{info, instrument};
use wardrobe_media::{STATIC_PREFIX, media_router};
use wardrobe_routing::ConversationRouter;

use crate::{health_api, webhook};

pub const BANNER: &str = "This is the virtual try-on chatbot API.";

/// Settings for `X-Twilio-Signature` verification.
#[derive(Clone)]
pub struct SignatureCheck {
    pub auth_token: String,
    /// The webhook URL exactly as configured at the provider.
    pub webhook_url: String,
}

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub router: ConversationRouter,
    pub signature: Option<SignatureCheck>,
}

pub fn build_router(state: GatewayState, static_dir: PathBuf) -> Router {
    Router::new()
        .route("/", get(|| async { BANNER }))
        .route("/webhook", post(webhook::receive))
        .route("/api/health", get(health_api::get_health))
        .nest(STATIC_PREFIX, media_router(static_dir))
        .with_state(state)
}

/// Serve until ctrl-c.
#[instrument(skip(state, static_dir))]
pub async fn start_server(
    addr: SocketAddr,
    state: GatewayState,
    static_dir: PathBuf,
) -> Result<()> {
    tokio::fs::create_dir_all(&static_dir).await?;
    let app = build_router(state, static_dir);

    let listener = TcpListener::bind(&addr).await?;
    info!("Gateway HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down gateway");
        })
        .await?;

    Ok(())
}
