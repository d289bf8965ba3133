//! `POST /webhook`: inbound WhatsApp messages.
//!
//! Always answers `200` with a TwiML document, except when signature
//! verification is enabled and fails (`403`).

use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};
use wardrobe_channels::{
    MessagingResponse, SIGNATURE_HEADER, TWIML_CONTENT_TYPE, WebhookForm, verify_signature,
};
use wardrobe_logging::mask_sender;

use crate::server::GatewayState;

pub async fn receive(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    if let Some(check) = &state.signature {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !verify_signature(&check.auth_token, &check.webhook_url, &pairs, signature) {
            warn!("Rejected webhook with invalid signature");
            return StatusCode::FORBIDDEN.into_response();
        }
    }

    let mut reply = MessagingResponse::new();
    match WebhookForm::from_pairs(&pairs).into_inbound() {
        Some(msg) => {
            debug!(
                sender = %mask_sender(&msg.sender),
                has_media = msg.media.is_some(),
                "Inbound message"
            );
            reply.message(state.router.handle(&msg).await);
        }
        None => warn!("Webhook delivery without a sender"),
    }

    twiml(reply)
}

fn twiml(reply: MessagingResponse) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, TWIML_CONTENT_TYPE)],
        reply.to_xml(),
    )
        .into_response()
}
