//! Wardrobe HTTP gateway
//!
//! Receives the messaging provider's webhook, serves published results under
//! `/static`, and reports health.

pub mod health_api;
pub mod server;
pub mod webhook;

pub use server::{GatewayState, SignatureCheck, build_router, start_server};
