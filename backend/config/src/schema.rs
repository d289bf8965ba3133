//! Wardrobe runtime configuration schema, typed for serde YAML/JSON.
//!
//! Every section falls back to its defaults when omitted, so a config file
//! only has to carry secrets and the public URL.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WardrobeConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Messaging provider (Twilio WhatsApp) account
    pub twilio: TwilioConfig,
    /// Hosted virtual try-on endpoint
    pub tryon: TryOnConfig,
    /// Embedding model endpoint
    pub embeddings: EmbeddingsConfig,
    /// Managed vector index
    pub pinecone: PineconeConfig,
    /// Candidate product images
    pub corpus: CorpusConfig,
    /// Local directories
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Externally reachable base URL of this service, used for published images
    /// and webhook signature checks.
    pub public_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender address for outbound media messages
    pub from_number: String,
    pub api_base_url: String,
    /// Reject webhooks whose `X-Twilio-Signature` does not verify
    pub validate_signature: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TryOnConfig {
    /// Base URL of the Gradio space hosting the model
    pub space_url: String,
    /// Endpoint name within the space
    pub api_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hf_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbeddingsConfig {
    pub base_url: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    pub cloud: String,
    pub region: String,
    pub dimension: usize,
    pub metric: String,
    pub control_plane_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CorpusConfig {
    /// Directory of product images; file order defines index ids
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageConfig {
    /// Served read-only under `/static`
    pub static_dir: PathBuf,
    /// Downloads of inbound media
    pub scratch_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    pub level: String,
    pub dir: PathBuf,
}
