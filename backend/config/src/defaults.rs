//! Config defaults.

use std::path::PathBuf;

use crate::schema::{
    CorpusConfig, EmbeddingsConfig, LoggingConfig, PineconeConfig, ServerConfig, StorageConfig,
    TryOnConfig, TwilioConfig,
};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// WhatsApp sandbox sender.
pub const DEFAULT_FROM_NUMBER: &str = "whatsapp:+14155238886";
pub const DEFAULT_TWILIO_API: &str = "https://api.twilio.com";

pub const DEFAULT_TRYON_SPACE: &str = "https://nymbo-virtual-try-on.hf.space";
pub const DEFAULT_TRYON_API_NAME: &str = "tryon";

pub const DEFAULT_EMBEDDINGS_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/clip-ViT-B-32";

pub const DEFAULT_INDEX_NAME: &str = "hybrid-image-search";
pub const DEFAULT_INDEX_DIMENSION: usize = 512;
pub const DEFAULT_INDEX_METRIC: &str = "dotproduct";
pub const DEFAULT_CLOUD: &str = "aws";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_PINECONE_API: &str = "https://api.pinecone.io";

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            public_base_url: String::new(),
        }
    }
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: DEFAULT_FROM_NUMBER.to_string(),
            api_base_url: DEFAULT_TWILIO_API.to_string(),
            validate_signature: false,
        }
    }
}

impl Default for TryOnConfig {
    fn default() -> Self {
        Self {
            space_url: DEFAULT_TRYON_SPACE.to_string(),
            api_name: DEFAULT_TRYON_API_NAME.to_string(),
            hf_token: None,
        }
    }
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EMBEDDINGS_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            cloud: DEFAULT_CLOUD.to_string(),
            region: DEFAULT_REGION.to_string(),
            dimension: DEFAULT_INDEX_DIMENSION,
            metric: DEFAULT_INDEX_METRIC.to_string(),
            control_plane_url: DEFAULT_PINECONE_API.to_string(),
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("corpus"),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            scratch_dir: PathBuf::from("scratch"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: PathBuf::from("logs"),
        }
    }
}
