//! Build the runtime components from configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use wardrobe_channels::{TwilioClient, TwilioCredentials};
use wardrobe_config::{PineconeConfig, WardrobeConfig};
use wardrobe_core::InMemorySessionStore;
use wardrobe_gateway::{GatewayState, SignatureCheck};
use wardrobe_media::StaticPublisher;
use wardrobe_routing::{ConversationRouter, FlowExecutor};
use wardrobe_search::{
    CatalogSearch, ClipEmbeddings, DirectoryCorpus, IndexDescription, IndexSpec, PineconeControl,
    PineconeIndex,
};
use wardrobe_tryon::GradioTryOn;

pub fn index_spec(config: &PineconeConfig) -> IndexSpec {
    IndexSpec {
        name: config.index_name.clone(),
        dimension: config.dimension,
        metric: config.metric.clone(),
        cloud: config.cloud.clone(),
        region: config.region.clone(),
    }
}

/// Create the index if needed and wait for it to be ready.
pub async fn ensure_index(config: &PineconeConfig) -> Result<IndexDescription> {
    if config.api_key.is_empty() {
        anyhow::bail!("pinecone.apiKey is not set (PINECONE_API_KEY)");
    }
    let control = PineconeControl::new(&config.api_key, &config.control_plane_url);
    let description = control
        .ensure_index(&index_spec(config))
        .await
        .with_context(|| format!("Failed to prepare index {}", config.index_name))?;
    info!(index = %description.name, host = %description.host, "Index ready");
    Ok(description)
}

/// Catalog search over the configured index and corpus. The corpus handle is
/// returned too so callers can show file names.
pub async fn open_catalog(
    config: &WardrobeConfig,
) -> Result<(CatalogSearch, Arc<DirectoryCorpus>)> {
    let description = ensure_index(&config.pinecone).await?;
    let index = PineconeIndex::new(&config.pinecone.api_key, &description.host);
    let embedder = ClipEmbeddings::new(&config.embeddings.base_url, &config.embeddings.model)
        .with_api_key(config.embeddings.api_key.clone())
        .with_dimension(config.pinecone.dimension);
    let corpus = Arc::new(DirectoryCorpus::load(&config.corpus.dir)?);

    let search = CatalogSearch::new(Arc::new(embedder), Arc::new(index), corpus.clone());
    Ok((search, corpus))
}

pub async fn gateway_state(config: &WardrobeConfig) -> Result<GatewayState> {
    let (catalog, _) = open_catalog(config).await?;

    let twilio = Arc::new(
        TwilioClient::new(
            TwilioCredentials {
                account_sid: config.twilio.account_sid.clone(),
                auth_token: config.twilio.auth_token.clone(),
            },
            &config.twilio.from_number,
        )
        .with_base_url(&config.twilio.api_base_url),
    );
    let publisher = Arc::new(StaticPublisher::new(
        &config.storage.static_dir,
        &config.server.public_base_url,
    ));
    let tryon = Arc::new(
        GradioTryOn::new(
            &config.tryon.space_url,
            &config.tryon.api_name,
            &config.storage.scratch_dir,
        )
        .with_token(config.tryon.hf_token.clone()),
    );

    let flows = FlowExecutor::new(
        twilio.clone(),
        publisher,
        tryon,
        catalog,
        &config.storage.scratch_dir,
    );
    let router = ConversationRouter::new(Arc::new(InMemorySessionStore::new()), twilio, flows);

    Ok(GatewayState {
        router,
        signature: signature_check(config),
    })
}

fn signature_check(config: &WardrobeConfig) -> Option<SignatureCheck> {
    config.twilio.validate_signature.then(|| SignatureCheck {
        auth_token: config.twilio.auth_token.clone(),
        webhook_url: format!(
            "{}/webhook",
            config.server.public_base_url.trim_end_matches('/')
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_spec_follows_config() {
        let spec = index_spec(&PineconeConfig::default());
        assert_eq!(spec.name, "hybrid-image-search");
        assert_eq!(spec.dimension, 512);
        assert_eq!(spec.metric, "dotproduct");
        assert_eq!((spec.cloud.as_str(), spec.region.as_str()), ("aws", "us-east-1"));
    }

    #[test]
    fn signature_url_is_public_webhook() {
        let mut config = WardrobeConfig::default();
        assert!(signature_check(&config).is_none());

        config.twilio.validate_signature = true;
        config.twilio.auth_token = "tok".into();
        config.server.public_base_url = "https://bot.example.com/".into();
        let check = signature_check(&config).unwrap();
        assert_eq!(check.webhook_url, "https://bot.example.com/webhook");
    }

    #[tokio::test]
    async fn ensure_index_requires_api_key() {
        let err = ensure_index(&PineconeConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("apiKey"));
    }
}
