//! Twilio REST client: inbound media download and outbound media messages.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::fs;
use tracing::{debug, info, warn};
use wardrobe_core::{BotError, MediaFetcher, MediaRef, Messenger};

use crate::wa_media::{parse_media_url, MediaLocator};

const API_VERSION: &str = "2010-04-01";

#[derive(Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
}

pub struct TwilioClient {
    http_client: Client,
    credentials: TwilioCredentials,
    from_number: String,
    api_base_url: String,
}

/// Media instance resource; only the `uri` is needed.
#[derive(Debug, Deserialize)]
struct MediaResource {
    uri: String,
}

impl TwilioClient {
    pub fn new(credentials: TwilioCredentials, from_number: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            credentials,
            from_number: from_number.into(),
            api_base_url: "https://api.twilio.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn account_url(&self) -> String {
        format!(
            "{}/{}/Accounts/{}",
            self.api_base_url, API_VERSION, self.credentials.account_sid
        )
    }

    /// Resolve a media locator to the URI of its binary content.
    async fn media_content_uri(&self, locator: &MediaLocator) -> Result<String> {
        let url = format!(
            "{}/Messages/{}/Media/{}.json",
            self.account_url(),
            locator.message_sid,
            locator.media_sid
        );
        let response = self
            .http_client
            .get(&url)
            .basic_auth(&self.credentials.account_sid, Some(&self.credentials.auth_token))
            .send()
            .await
            .context("Twilio media lookup request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Twilio media lookup returned HTTP {}", status);
        }

        let resource: MediaResource = response
            .json()
            .await
            .context("Failed to parse Twilio media resource")?;
        Ok(resource.uri.trim_end_matches(".json").to_string())
    }

    async fn download(&self, media: &MediaRef, dest: &Path) -> Result<PathBuf> {
        let locator = parse_media_url(media.as_str())
            .with_context(|| format!("Unrecognised media URL: {media}"))?;
        debug!(
            message_sid = %locator.message_sid,
            media_sid = %locator.media_sid,
            "Resolving inbound media"
        );

        let content_uri = self.media_content_uri(&locator).await?;
        let url = format!("{}{}", self.api_base_url, content_uri);
        debug!(url = %url, "Downloading media");

        let response = self
            .http_client
            .get(&url)
            .basic_auth(&self.credentials.account_sid, Some(&self.credentials.auth_token))
            .send()
            .await
            .context("Twilio media download failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Failed to download media: HTTP {}", status);
        }

        let bytes = response.bytes().await.context("Failed to read media body")?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(dest, &bytes)
            .await
            .with_context(|| format!("Failed to write media to {}", dest.display()))?;

        info!(path = %dest.display(), size = bytes.len(), "Media downloaded");
        Ok(dest.to_path_buf())
    }
}

#[async_trait]
impl MediaFetcher for TwilioClient {
    async fn fetch(&self, media: &MediaRef, dest: &Path) -> Result<PathBuf, BotError> {
        self.download(media, dest).await.map_err(|e| {
            warn!(error = %e, "Media fetch failed");
            BotError::media_fetch(format!("{e:#}"))
        })
    }
}

#[async_trait]
impl Messenger for TwilioClient {
    async fn send_media(&self, to: &str, body: &str, media_url: &str) -> Result<(), BotError> {
        let url = format!("{}/Messages.json", self.account_url());
        let form = [
            ("From", self.from_number.as_str()),
            ("To", to),
            ("Body", body),
            ("MediaUrl", media_url),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.credentials.account_sid, Some(&self.credentials.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| BotError::Other(anyhow::anyhow!("Twilio send failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Other(anyhow::anyhow!(
                "Twilio send returned {status}: {body}"
            )));
        }
        debug!(media_url = %media_url, "Outbound media message queued");
        Ok(())
    }
}
