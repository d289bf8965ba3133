use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BotError;

/// One of the three menu-selectable conversation paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    TryOn,
    TextSearch,
    ImageSearch,
}

impl Flow {
    /// Map a menu reply (`"0"`, `"1"`, `"2"`) to a flow.
    pub fn from_menu_choice(choice: &str) -> Result<Self, BotError> {
        match choice {
            "0" => Ok(Flow::TryOn),
            "1" => Ok(Flow::TextSearch),
            "2" => Ok(Flow::ImageSearch),
            other => Err(BotError::InvalidMenuChoice(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::TryOn => "try_on",
            Flow::TextSearch => "text_search",
            Flow::ImageSearch => "image_search",
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque locator for an image: a provider media URL or a local path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message received from the messaging provider.
///
/// Only the first attachment is kept; the body is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender: String,
    pub body: String,
    pub media: Option<MediaRef>,
}

impl InboundMessage {
    pub fn new(
        sender: impl Into<String>,
        body: impl AsRef<str>,
        media: Option<impl Into<String>>,
    ) -> Self {
        let media = media
            .map(Into::into)
            .filter(|m: &String| !m.trim().is_empty())
            .map(MediaRef::new);
        Self {
            sender: sender.into(),
            body: body.as_ref().trim().to_string(),
            media,
        }
    }

    /// Text-only message, mostly for tests and the CLI.
    pub fn text(sender: impl Into<String>, body: impl AsRef<str>) -> Self {
        Self::new(sender, body, None::<String>)
    }
}

/// A single match returned by the vector index, ranked by score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl SearchMatch {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
            metadata: serde_json::Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_choices_map_to_flows() {
        assert_eq!(Flow::from_menu_choice("0").unwrap(), Flow::TryOn);
        assert_eq!(Flow::from_menu_choice("1").unwrap(), Flow::TextSearch);
        assert_eq!(Flow::from_menu_choice("2").unwrap(), Flow::ImageSearch);
    }

    #[test]
    fn unknown_choice_is_rejected() {
        let err = Flow::from_menu_choice("3").unwrap_err();
        assert!(matches!(err, BotError::InvalidMenuChoice(ref c) if c == "3"));
        assert!(Flow::from_menu_choice("").is_err());
    }

    #[test]
    fn inbound_message_trims_and_drops_blank_media() {
        let msg = InboundMessage::new("whatsapp:+1", "  1 \n", Some("  "));
        assert_eq!(msg.body, "1");
        assert!(msg.media.is_none());

        let msg = InboundMessage::new("whatsapp:+1", "", Some("https://api/m/1"));
        assert_eq!(msg.media, Some(MediaRef::new("https://api/m/1")));
    }
}
