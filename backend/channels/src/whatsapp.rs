//! Twilio WhatsApp webhook payloads and TwiML replies.

use quick_xml::escape::escape;
use wardrobe_core::InboundMessage;

/// Content type of a TwiML reply document.
pub const TWIML_CONTENT_TYPE: &str = "application/xml";

/// The subset of Twilio's inbound-message form we act on.
///
/// Twilio posts many more fields; unknown ones are ignored. Every field is
/// defaulted so a malformed delivery still gets a well-formed reply.
#[derive(Debug, Clone, Default)]
pub struct WebhookForm {
    pub from: String,
    pub body: String,
    pub media_url0: Option<String>,
}

impl WebhookForm {
    /// Build from raw form pairs (as needed for signature checks).
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut form = WebhookForm::default();
        for (k, v) in pairs {
            match k.as_str() {
                "From" => form.from = v.clone(),
                "Body" => form.body = v.clone(),
                "MediaUrl0" => form.media_url0 = Some(v.clone()),
                _ => {}
            }
        }
        form
    }

    /// `None` when the delivery has no sender to reply to.
    pub fn into_inbound(self) -> Option<InboundMessage> {
        if self.from.trim().is_empty() {
            return None;
        }
        Some(InboundMessage::new(self.from, self.body, self.media_url0))
    }
}

/// A TwiML `<Response>` with zero or more `<Message>` verbs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagingResponse {
    messages: Vec<String>,
}

impl MessagingResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&mut self, text: impl Into<String>) -> &mut Self {
        self.messages.push(text.into());
        self
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#);
        for msg in &self.messages {
            xml.push_str("<Message>");
            xml.push_str(&escape(msg.as_str()));
            xml.push_str("</Message>");
        }
        xml.push_str("</Response>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_response_is_well_formed() {
        assert_eq!(
            MessagingResponse::new().to_xml(),
            r#"<?xml version="1.0" encoding="UTF-8"?><Response></Response>"#
        );
    }

    #[test]
    fn messages_are_escaped() {
        let mut resp = MessagingResponse::new();
        resp.message("Tom & Jerry <3");
        assert!(resp.to_xml().contains("<Message>Tom &amp; Jerry &lt;3</Message>"));
    }

    #[test]
    fn form_pairs_map_to_inbound() {
        let form = WebhookForm::from_pairs(&pairs(&[
            ("From", "whatsapp:+15550001111"),
            ("Body", "  2 "),
            ("MediaUrl0", "https://api.twilio.com/x/Messages/MM1/Media/ME1"),
            ("MediaUrl1", "ignored"),
            ("AccountSid", "AC1"),
        ]));
        let msg = form.into_inbound().unwrap();
        assert_eq!(msg.sender, "whatsapp:+15550001111");
        assert_eq!(msg.body, "2");
        assert_eq!(
            msg.media.unwrap().as_str(),
            "https://api.twilio.com/x/Messages/MM1/Media/ME1"
        );
    }

    #[test]
    fn missing_sender_is_dropped() {
        let form = WebhookForm::from_pairs(&pairs(&[("Body", "hi")]));
        assert!(form.into_inbound().is_none());
    }
}
