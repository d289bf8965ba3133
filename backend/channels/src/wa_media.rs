//! WhatsApp media locators.
//!
//! Inbound media URLs look like
//! `https://api.twilio.com/2010-04-01/Accounts/AC…/Messages/MM…/Media/ME…`;
//! the message and media SIDs are what the REST API needs to resolve them.

/// Message/media SID pair extracted from an inbound media URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLocator {
    pub message_sid: String,
    pub media_sid: String,
}

/// Extract the SIDs from the third-last and last path segments.
pub fn parse_media_url(url: &str) -> Option<MediaLocator> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();
    if segments.len() < 3 {
        return None;
    }
    let media_sid = segments[segments.len() - 1];
    let message_sid = segments[segments.len() - 3];
    if media_sid.is_empty() || message_sid.is_empty() {
        return None;
    }
    Some(MediaLocator {
        message_sid: message_sid.to_string(),
        media_sid: media_sid.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_twilio_media_url() {
        let loc = parse_media_url(
            "https://api.twilio.com/2010-04-01/Accounts/AC1/Messages/MM42/Media/ME7",
        )
        .unwrap();
        assert_eq!(loc.message_sid, "MM42");
        assert_eq!(loc.media_sid, "ME7");
    }

    #[test]
    fn ignores_query_and_trailing_slash() {
        let loc = parse_media_url("https://h/Messages/MM1/Media/ME2/?x=1").unwrap();
        assert_eq!(loc.media_sid, "ME2");
        assert_eq!(loc.message_sid, "MM1");
    }

    #[test]
    fn rejects_short_urls() {
        assert!(parse_media_url("ME2").is_none());
        assert!(parse_media_url("a/b").is_none());
    }
}
