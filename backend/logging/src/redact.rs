//! Log Redaction
//!
//! Scrubs phone numbers, bearer tokens, and Twilio SIDs from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap()
});
static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)|(Basic\s+[a-zA-Z0-9+/]+=*)").unwrap()
});
static ACCOUNT_SID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bAC[0-9a-fA-F]{32}\b").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    let redacted = ACCOUNT_SID_RE.replace_all(&redacted, "[REDACTED_SID]");
    TELEPHONE_RE
        .replace_all(&redacted, "[REDACTED_PHONE]")
        .into_owned()
}

/// Mask a sender address for log fields, keeping the channel prefix and
/// the last four digits: `whatsapp:+14155550100` → `whatsapp:+*******0100`.
pub fn mask_sender(sender: &str) -> String {
    let (prefix, number) = match sender.rsplit_once(':') {
        Some((p, n)) => (format!("{p}:"), n),
        None => (String::new(), sender),
    };
    let digits = number.chars().filter(char::is_ascii_digit).count();
    if digits <= 4 {
        return format!("{prefix}{number}");
    }
    let mut seen = 0;
    let masked: String = number
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                if seen <= digits - 4 { '*' } else { c }
            } else {
                c
            }
        })
        .collect();
    format!("{prefix}{masked}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "Sending to +1-555-123-4567 with Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("+1-555-123-4567"));
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
    }

    #[test]
    fn redacts_account_sid() {
        let raw = "GET /Accounts/AC0123456789abcdef0123456789abcdef/Messages";
        assert!(redact_sensitive_data(raw).contains("[REDACTED_SID]"));
    }

    #[test]
    fn masks_whatsapp_sender() {
        assert_eq!(mask_sender("whatsapp:+14155550100"), "whatsapp:+*******0100");
        assert_eq!(mask_sender("+1234"), "+1234");
        assert_eq!(mask_sender("5550100123"), "******0123");
    }
}
