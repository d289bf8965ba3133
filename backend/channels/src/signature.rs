//! `X-Twilio-Signature` verification.
//!
//! The signature is base64(HMAC-SHA1(auth_token, url + key/value pairs
//! sorted by key)).

use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;

pub const SIGNATURE_HEADER: &str = "x-twilio-signature";

fn signing_payload(url: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let mut payload = url.to_string();
    for (k, v) in sorted {
        payload.push_str(k);
        payload.push_str(v);
    }
    payload
}

pub fn compute_signature(auth_token: &str, url: &str, params: &[(String, String)]) -> String {
    let Ok(mut mac) = Hmac::<Sha1>::new_from_slice(auth_token.as_bytes()) else {
        return String::new();
    };
    mac.update(signing_payload(url, params).as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Constant-time check of `signature` against the expected value.
pub fn verify_signature(
    auth_token: &str,
    url: &str,
    params: &[(String, String)],
    signature: &str,
) -> bool {
    let Ok(expected) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = Hmac::<Sha1>::new_from_slice(auth_token.as_bytes()) else {
        return false;
    };
    mac.update(signing_payload(url, params).as_bytes());
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Vec<(String, String)> {
        vec![
            ("From".into(), "whatsapp:+15550001111".into()),
            ("Body".into(), "1".into()),
            ("AccountSid".into(), "AC1".into()),
        ]
    }

    #[test]
    fn payload_sorts_by_key() {
        let p = signing_payload("https://bot.example.com/webhook", &params());
        assert_eq!(
            p,
            "https://bot.example.com/webhookAccountSidAC1Body1Fromwhatsapp:+15550001111"
        );
    }

    #[test]
    fn signature_verifies_and_detects_tampering() {
        let url = "https://bot.example.com/webhook";
        let sig = compute_signature("token", url, &params());
        assert!(verify_signature("token", url, &params(), &sig));

        let mut tampered = params();
        tampered[1].1 = "2".into();
        assert!(!verify_signature("token", url, &tampered, &sig));
        assert!(!verify_signature("other", url, &params(), &sig));
        assert!(!verify_signature("token", url, &params(), "not base64!"));
    }
}
