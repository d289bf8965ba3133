//! Config redaction: safe-to-display snapshots with secrets masked.

use serde_json::Value;

use crate::schema::WardrobeConfig;

static SECRET_KEYS: &[&str] = &["authToken", "apiKey", "hfToken", "token", "secret", "password"];

/// Serialize the config with every secret replaced by a short hint.
pub fn redact(config: &WardrobeConfig) -> Value {
    let value = serde_json::to_value(config).unwrap_or(Value::Null);
    redact_value(&value, "")
}

fn is_secret(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn mask(s: &str) -> String {
    if s.chars().count() > 8 {
        format!("{}***", s.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

fn redact_value(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_secret(key) && !s.is_empty() => Value::String(mask(s)),
        Value::Array(items) => Value::Array(items.iter().map(|v| redact_value(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_value(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}
