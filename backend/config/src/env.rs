//! Environment handling for config values.
//!
//! `${VAR_NAME}` references in string values are resolved at load time; only
//! uppercase `[A-Z_][A-Z0-9_]*` names match. A handful of well-known variables
//! also override config fields directly so secrets never have to live in the file.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::WardrobeConfig;

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references using the process environment.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute `${VAR}` references using the given map.
///
/// Walks the value tree; only string leaves are rewritten. Unset or empty
/// variables are an error naming the config path.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    Ok(substitute(value, env, "")?)
}

fn substitute(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<Value, MissingEnvVarError> {
    match value {
        Value::String(s) => substitute_string(s, env, path).map(Value::String),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| substitute(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let child = if path.is_empty() { k.clone() } else { format!("{path}.{k}") };
                out.insert(k.clone(), substitute(v, env, &child)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    if !s.contains("${") {
        return Ok(s.to_string());
    }

    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for caps in ENV_VAR_PATTERN.captures_iter(s) {
        let Some(whole) = caps.get(0) else { continue };
        let name = &caps[1];
        out.push_str(&s[last..whole.start()]);
        match env.get(name) {
            Some(val) if !val.is_empty() => out.push_str(val),
            _ => {
                return Err(MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
            }
        }
        last = whole.end();
    }
    out.push_str(&s[last..]);
    Ok(out)
}

/// Overlay well-known environment variables onto a parsed config.
pub fn apply_env_overrides(
    mut config: WardrobeConfig,
    env: &HashMap<String, String>,
) -> WardrobeConfig {
    let get = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();

    if let Some(v) = get("TWILIO_ACCOUNT_SID") {
        config.twilio.account_sid = v;
    }
    if let Some(v) = get("TWILIO_AUTH_TOKEN") {
        config.twilio.auth_token = v;
    }
    if let Some(v) = get("PUBLIC_BASE_URL") {
        config.server.public_base_url = v;
    }
    if let Some(v) = get("PINECONE_API_KEY") {
        config.pinecone.api_key = v;
    }
    if let Some(v) = get("PINECONE_CLOUD") {
        config.pinecone.cloud = v;
    }
    if let Some(v) = get("PINECONE_REGION") {
        config.pinecone.region = v;
    }
    if let Some(v) = get("HF_TOKEN") {
        config.tryon.hf_token = Some(v.clone());
        config.embeddings.api_key.get_or_insert(v);
    }
    if let Some(port) = get("WARDROBE_PORT").and_then(|p| p.parse().ok()) {
        config.server.port = port;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_inside_strings() {
        let v = json!({"server": {"publicBaseUrl": "https://${HOST}/bot"}});
        let out = resolve_env_vars_with(&v, &env(&[("HOST", "abc.ngrok.app")])).unwrap();
        assert_eq!(out["server"]["publicBaseUrl"], "https://abc.ngrok.app/bot");
    }

    #[test]
    fn missing_var_names_path() {
        let v = json!({"twilio": {"authToken": "${TWILIO_TOKEN}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err().to_string();
        assert!(err.contains("TWILIO_TOKEN"));
        assert!(err.contains("twilio.authToken"));
    }

    #[test]
    fn lowercase_and_plain_strings_pass_through() {
        let v = json!({"a": "${lower}", "b": "plain", "c": 3});
        let out = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(out, v);
    }

    #[test]
    fn overrides_secrets_from_env() {
        let cfg = apply_env_overrides(
            WardrobeConfig::default(),
            &env(&[
                ("TWILIO_ACCOUNT_SID", "AC1"),
                ("PINECONE_REGION", "eu-west-1"),
                ("WARDROBE_PORT", "9000"),
                ("HF_TOKEN", "hf_x"),
            ]),
        );
        assert_eq!(cfg.twilio.account_sid, "AC1");
        assert_eq!(cfg.pinecone.region, "eu-west-1");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.tryon.hf_token.as_deref(), Some("hf_x"));
        assert_eq!(cfg.embeddings.api_key.as_deref(), Some("hf_x"));
    }
}
