//! `wardrobe-config` — runtime configuration for the wardrobe bot.
//!
//! Provides:
//! - Typed config schema (server, messaging provider, try-on, search, storage)
//! - YAML read/write
//! - `${ENV_VAR}` substitution and environment overrides for secrets
//! - Default values
//! - Validation of everything required before the first request
//! - Redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{apply_env_overrides, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_raw, write_config};
pub use redact::redact;
pub use schema::{
    CorpusConfig, EmbeddingsConfig, LoggingConfig, PineconeConfig, ServerConfig, StorageConfig,
    TryOnConfig, TwilioConfig, WardrobeConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load a config file, substitute `${VAR}` references, apply environment
/// overrides, and log validation findings.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<WardrobeConfig> {
    let env: HashMap<String, String> = std::env::vars().collect();
    load_and_prepare_with(path, &env).await
}

/// Same as [`load_and_prepare`] with an explicit environment (for tests).
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<WardrobeConfig> {
    let raw = load_raw(path).await?;
    let value = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;
    let value = match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };

    let config: WardrobeConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;
    let config = apply_env_overrides(config, env);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }

    Ok(config)
}

/// Fail unless the config carries everything needed to serve requests.
pub fn require_valid(config: &WardrobeConfig) -> Result<()> {
    let report = validate(config);
    if report.is_valid() {
        return Ok(());
    }
    let details: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
    anyhow::bail!("invalid configuration:\n  {}", details.join("\n  "))
}
