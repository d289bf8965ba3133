//! `wardrobe config` subcommands.

use std::path::Path;

use anyhow::Result;
use wardrobe_config::{redact, validate, write_config, WardrobeConfig};

use crate::terminal_output::{note_error, note_success, note_warn};

/// Print the effective config with secrets masked, then any findings.
pub fn show(config: &WardrobeConfig) -> Result<()> {
    print!("{}", serde_yaml::to_string(&redact(config))?);

    let report = validate(config);
    for warning in &report.warnings {
        note_warn(&warning.to_string());
    }
    for error in &report.errors {
        note_error(&error.to_string());
    }
    Ok(())
}

/// Write a default config file unless one already exists.
pub async fn init(path: &Path) -> Result<bool> {
    if path.exists() {
        note_warn(&format!("{} already exists; leaving it untouched", path.display()));
        return Ok(false);
    }
    write_config(&WardrobeConfig::default(), path).await?;
    note_success(&format!("Wrote default config to {}", path.display()));
    Ok(true)
}
