//! Config validation with path-qualified messages.

use crate::schema::WardrobeConfig;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn require(&mut self, path: &str, value: &str, what: &str) {
        if value.trim().is_empty() {
            self.error(path, format!("{what} is required"));
        }
    }
}

pub fn validate(config: &WardrobeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_twilio(config, &mut report);
    validate_pinecone(config, &mut report);
    validate_tryon(config, &mut report);
    report
}

fn validate_server(config: &WardrobeConfig, report: &mut ValidationReport) {
    let url = config.server.public_base_url.trim();
    report.require("server.publicBaseUrl", url, "Public base URL");
    if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
        report.error("server.publicBaseUrl", "Must be an absolute http(s) URL");
    }
    if url.starts_with("http://") {
        report.warn("server.publicBaseUrl", "WhatsApp media URLs should be served over https");
    }
    if config.server.port == 0 {
        report.error("server.port", "Port must be > 0");
    }
}

fn validate_twilio(config: &WardrobeConfig, report: &mut ValidationReport) {
    let tw = &config.twilio;
    report.require("twilio.accountSid", &tw.account_sid, "Twilio account SID");
    report.require("twilio.authToken", &tw.auth_token, "Twilio auth token");
    if !tw.account_sid.is_empty() && !tw.account_sid.starts_with("AC") {
        report.warn("twilio.accountSid", "Account SIDs normally start with 'AC'");
    }
    if !tw.from_number.starts_with("whatsapp:") {
        report.warn("twilio.fromNumber", "Sender is not a 'whatsapp:' address");
    }
}

fn validate_pinecone(config: &WardrobeConfig, report: &mut ValidationReport) {
    let pc = &config.pinecone;
    report.require("pinecone.apiKey", &pc.api_key, "Pinecone API key");
    report.require("pinecone.indexName", &pc.index_name, "Index name");
    report.require("pinecone.cloud", &pc.cloud, "Cloud provider");
    report.require("pinecone.region", &pc.region, "Cloud region");
    if pc.dimension == 0 {
        report.error("pinecone.dimension", "Dimension must be > 0");
    }
    if !matches!(pc.metric.as_str(), "dotproduct" | "cosine" | "euclidean") {
        report.error(
            "pinecone.metric",
            format!("Unknown metric '{}'. Use 'dotproduct', 'cosine', or 'euclidean'", pc.metric),
        );
    }
}

fn validate_tryon(config: &WardrobeConfig, report: &mut ValidationReport) {
    report.require("tryon.spaceUrl", &config.tryon.space_url, "Try-on space URL");
    if config.tryon.hf_token.is_none() {
        report.warn("tryon.hfToken", "No Hugging Face token; anonymous quota applies");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> WardrobeConfig {
        let mut cfg = WardrobeConfig::default();
        cfg.server.public_base_url = "https://bot.example.com".into();
        cfg.twilio.account_sid = "AC123".into();
        cfg.twilio.auth_token = "secret".into();
        cfg.pinecone.api_key = "pc".into();
        cfg
    }

    #[test]
    fn defaults_alone_are_invalid() {
        let report = validate(&WardrobeConfig::default());
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"server.publicBaseUrl"));
        assert!(paths.contains(&"twilio.accountSid"));
        assert!(paths.contains(&"twilio.authToken"));
        assert!(paths.contains(&"pinecone.apiKey"));
    }

    #[test]
    fn complete_config_is_valid() {
        let report = validate(&complete());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
    }

    #[test]
    fn relative_public_url_is_error() {
        let mut cfg = complete();
        cfg.server.public_base_url = "bot.example.com".into();
        assert!(!validate(&cfg).is_valid());
    }

    #[test]
    fn unknown_metric_is_error() {
        let mut cfg = complete();
        cfg.pinecone.metric = "hamming".into();
        let report = validate(&cfg);
        assert_eq!(report.errors[0].path, "pinecone.metric");
    }
}
