//! Builder patterns for creating test data programmatically.

#![allow(dead_code)]

use std::sync::Arc;

use formcheck::config::UnknownFormatPolicy;
use formcheck::{
    Config, FormatConverter, TextRegionSource, VerificationMode, Verifier, VerifierConfig,
};

/// Builder for creating `Config` instances.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Defaults match a freshly loaded `{"version": "1.0"}`.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn mode(mut self, mode: VerificationMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn keywords(mut self, keywords: &[&str]) -> Self {
        self.config.fields.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn tolerance_px(mut self, tolerance: u32) -> Self {
        self.config.fields.tolerance_px = tolerance;
        self
    }

    pub fn context_lines(mut self, lines: usize) -> Self {
        self.config.headings.context_lines = lines;
        self
    }

    pub fn ocr_timeout_secs(mut self, secs: u64) -> Self {
        self.config.ocr.timeout_secs = secs;
        self
    }

    pub fn unknown_format(mut self, policy: UnknownFormatPolicy) -> Self {
        self.config.conversion.unknown_format = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wires a verifier around fakes.
pub fn verifier_with(
    config: &Config,
    converter: impl FormatConverter + 'static,
    source: impl TextRegionSource + 'static,
) -> Verifier {
    Verifier::new(
        Arc::new(VerifierConfig::from_config(config)),
        Box::new(converter),
        Box::new(source),
    )
}
