use std::time::Duration;

use crate::config::{Config, HeadingsConfig, UnknownFormatPolicy, VerificationMode};

pub struct VerifierConfig {
    pub mode: VerificationMode,
    pub ocr_languages: Vec<String>,
    pub ocr_dpi: u32,
    /// `None` leaves OCR calls unbounded.
    pub ocr_timeout: Option<Duration>,
    pub unknown_format: UnknownFormatPolicy,
    pub keywords: Vec<String>,
    pub tolerance_px: u32,
    pub headings: HeadingsConfig,
}

impl VerifierConfig {
    pub fn from_config(config: &Config) -> Self {
        let ocr_timeout =
            (config.ocr.timeout_secs > 0).then(|| Duration::from_secs(config.ocr.timeout_secs));

        Self {
            mode: config.mode,
            ocr_languages: config.ocr.languages.clone(),
            ocr_dpi: config.ocr.dpi,
            ocr_timeout,
            unknown_format: config.conversion.unknown_format,
            keywords: config.fields.keywords.clone(),
            tolerance_px: config.fields.tolerance_px,
            headings: config.headings.clone(),
        }
    }
}
