use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default)]
    pub mode: VerificationMode,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub fields: FieldsConfig,
    #[serde(default)]
    pub headings: HeadingsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            mode: VerificationMode::default(),
            ocr: OcrConfig::default(),
            conversion: ConversionConfig::default(),
            fields: FieldsConfig::default(),
            headings: HeadingsConfig::default(),
        }
    }
}

/// Which extraction strategy a deployment verifies with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMode {
    /// Keyword-anchored fields compared by position.
    #[default]
    Fields,
    /// Section headings compared by the text that follows them.
    Headings,
}

impl std::fmt::Display for VerificationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fields => f.write_str("fields"),
            Self::Headings => f.write_str("headings"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    /// Upper bound for a single OCR call. Zero disables the bound.
    #[serde(default = "default_ocr_timeout")]
    pub timeout_secs: u64,
}

fn default_languages() -> Vec<String> {
    vec!["eng".to_string()]
}

fn default_dpi() -> u32 {
    300
}

fn default_ocr_timeout() -> u64 {
    120
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            dpi: default_dpi(),
            timeout_secs: default_ocr_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionConfig {
    #[serde(default)]
    pub unknown_format: UnknownFormatPolicy,
}

/// What to do with a document whose extension is not recognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFormatPolicy {
    /// Treat the file as an already rasterized image.
    #[default]
    Passthrough,
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldsConfig {
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    #[serde(default = "default_tolerance")]
    pub tolerance_px: u32,
}

pub fn default_keywords() -> Vec<String> {
    [
        "name",
        "contact",
        "phone",
        "mobile",
        "reference",
        "work experience",
        "experience",
        "education",
        "qualification",
        "skill",
        "skills",
        "signature",
        "date",
        "dob",
        "email",
        "certificate",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

fn default_tolerance() -> u32 {
    30
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            tolerance_px: default_tolerance(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingsConfig {
    #[serde(default = "default_max_uppercase_words")]
    pub max_uppercase_words: usize,
    #[serde(default = "default_max_title_case_words")]
    pub max_title_case_words: usize,
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,
}

fn default_max_uppercase_words() -> usize {
    6
}

fn default_max_title_case_words() -> usize {
    4
}

fn default_context_lines() -> usize {
    3
}

impl Default for HeadingsConfig {
    fn default() -> Self {
        Self {
            max_uppercase_words: default_max_uppercase_words(),
            max_title_case_words: default_max_title_case_words(),
            context_lines: default_context_lines(),
        }
    }
}
