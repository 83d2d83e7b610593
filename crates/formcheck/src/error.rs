use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a failure, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    InvalidInput,
    UnsupportedFormat,
    DependencyFailure,
    DependencyTimeout,
    DegenerateGeometry,
    Configuration,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid-input",
            Self::UnsupportedFormat => "unsupported-format",
            Self::DependencyFailure => "dependency-failure",
            Self::DependencyTimeout => "dependency-timeout",
            Self::DegenerateGeometry => "degenerate-geometry",
            Self::Configuration => "configuration",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum FormcheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    #[error("Verification error: {0}")]
    Verify(#[from] VerifyError),
}

impl FormcheckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            Self::Process(e) => e.kind(),
            Self::Verify(e) => e.kind(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image: {0}")]
    InvalidImage(String),

    #[error("Failed to process PDF: {0}")]
    PdfProcessing(String),

    #[error("Failed to process DOCX: {0}")]
    DocxProcessing(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: String, secs: u64 },
}

impl ProcessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Self::InvalidImage(_) => ErrorKind::InvalidInput,
            Self::Timeout { .. } => ErrorKind::DependencyTimeout,
            Self::ReadDocument { .. }
            | Self::PdfProcessing(_)
            | Self::DocxProcessing(_)
            | Self::OcrFailed(_) => ErrorKind::DependencyFailure,
        }
    }
}

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Both resume and reference template must be uploaded (missing {0})")]
    MissingDocument(DocumentRole),

    #[error("The {0} document produced no pages")]
    EmptyDocument(DocumentRole),

    #[error("Page has degenerate geometry {width}x{height}")]
    DegenerateGeometry { width: u32, height: u32 },
}

impl VerifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingDocument(_) | Self::EmptyDocument(_) => ErrorKind::InvalidInput,
            Self::DegenerateGeometry { .. } => ErrorKind::DegenerateGeometry,
        }
    }
}

/// Which side of a verification a document plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    Template,
    Candidate,
}

impl std::fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Template => f.write_str("template"),
            Self::Candidate => f.write_str("candidate"),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormcheckError>;
