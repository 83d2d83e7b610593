use std::path::PathBuf;

use crate::extract::{FieldMap, HeadingMap};
use crate::page::PageImage;

/// One template/candidate pair to verify. Either side may be absent when the
/// caller could not supply it; the verifier rejects such requests.
#[derive(Debug, Clone, Default)]
pub struct VerificationRequest {
    pub template: Option<PathBuf>,
    pub candidate: Option<PathBuf>,
}

impl VerificationRequest {
    pub fn new(template: impl Into<PathBuf>, candidate: impl Into<PathBuf>) -> Self {
        Self {
            template: Some(template.into()),
            candidate: Some(candidate.into()),
        }
    }
}

/// State threaded through the verification steps.
#[derive(Default)]
pub struct VerificationContext {
    // Step 1 results, never empty once set
    pub template_pages: Vec<PageImage>,
    pub candidate_pages: Vec<PageImage>,

    // Fields mode
    pub field_map: Option<FieldMap>,

    // Headings mode
    pub template_headings: Option<HeadingMap>,
    pub candidate_headings: Option<HeadingMap>,
}

impl VerificationContext {
    pub fn new(template_pages: Vec<PageImage>, candidate_pages: Vec<PageImage>) -> Self {
        Self {
            template_pages,
            candidate_pages,
            ..Self::default()
        }
    }
}
