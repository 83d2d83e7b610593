//! Verification reports: per-mode result lists plus an aggregate score.

pub mod pdf;

use serde::{Deserialize, Serialize};

use crate::config::VerificationMode;
use crate::matcher::context::round2;
use crate::matcher::{FieldResult, HeadingResult, MatchStatus};

pub use pdf::render_report_pdf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub matched: usize,
    /// Aggregate accuracy in percent, two decimals.
    pub accuracy: f64,
}

impl ReportSummary {
    pub fn for_fields(results: &[FieldResult]) -> Self {
        let total = results.len();
        let matched = results.iter().filter(|r| r.matched).count();
        let accuracy = if total == 0 {
            0.0
        } else {
            round2(matched as f64 / total as f64 * 100.0)
        };

        Self {
            total,
            matched,
            accuracy,
        }
    }

    pub fn for_headings(results: &[HeadingResult]) -> Self {
        let total = results.len();
        let matched = results
            .iter()
            .filter(|r| r.status == MatchStatus::Match)
            .count();
        let accuracy = if total == 0 {
            0.0
        } else {
            round2(results.iter().map(|r| r.accuracy).sum::<f64>() / total as f64)
        };

        Self {
            total,
            matched,
            accuracy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum VerificationReport {
    Fields {
        results: Vec<FieldResult>,
        summary: ReportSummary,
    },
    Headings {
        results: Vec<HeadingResult>,
        summary: ReportSummary,
    },
}

impl VerificationReport {
    pub fn from_fields(results: Vec<FieldResult>) -> Self {
        let summary = ReportSummary::for_fields(&results);
        Self::Fields { results, summary }
    }

    pub fn from_headings(results: Vec<HeadingResult>) -> Self {
        let summary = ReportSummary::for_headings(&results);
        Self::Headings { results, summary }
    }

    pub fn mode(&self) -> VerificationMode {
        match self {
            Self::Fields { .. } => VerificationMode::Fields,
            Self::Headings { .. } => VerificationMode::Headings,
        }
    }

    pub fn summary(&self) -> &ReportSummary {
        match self {
            Self::Fields { summary, .. } | Self::Headings { summary, .. } => summary,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fields { results, .. } => results.len(),
            Self::Headings { results, .. } => results.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
