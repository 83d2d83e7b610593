use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::extract::HeadingMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Match,
    Mismatch,
    Missing,
}

/// Verdict for one template heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingResult {
    pub heading: String,
    pub template_context: String,
    /// `None` when the candidate lacks the heading.
    pub resume_context: Option<String>,
    pub status: MatchStatus,
    pub accuracy: f64,
}

#[derive(Debug, Default)]
pub struct ContextMatcher;

impl ContextMatcher {
    pub fn new() -> Self {
        Self
    }

    /// One result per template heading, in template order. Headings that
    /// only the candidate has are not reported.
    pub fn compare(&self, template: &HeadingMap, candidate: &HeadingMap) -> Vec<HeadingResult> {
        let results: Vec<HeadingResult> = template
            .iter()
            .map(|heading| {
                let template_context = heading.context.clone();

                let Some(resume_context) = candidate.get(&heading.line) else {
                    return HeadingResult {
                        heading: heading.line.clone(),
                        template_context,
                        resume_context: None,
                        status: MatchStatus::Missing,
                        accuracy: 0.0,
                    };
                };

                let (status, accuracy) =
                    if normalize(&template_context) == normalize(resume_context) {
                        (MatchStatus::Match, 100.0)
                    } else {
                        (
                            MatchStatus::Mismatch,
                            word_overlap(&template_context, resume_context),
                        )
                    };

                HeadingResult {
                    heading: heading.line.clone(),
                    template_context,
                    resume_context: Some(resume_context.to_string()),
                    status,
                    accuracy,
                }
            })
            .collect();

        tracing::debug!(
            headings = results.len(),
            missing = results
                .iter()
                .filter(|r| r.status == MatchStatus::Missing)
                .count(),
            "Compared heading contexts"
        );

        results
    }
}

fn normalize(context: &str) -> String {
    context.trim().to_lowercase()
}

fn words(context: &str) -> HashSet<String> {
    context
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Share of the template's distinct words found in the candidate, as a
/// percentage rounded to two decimals.
pub fn word_overlap(template_context: &str, candidate_context: &str) -> f64 {
    let template_words = words(template_context);
    let candidate_words = words(candidate_context);

    let common = template_words.intersection(&candidate_words).count();
    let ratio = common as f64 / template_words.len().max(1) as f64;

    round2(ratio * 100.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
