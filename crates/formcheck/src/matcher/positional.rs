use serde::{Deserialize, Serialize};

use crate::extract::{FieldMap, NormalizedField};
use crate::ocr::Token;
use crate::page::PageSize;

/// Verdict for one template field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldResult {
    pub text: String,
    #[serde(rename = "match")]
    pub matched: bool,
    /// Where the field should sit on the candidate page, in pixels.
    pub expected_position: [i64; 2],
}

pub struct PositionalMatcher {
    tolerance: i64,
}

impl PositionalMatcher {
    pub fn new(tolerance_px: u32) -> Self {
        Self {
            tolerance: i64::from(tolerance_px),
        }
    }

    pub fn match_fields(
        &self,
        fields: &FieldMap,
        tokens: &[Token],
        page: PageSize,
    ) -> Vec<FieldResult> {
        let results: Vec<FieldResult> = fields
            .iter()
            .map(|field| self.match_field(field, tokens, page))
            .collect();

        tracing::debug!(
            fields = results.len(),
            matched = results.iter().filter(|r| r.matched).count(),
            "Compared field positions"
        );

        results
    }

    fn match_field(&self, field: &NormalizedField, tokens: &[Token], page: PageSize) -> FieldResult {
        let (expected_x, expected_y) = expected_position(field, page);
        let label = field.label.to_lowercase();

        let matched = tokens.iter().any(|token| {
            token.text.trim().to_lowercase() == label
                && (i64::from(token.left) - expected_x).abs() <= self.tolerance
                && (i64::from(token.top) - expected_y).abs() <= self.tolerance
        });

        FieldResult {
            text: field.label.clone(),
            matched,
            expected_position: [expected_x, expected_y],
        }
    }
}

/// Projects a field's percent position onto `page`, flooring to whole pixels.
pub fn expected_position(field: &NormalizedField, page: PageSize) -> (i64, i64) {
    let x = (i64::from(field.x) * i64::from(page.width())).div_euclid(100);
    let y = (i64::from(field.y) * i64::from(page.height())).div_euclid(100);
    (x, y)
}
