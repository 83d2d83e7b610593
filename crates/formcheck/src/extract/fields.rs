use serde::{Deserialize, Serialize};

use crate::ocr::Token;
use crate::page::PageSize;

/// A keyword-anchored region with geometry in integer percent of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedField {
    #[serde(rename = "text")]
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl NormalizedField {
    fn is_within_page(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| (0..=100).contains(v))
    }
}

/// Fields found on a template, in token scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    pub fields: Vec<NormalizedField>,
}

impl FieldMap {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedField> {
        self.fields.iter()
    }
}

pub struct FieldExtractor {
    /// Lowercased, trimmed, non-empty; configured order is preserved.
    keywords: Vec<String>,
}

impl FieldExtractor {
    pub fn new(keywords: &[String]) -> Self {
        let keywords = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// First configured keyword contained in `text`, if any.
    pub fn match_keyword(&self, text: &str) -> Option<&str> {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        self.keywords
            .iter()
            .find(|keyword| normalized.contains(keyword.as_str()))
            .map(String::as_str)
    }

    /// Emits at most one field per token, in token order.
    pub fn extract(&self, tokens: &[Token], page: PageSize) -> FieldMap {
        let mut fields = Vec::new();

        for token in tokens {
            let Some(keyword) = self.match_keyword(&token.text) else {
                continue;
            };

            let field = NormalizedField {
                label: token.text.trim().to_string(),
                x: to_percent(token.left, page.width()),
                y: to_percent(token.top, page.height()),
                width: to_percent(token.width, page.width()),
                height: to_percent(token.height, page.height()),
            };

            if !field.is_within_page() {
                tracing::warn!(
                    label = %field.label,
                    x = field.x,
                    y = field.y,
                    "Token box lies outside the page, keeping out-of-range field"
                );
            }

            tracing::trace!(label = %field.label, keyword, "Matched field keyword");
            fields.push(field);
        }

        tracing::debug!(
            tokens = tokens.len(),
            fields = fields.len(),
            "Extracted template fields"
        );

        FieldMap { fields }
    }
}

/// `value / extent * 100`, rounded to the nearest integer with halves rounding up.
pub fn to_percent(value: i32, extent: u32) -> i32 {
    let numerator = i64::from(value) * 100;
    let extent = i64::from(extent);
    (2 * numerator + extent).div_euclid(2 * extent) as i32
}
