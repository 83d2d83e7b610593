use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::config::HeadingsConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub line: String,
    pub context: String,
}

/// Heading text to context, in first-seen order. Keys are unique.
#[derive(Debug, Clone, Default)]
pub struct HeadingMap {
    entries: Vec<Heading>,
    index: HashMap<String, usize>,
}

impl HeadingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts unless `line` is already present. Returns whether it was inserted.
    pub fn insert_first(&mut self, line: String, context: String) -> bool {
        if self.index.contains_key(&line) {
            return false;
        }
        self.index.insert(line.clone(), self.entries.len());
        self.entries.push(Heading { line, context });
        true
    }

    pub fn get(&self, line: &str) -> Option<&str> {
        self.index
            .get(line)
            .map(|&i| self.entries[i].context.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Heading> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for HeadingMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Serialize for HeadingMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for heading in &self.entries {
            map.serialize_entry(&heading.line, &heading.context)?;
        }
        map.end()
    }
}

pub struct HeadingExtractor {
    max_uppercase_words: usize,
    max_title_case_words: usize,
    context_lines: usize,
}

impl HeadingExtractor {
    pub fn new(config: &HeadingsConfig) -> Self {
        Self {
            max_uppercase_words: config.max_uppercase_words,
            max_title_case_words: config.max_title_case_words,
            context_lines: config.context_lines,
        }
    }

    pub fn extract(&self, text: &str) -> HeadingMap {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let mut headings = HeadingMap::new();

        for (i, line) in lines.iter().enumerate() {
            if !self.is_heading(line) {
                continue;
            }

            let end = i
                .saturating_add(1)
                .saturating_add(self.context_lines)
                .min(lines.len());
            let context = lines[i + 1..end].join(" ").trim().to_string();

            if !headings.insert_first(line.to_string(), context) {
                tracing::trace!(heading = %line, "Ignoring repeated heading");
            }
        }

        tracing::debug!(
            lines = lines.len(),
            headings = headings.len(),
            "Extracted headings"
        );

        headings
    }

    /// Layout heuristic for a trimmed, non-empty line.
    pub fn is_heading(&self, line: &str) -> bool {
        let words = line.split_whitespace().count();

        (is_uppercase(line) && words <= self.max_uppercase_words)
            || line.ends_with(':')
            || ((1..=self.max_title_case_words).contains(&words) && is_title_case(line))
    }
}

impl Default for HeadingExtractor {
    fn default() -> Self {
        Self::new(&HeadingsConfig::default())
    }
}

/// At least one cased character and no lowercase ones.
fn is_uppercase(line: &str) -> bool {
    let mut cased = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Uppercase letters only start a cased run and lowercase letters only
/// continue one; at least one cased character.
fn is_title_case(line: &str) -> bool {
    let mut cased = false;
    let mut previous_cased = false;

    for c in line.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else {
            previous_cased = false;
        }
    }

    cased
}
