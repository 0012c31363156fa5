use std::collections::HashMap;

use log::debug;
use regex::Regex;

use crate::{error::CrawlError, numbers::NumberConvention, text_manipulators::snippet};

/// Ordered text patterns with named captures, plus the capture names that
/// have to be found for the text to count as parsed.
#[derive(Debug)]
pub struct PatternSet {
    patterns: Vec<Regex>,
    required: Vec<&'static str>,
}

impl PatternSet {
    pub fn new(patterns: &[&str], required: &[&'static str]) -> Result<Self, CrawlError> {
        let patterns = patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
            required: required.to_vec(),
        })
    }

    /// Runs every pattern once against `text`, in order.
    ///
    /// Patterns that don't match are skipped. A capture already taken by an
    /// earlier pattern is kept, so later patterns only act as fallbacks.
    pub fn extract(&self, text: &str) -> Result<Fields, CrawlError> {
        let mut values = HashMap::new();
        for pattern in &self.patterns {
            let Some(caps) = pattern.captures(text) else {
                debug!("pattern /{}/ did not match", pattern.as_str());
                continue;
            };
            for name in pattern.capture_names().flatten() {
                if let Some(m) = caps.name(name) {
                    values
                        .entry(name.to_string())
                        .or_insert_with(|| m.as_str().to_string());
                }
            }
        }

        if let Some(missing) = self.required.iter().find(|f| !values.contains_key(**f)) {
            return Err(CrawlError::RequiredFieldMissing {
                field: missing.to_string(),
                source_text: snippet(text),
            });
        }

        Ok(Fields { values })
    }
}

/// Raw captures keyed by field name.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Fields {
    values: HashMap<String, String>,
}

impl Fields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Absent fields read as 0.
    pub fn integer(&self, name: &str, convention: &NumberConvention) -> Result<u64, CrawlError> {
        convention.parse_integer(self.get(name).unwrap_or_default())
    }

    pub fn float(&self, name: &str, convention: &NumberConvention) -> Result<f64, CrawlError> {
        convention.parse_float(self.get(name).unwrap_or_default())
    }

    /// Adds the captures of `other` that are not already present.
    pub fn merge(&mut self, other: Fields) {
        for (name, value) in other.values {
            self.values.entry(name).or_insert(value);
        }
    }
}
