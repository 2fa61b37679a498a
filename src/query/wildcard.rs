//! Wildcard query implementation for pattern matching.

use std::sync::Arc;

use regex::Regex;

use crate::document::analyzed::AnalyzedDocument;
use crate::error::{PercolatorError, Result};
use crate::query::query::Query;

/// A query that matches documents containing terms that match a wildcard pattern.
///
/// Supports the following wildcards:
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
/// - `\*` and `\?` match literal `*` and `?` characters
///
/// Only terms that are valid UTF-8 can match.
#[derive(Debug, Clone)]
pub struct WildcardQuery {
    field: String,
    pattern: String,
    regex: Arc<Regex>,
}

impl WildcardQuery {
    /// Node kind tag.
    pub const KIND: &'static str = "wildcard";

    /// Create a new wildcard query.
    pub fn new<F: Into<String>, P: Into<String>>(field: F, pattern: P) -> Result<Self> {
        let pattern = pattern.into();
        let regex = Self::compile_pattern(&pattern)?;

        Ok(WildcardQuery {
            field: field.into(),
            pattern,
            regex: Arc::new(regex),
        })
    }

    /// Get the wildcard pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Literal prefix before the first wildcard character.
    pub fn literal_prefix(&self) -> String {
        let mut prefix = String::new();
        let mut chars = self.pattern.chars();
        while let Some(c) = chars.next() {
            match c {
                '*' | '?' => break,
                '\\' => match chars.next() {
                    Some(escaped) => prefix.push(escaped),
                    None => prefix.push('\\'),
                },
                c => prefix.push(c),
            }
        }
        prefix
    }

    /// Compile a wildcard pattern into an anchored regex.
    fn compile_pattern(pattern: &str) -> Result<Regex> {
        let mut regex_pattern = String::from("^");
        let mut chars = pattern.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => regex_pattern.push_str(&regex::escape(&escaped.to_string())),
                    None => regex_pattern.push_str("\\\\"),
                },
                '*' => regex_pattern.push_str(".*"),
                '?' => regex_pattern.push('.'),
                c => regex_pattern.push_str(&regex::escape(&c.to_string())),
            }
        }
        regex_pattern.push('$');

        Regex::new(&regex_pattern)
            .map_err(|e| PercolatorError::parse(format!("Invalid wildcard pattern: {e}")))
    }

    /// Check if a term matches the wildcard pattern.
    pub fn matches_term(&self, term: &str) -> bool {
        self.regex.is_match(term)
    }
}

impl Query for WildcardQuery {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn matches(&self, doc: &AnalyzedDocument) -> Result<bool> {
        let Some(field) = doc.field(&self.field) else {
            return Ok(false);
        };
        Ok(field.terms().any(|term| {
            std::str::from_utf8(term)
                .map(|text| self.matches_term(text))
                .unwrap_or(false)
        }))
    }

    fn description(&self) -> String {
        format!("{}:{}", self.field, self.pattern)
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn field(&self) -> Option<&str> {
        Some(&self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::WhitespaceAnalyzer;
    use crate::document::document::InputDocument;

    #[test]
    fn test_pattern_matching() {
        let query = WildcardQuery::new("f", "te?t*").unwrap();

        assert!(query.matches_term("test"));
        assert!(query.matches_term("textbook"));
        assert!(!query.matches_term("tet"));
        assert!(!query.matches_term("atest"));
    }

    #[test]
    fn test_escaped_wildcards_and_regex_chars() {
        let query = WildcardQuery::new("f", r"a\*b.c").unwrap();

        assert!(query.matches_term("a*b.c"));
        assert!(!query.matches_term("axxb.c"));
        assert!(!query.matches_term("a*bxc"));
    }

    #[test]
    fn test_literal_prefix() {
        assert_eq!(WildcardQuery::new("f", "abc*d").unwrap().literal_prefix(), "abc");
        assert_eq!(WildcardQuery::new("f", "*").unwrap().literal_prefix(), "");
    }

    #[test]
    fn test_matches_document() {
        let doc = InputDocument::builder("d").add_text("f", "wibble wobble").build();
        let doc = AnalyzedDocument::analyze(&doc, &WhitespaceAnalyzer::new()).unwrap();

        assert!(WildcardQuery::new("f", "wo*").unwrap().matches(&doc).unwrap());
        assert!(!WildcardQuery::new("g", "wo*").unwrap().matches(&doc).unwrap());
        assert!(!WildcardQuery::new("f", "x*").unwrap().matches(&doc).unwrap());
    }
}
