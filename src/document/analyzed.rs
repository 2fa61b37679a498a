//! Analyzed documents: the per-field term view used by matching.
//!
//! ```text
//! InputDocument → Analyzer → AnalyzedDocument → candidate selection + evaluation
//! ```
//!
//! Every document is analyzed exactly once per match call; the presearcher and
//! the exact evaluation both read the same [`AnalyzedDocument`], so the term
//! encoding seen by the filter is the one seen by the evaluator.

use ahash::AHashMap;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::NumericTokenizer;
use crate::document::document::InputDocument;
use crate::document::field_value::FieldValue;
use crate::error::Result;

/// Position gap inserted between two values of the same field.
pub const POSITION_GAP: usize = 100;

/// One occurrence of a term in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermOccurrence {
    /// Token position within the field (values separated by [`POSITION_GAP`])
    pub position: usize,
    /// Index of the field value the term came from
    pub value_index: usize,
    /// Byte offset where the term starts within its value
    pub start_offset: usize,
    /// Byte offset where the term ends within its value
    pub end_offset: usize,
}

/// The analyzed terms of a single field.
#[derive(Debug, Clone, Default)]
pub struct FieldTerms {
    terms: AHashMap<Vec<u8>, Vec<TermOccurrence>>,
    length: usize,
}

impl FieldTerms {
    fn push(&mut self, token: Token, position: usize, value_index: usize) {
        self.length += 1;
        self.terms.entry(token.term).or_default().push(TermOccurrence {
            position,
            value_index,
            start_offset: token.start_offset,
            end_offset: token.end_offset,
        });
    }

    /// Check whether the field contains the term.
    pub fn contains(&self, term: &[u8]) -> bool {
        self.terms.contains_key(term)
    }

    /// Occurrences of a term, ordered by position.
    pub fn occurrences(&self, term: &[u8]) -> &[TermOccurrence] {
        self.terms.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct terms of this field.
    pub fn terms(&self) -> impl Iterator<Item = &[u8]> {
        self.terms.keys().map(Vec::as_slice)
    }

    /// Number of distinct terms.
    pub fn unique_terms(&self) -> usize {
        self.terms.len()
    }

    /// Number of tokens, counting repeats.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// A document after analysis, keyed by field name.
#[derive(Debug, Clone)]
pub struct AnalyzedDocument {
    id: String,
    fields: AHashMap<String, FieldTerms>,
}

impl AnalyzedDocument {
    /// Analyze an input document.
    ///
    /// Text values use `analyzer`; numeric values are encoded with the default
    /// [`NumericTokenizer`]; binary values become one raw term.
    pub fn analyze(document: &InputDocument, analyzer: &dyn Analyzer) -> Result<Self> {
        let mut fields: AHashMap<String, FieldTerms> = AHashMap::new();
        let mut next_position: AHashMap<&str, usize> = AHashMap::new();
        let mut value_counts: AHashMap<&str, usize> = AHashMap::new();

        for (name, value) in document.fields() {
            let tokens: Vec<Token> = match value {
                FieldValue::Text(text) => analyzer.analyze_field(name, text)?.collect(),
                FieldValue::Int(v) => NumericTokenizer::int().int_terms(*v),
                FieldValue::Long(v) => NumericTokenizer::long().long_terms(*v),
                FieldValue::Binary(bytes) => vec![Token::from_bytes(bytes.clone(), 0)],
            };

            let value_index = {
                let count = value_counts.entry(name.as_str()).or_insert(0);
                let index = *count;
                *count += 1;
                index
            };
            let base = *next_position.get(name.as_str()).unwrap_or(&0);
            let field_terms = fields.entry(name.clone()).or_default();

            let mut last = base;
            for token in tokens {
                let position = base + token.position;
                last = last.max(position);
                field_terms.push(token, position, value_index);
            }
            next_position.insert(name.as_str(), last + POSITION_GAP);
        }

        Ok(AnalyzedDocument {
            id: document.id().to_string(),
            fields,
        })
    }

    /// Get the document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the analyzed terms of a field.
    pub fn field(&self, field: &str) -> Option<&FieldTerms> {
        self.fields.get(field)
    }

    /// Check whether `field` contains `term`. Absent fields contain nothing.
    pub fn contains(&self, field: &str, term: &[u8]) -> bool {
        self.fields
            .get(field)
            .is_some_and(|terms| terms.contains(term))
    }

    /// Occurrences of `term` in `field`.
    pub fn occurrences(&self, field: &str, term: &[u8]) -> &[TermOccurrence] {
        self.fields
            .get(field)
            .map(|terms| terms.occurrences(term))
            .unwrap_or(&[])
    }

    /// Iterate over `(field, terms)` pairs.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldTerms)> {
        self.fields.iter().map(|(name, terms)| (name.as_str(), terms))
    }

    /// Check if the document has a field with at least one term.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(|terms| terms.length() > 0)
    }

    /// Total number of distinct `(field, term)` pairs.
    pub fn unique_term_count(&self) -> usize {
        self.fields.values().map(FieldTerms::unique_terms).sum()
    }
}
