//! Phrase query implementation: terms at consecutive positions.

use crate::document::analyzed::AnalyzedDocument;
use crate::error::Result;
use crate::query::query::Query;

/// A query matching documents where the terms occur at consecutive positions
/// of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseQuery {
    field: String,
    terms: Vec<Vec<u8>>,
}

impl PhraseQuery {
    /// Node kind tag.
    pub const KIND: &'static str = "phrase";

    /// Create a phrase query from text terms.
    pub fn new<F, I, T>(field: F, terms: I) -> Self
    where
        F: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        PhraseQuery {
            field: field.into(),
            terms: terms.into_iter().map(|t| t.into().into_bytes()).collect(),
        }
    }

    /// Create a phrase query from raw byte terms.
    pub fn from_bytes<F: Into<String>>(field: F, terms: Vec<Vec<u8>>) -> Self {
        PhraseQuery {
            field: field.into(),
            terms,
        }
    }

    /// The terms of the phrase, in order.
    pub fn terms(&self) -> &[Vec<u8>] {
        &self.terms
    }
}

impl Query for PhraseQuery {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn matches(&self, doc: &AnalyzedDocument) -> Result<bool> {
        let Some((first, rest)) = self.terms.split_first() else {
            return Ok(false);
        };
        let Some(field) = doc.field(&self.field) else {
            return Ok(false);
        };

        let matched = field.occurrences(first).iter().any(|start| {
            rest.iter().enumerate().all(|(i, term)| {
                let expected = start.position + i + 1;
                field
                    .occurrences(term)
                    .iter()
                    .any(|occ| occ.position == expected)
            })
        });
        Ok(matched)
    }

    fn visit_terms(&self, visitor: &mut dyn FnMut(&str, &[u8])) {
        for term in &self.terms {
            visitor(&self.field, term);
        }
    }

    fn description(&self) -> String {
        let text = self
            .terms
            .iter()
            .map(|t| String::from_utf8_lossy(t).into_owned())
            .collect::<Vec<_>>()
            .join(" ");
        format!("{}:\"{}\"", self.field, text)
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
