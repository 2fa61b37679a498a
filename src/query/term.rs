//! Term query implementation for exact term matching.

use crate::document::analyzed::AnalyzedDocument;
use crate::error::Result;
use crate::query::query::Query;

/// A query that matches documents containing a specific term in a field.
///
/// Like Lucene, TermQuery performs exact matching and does NOT analyze the
/// term. Terms are bytes, so numeric and binary terms work the same way as
/// text terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermQuery {
    field: String,
    term: Vec<u8>,
}

impl TermQuery {
    /// Node kind tag.
    pub const KIND: &'static str = "term";

    /// Create a new text term query.
    pub fn new<F, T>(field: F, term: T) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        TermQuery {
            field: field.into(),
            term: term.into().into_bytes(),
        }
    }

    /// Create a term query over raw bytes (numeric or binary terms).
    pub fn from_bytes<F: Into<String>>(field: F, term: Vec<u8>) -> Self {
        TermQuery {
            field: field.into(),
            term,
        }
    }

    /// Get the term bytes.
    pub fn term(&self) -> &[u8] {
        &self.term
    }
}

impl Query for TermQuery {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn matches(&self, doc: &AnalyzedDocument) -> Result<bool> {
        Ok(doc.contains(&self.field, &self.term))
    }

    fn visit_terms(&self, visitor: &mut dyn FnMut(&str, &[u8])) {
        visitor(&self.field, &self.term);
    }

    fn description(&self) -> String {
        match std::str::from_utf8(&self.term) {
            Ok(text) => format!("{}:{}", self.field, text),
            Err(_) => format!("{}:{:?}", self.field, self.term),
        }
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
