//! Query matching every document.

use crate::document::analyzed::AnalyzedDocument;
use crate::error::Result;
use crate::query::query::Query;

/// A query that matches all documents, whatever their fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchAllQuery;

impl MatchAllQuery {
    /// Node kind tag.
    pub const KIND: &'static str = "match_all";

    /// Create a new match-all query.
    pub fn new() -> Self {
        MatchAllQuery
    }
}

impl Query for MatchAllQuery {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn matches(&self, _doc: &AnalyzedDocument) -> Result<bool> {
        Ok(true)
    }

    fn description(&self) -> String {
        "*:*".to_string()
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(*self)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
