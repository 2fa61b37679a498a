//! Matcher recording only which queries matched.

use serde::Serialize;

use crate::document::analyzed::AnalyzedDocument;
use crate::error::Result;
use crate::matcher::{CandidateMatcher, MatchRecord, MatcherFactory};
use crate::monitor::compiled::CompiledQuery;

/// A plain match: the query id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryMatch {
    /// Id of the matching query.
    pub query_id: String,
}

impl MatchRecord for QueryMatch {
    fn query_id(&self) -> &str {
        &self.query_id
    }
}

/// Evaluates each candidate and records a [`QueryMatch`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleMatcher;

impl CandidateMatcher for SimpleMatcher {
    type Match = QueryMatch;

    fn match_query(&mut self, query: &CompiledQuery, doc: &AnalyzedDocument) -> Result<Option<QueryMatch>> {
        if query.query().matches(doc)? {
            Ok(Some(QueryMatch {
                query_id: query.id().to_string(),
            }))
        } else {
            Ok(None)
        }
    }
}

/// Factory for [`SimpleMatcher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleMatcherFactory;

impl MatcherFactory for SimpleMatcherFactory {
    type Matcher = SimpleMatcher;

    fn create_matcher(&self, _doc: &AnalyzedDocument) -> SimpleMatcher {
        SimpleMatcher
    }
}
