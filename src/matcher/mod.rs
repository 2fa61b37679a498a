//! Matchers: exact verification of candidates and what gets recorded.
//!
//! The monitor creates one [`CandidateMatcher`] per document from the
//! caller's [`MatcherFactory`] and hands it every candidate query. The
//! matcher runs exact evaluation and decides what a match records.

use std::fmt::Debug;

use serde::{Serialize, Serializer};

use crate::document::analyzed::AnalyzedDocument;
use crate::error::{PercolatorError, Result};
use crate::monitor::compiled::CompiledQuery;

pub mod highlighting;
pub mod simple;

pub use highlighting::{HighlightingMatcher, HighlightingMatcherFactory, HighlightsMatch, TermHit};
pub use simple::{QueryMatch, SimpleMatcher, SimpleMatcherFactory};

/// A recorded match of one query against one document.
pub trait MatchRecord: Send + Debug + Serialize {
    /// Id of the matching query.
    fn query_id(&self) -> &str;
}

/// Verifies candidates against one document.
pub trait CandidateMatcher {
    /// The type recorded for a match.
    type Match: MatchRecord;

    /// Verify one candidate. `Ok(None)` means the query does not match.
    ///
    /// Errors are confined to this query and document.
    fn match_query(
        &mut self,
        query: &CompiledQuery,
        doc: &AnalyzedDocument,
    ) -> Result<Option<Self::Match>>;
}

/// Creates matchers, one per document.
pub trait MatcherFactory: Sync {
    /// The matcher type.
    type Matcher: CandidateMatcher;

    /// Create a matcher for a document.
    fn create_matcher(&self, doc: &AnalyzedDocument) -> Self::Matcher;
}

/// A candidate whose verification failed.
#[derive(Debug, Serialize)]
pub struct MatchError {
    /// Id of the failing query.
    pub query_id: String,
    /// Id of the document being matched.
    pub doc_id: String,
    /// The failure.
    #[serde(serialize_with = "serialize_error")]
    pub error: PercolatorError,
}

fn serialize_error<S: Serializer>(error: &PercolatorError, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}
