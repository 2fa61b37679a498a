//! Presearchers: candidate selection over registered queries.
//!
//! A [`Presearcher`] creates the [`CandidateIndex`] that lives inside each
//! store snapshot. The index receives the extraction result of every
//! registered query and, given an analyzed document, returns the ids of the
//! queries that may match it. The returned set must include every query
//! that truly matches; extra candidates only cost evaluation time.

use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::analyzed::AnalyzedDocument;
use crate::error::Result;
use crate::extraction::result::ExtractionResult;

pub mod match_all;
pub mod term_filtered;

pub use match_all::{MatchAllIndex, MatchAllPresearcher};
pub use term_filtered::{TermFilteredIndex, TermFilteredPresearcher};

/// Factory for candidate indexes.
pub trait Presearcher: Send + Sync + Debug {
    /// Name of the strategy.
    fn name(&self) -> &'static str;

    /// Create an empty candidate index.
    fn new_index(&self) -> Box<dyn CandidateIndex>;
}

/// Candidate structure over the registered queries of one snapshot.
pub trait CandidateIndex: Send + Sync + Debug {
    /// Index a query. Replaces any previous entry with the same id.
    ///
    /// On error the index is left as it was before the call.
    fn insert(&mut self, id: Arc<str>, extraction: &ExtractionResult) -> Result<()>;

    /// Remove a query. Returns whether it was present.
    fn remove(&mut self, id: &str) -> bool;

    /// Remove every query.
    fn clear(&mut self);

    /// Ids of the queries that may match the document, sorted.
    fn candidates(&self, doc: &AnalyzedDocument) -> Vec<Arc<str>>;

    /// Number of indexed queries.
    fn len(&self) -> usize;

    /// Check if no query is indexed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored `(term, clause)` entries.
    fn indexed_terms(&self) -> usize;

    /// Copy the index, for copy-on-write snapshots.
    fn clone_box(&self) -> Box<dyn CandidateIndex>;
}

impl Clone for Box<dyn CandidateIndex> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Presearcher selection for configuration files and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresearcherKind {
    /// Every registered query is a candidate.
    MatchAll,
    /// Candidates are selected by extracted terms.
    #[default]
    TermFiltered,
}

impl PresearcherKind {
    /// Build the presearcher. `max_indexed_terms` only applies to term filtering.
    pub fn build(self, max_indexed_terms: Option<usize>) -> Arc<dyn Presearcher> {
        match self {
            PresearcherKind::MatchAll => Arc::new(MatchAllPresearcher::new()),
            PresearcherKind::TermFiltered => {
                Arc::new(TermFilteredPresearcher::new().with_max_indexed_terms(max_indexed_terms))
            }
        }
    }
}
