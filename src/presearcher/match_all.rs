//! Presearcher returning every registered query.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::document::analyzed::AnalyzedDocument;
use crate::error::Result;
use crate::extraction::result::ExtractionResult;
use crate::presearcher::{CandidateIndex, Presearcher};

/// Baseline presearcher: no filtering at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAllPresearcher;

impl MatchAllPresearcher {
    /// Create a new match-all presearcher.
    pub fn new() -> Self {
        MatchAllPresearcher
    }
}

impl Presearcher for MatchAllPresearcher {
    fn name(&self) -> &'static str {
        "match_all"
    }

    fn new_index(&self) -> Box<dyn CandidateIndex> {
        Box::new(MatchAllIndex::default())
    }
}

/// Set of registered ids.
#[derive(Debug, Clone, Default)]
pub struct MatchAllIndex {
    ids: BTreeSet<Arc<str>>,
}

impl CandidateIndex for MatchAllIndex {
    fn insert(&mut self, id: Arc<str>, _extraction: &ExtractionResult) -> Result<()> {
        self.ids.insert(id);
        Ok(())
    }

    fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    fn clear(&mut self) {
        self.ids.clear();
    }

    fn candidates(&self, _doc: &AnalyzedDocument) -> Vec<Arc<str>> {
        self.ids.iter().cloned().collect()
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn indexed_terms(&self) -> usize {
        0
    }

    fn clone_box(&self) -> Box<dyn CandidateIndex> {
        Box::new(self.clone())
    }
}
