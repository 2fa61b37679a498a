//! Presearcher selecting candidates by extracted terms.
//!
//! Every required clause of every query gets a slot `(query, clause)`. The
//! literal terms of the clause are posted under `field → term → slots`. For a
//! document, each of its terms marks the slots it satisfies; a query is a
//! candidate once all of its slots are marked. Queries whose clauses are all
//! always-satisfied (any-terms, or no clause at all) are candidates for every
//! document.

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use bit_vec::BitVec;
use log::debug;

use crate::document::analyzed::AnalyzedDocument;
use crate::error::{PercolatorError, Result};
use crate::extraction::result::ExtractionResult;
use crate::presearcher::{CandidateIndex, Presearcher};

/// Term-filtering presearcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermFilteredPresearcher {
    max_indexed_terms: Option<usize>,
}

impl TermFilteredPresearcher {
    /// Create a presearcher without an index size limit.
    pub fn new() -> Self {
        TermFilteredPresearcher::default()
    }

    /// Limit the number of `(term, clause)` entries an index may hold.
    pub fn with_max_indexed_terms(mut self, max: Option<usize>) -> Self {
        self.max_indexed_terms = max;
        self
    }
}

impl Presearcher for TermFilteredPresearcher {
    fn name(&self) -> &'static str {
        "term_filtered"
    }

    fn new_index(&self) -> Box<dyn CandidateIndex> {
        Box::new(TermFilteredIndex::new(self.max_indexed_terms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClauseSlot {
    query: u32,
    clause: u32,
}

#[derive(Debug, Clone)]
struct IndexedQuery {
    id: Arc<str>,
    required: usize,
    postings: Vec<(String, Vec<u8>)>,
}

/// Inverted index from document terms to query clause slots.
#[derive(Debug, Clone, Default)]
pub struct TermFilteredIndex {
    queries: Vec<Option<IndexedQuery>>,
    ordinals: AHashMap<Arc<str>, u32>,
    free: Vec<u32>,
    postings: AHashMap<String, AHashMap<Vec<u8>, Vec<ClauseSlot>>>,
    always: AHashSet<u32>,
    indexed_terms: usize,
    max_indexed_terms: Option<usize>,
}

impl TermFilteredIndex {
    /// Create an empty index.
    pub fn new(max_indexed_terms: Option<usize>) -> Self {
        TermFilteredIndex {
            max_indexed_terms,
            ..Default::default()
        }
    }

    /// Number of queries that are candidates for every document.
    pub fn always_candidates(&self) -> usize {
        self.always.len()
    }

    fn allocate(&mut self, entry: IndexedQuery) -> u32 {
        match self.free.pop() {
            Some(ordinal) => {
                self.queries[ordinal as usize] = Some(entry);
                ordinal
            }
            None => {
                self.queries.push(Some(entry));
                (self.queries.len() - 1) as u32
            }
        }
    }
}

impl CandidateIndex for TermFilteredIndex {
    fn insert(&mut self, id: Arc<str>, extraction: &ExtractionResult) -> Result<()> {
        let required: Vec<_> = extraction.required_clauses().collect();
        let new_terms: usize = required.iter().map(|c| c.literal_count()).sum();

        if let Some(max) = self.max_indexed_terms {
            let replaced = self
                .ordinals
                .get(&id)
                .and_then(|o| self.queries[*o as usize].as_ref())
                .map(|q| q.postings.len())
                .unwrap_or(0);
            let total = self.indexed_terms - replaced + new_terms;
            if total > max {
                return Err(PercolatorError::resource_exhausted(format!(
                    "indexing query '{id}' needs {total} terms, limit is {max}"
                )));
            }
        }

        self.remove(&id);

        let mut entry = IndexedQuery {
            id: id.clone(),
            required: required.len(),
            postings: Vec::with_capacity(new_terms),
        };
        for clause in &required {
            for term in clause.literal_terms() {
                entry
                    .postings
                    .push((term.field().to_string(), term.term().to_vec()));
            }
        }

        let postings = entry.postings.clone();
        let ordinal = self.allocate(entry);
        self.ordinals.insert(id, ordinal);

        if required.is_empty() {
            self.always.insert(ordinal);
            return Ok(());
        }

        let mut next = postings.into_iter();
        for (clause_index, clause) in required.iter().enumerate() {
            let slot = ClauseSlot {
                query: ordinal,
                clause: clause_index as u32,
            };
            for _ in 0..clause.literal_count() {
                if let Some((field, term)) = next.next() {
                    self.postings
                        .entry(field)
                        .or_default()
                        .entry(term)
                        .or_default()
                        .push(slot);
                }
            }
        }
        self.indexed_terms += new_terms;
        Ok(())
    }

    fn remove(&mut self, id: &str) -> bool {
        let Some(ordinal) = self.ordinals.remove(id) else {
            return false;
        };
        let Some(entry) = self.queries[ordinal as usize].take() else {
            return false;
        };

        self.always.remove(&ordinal);
        for (field, term) in &entry.postings {
            let Some(by_term) = self.postings.get_mut(field) else {
                continue;
            };
            if let Some(slots) = by_term.get_mut(term) {
                slots.retain(|s| s.query != ordinal);
                if slots.is_empty() {
                    by_term.remove(term);
                }
            }
            if by_term.is_empty() {
                self.postings.remove(field);
            }
        }
        self.indexed_terms -= entry.postings.len();
        self.free.push(ordinal);
        true
    }

    fn clear(&mut self) {
        *self = TermFilteredIndex::new(self.max_indexed_terms);
    }

    fn candidates(&self, doc: &AnalyzedDocument) -> Vec<Arc<str>> {
        let mut satisfied: AHashMap<u32, BitVec> = AHashMap::new();

        for (field, terms) in doc.fields() {
            let Some(by_term) = self.postings.get(field) else {
                continue;
            };
            for term in terms.terms() {
                let Some(slots) = by_term.get(term) else {
                    continue;
                };
                for slot in slots {
                    let Some(entry) = &self.queries[slot.query as usize] else {
                        continue;
                    };
                    satisfied
                        .entry(slot.query)
                        .or_insert_with(|| BitVec::from_elem(entry.required, false))
                        .set(slot.clause as usize, true);
                }
            }
        }

        let mut candidates: Vec<Arc<str>> = satisfied
            .iter()
            .filter(|(_, bits)| bits.all())
            .map(|(ordinal, _)| *ordinal)
            .chain(self.always.iter().copied())
            .filter_map(|ordinal| self.queries[ordinal as usize].as_ref())
            .map(|entry| entry.id.clone())
            .collect();
        candidates.sort_unstable();

        debug!(
            "document '{}': {} of {} queries selected",
            doc.id(),
            candidates.len(),
            self.ordinals.len()
        );
        candidates
    }

    fn len(&self) -> usize {
        self.ordinals.len()
    }

    fn indexed_terms(&self) -> usize {
        self.indexed_terms
    }

    fn clone_box(&self) -> Box<dyn CandidateIndex> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::WhitespaceAnalyzer;
    use crate::document::document::InputDocument;
    use crate::extraction::registry::ExtractorRegistry;
    use crate::query::parser::QueryParser;

    fn extraction(query: &str) -> ExtractionResult {
        let query = QueryParser::new().with_default_field("f").parse(query).unwrap();
        ExtractorRegistry::new().extract(query.as_ref()).unwrap()
    }

    fn doc(text: &str) -> AnalyzedDocument {
        let doc = InputDocument::builder("d").add_text("f", text).build();
        AnalyzedDocument::analyze(&doc, &WhitespaceAnalyzer::new()).unwrap()
    }

    fn ids(candidates: Vec<Arc<str>>) -> Vec<String> {
        candidates.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_every_clause_must_be_satisfied() {
        let mut index = TermFilteredIndex::new(None);
        index.insert("1".into(), &extraction("+a +b")).unwrap();
        index.insert("2".into(), &extraction("a OR c")).unwrap();

        assert_eq!(ids(index.candidates(&doc("a b"))), vec!["1", "2"]);
        assert_eq!(ids(index.candidates(&doc("a"))), vec!["2"]);
        assert_eq!(ids(index.candidates(&doc("c"))), vec!["2"]);
        assert!(index.candidates(&doc("z")).is_empty());
    }

    #[test]
    fn test_always_candidates() {
        let mut index = TermFilteredIndex::new(None);
        index.insert("all".into(), &extraction("*:*")).unwrap();
        index.insert("wild".into(), &extraction("f:x*")).unwrap();

        assert_eq!(index.always_candidates(), 2);
        assert_eq!(ids(index.candidates(&doc("nothing"))), vec!["all", "wild"]);
    }

    #[test]
    fn test_replace_and_remove() {
        let mut index = TermFilteredIndex::new(None);
        index.insert("1".into(), &extraction("a")).unwrap();
        index.insert("1".into(), &extraction("b")).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.indexed_terms(), 1);
        assert!(index.candidates(&doc("a")).is_empty());
        assert_eq!(ids(index.candidates(&doc("b"))), vec!["1"]);

        assert!(index.remove("1"));
        assert!(!index.remove("1"));
        assert_eq!(index.indexed_terms(), 0);
        assert!(index.candidates(&doc("b")).is_empty());
    }

    #[test]
    fn test_ordinals_are_reused() {
        let mut index = TermFilteredIndex::new(None);
        index.insert("1".into(), &extraction("a")).unwrap();
        index.remove("1");
        index.insert("2".into(), &extraction("+a +b")).unwrap();

        assert!(index.candidates(&doc("a")).is_empty());
        assert_eq!(ids(index.candidates(&doc("a b"))), vec!["2"]);
    }

    #[test]
    fn test_resource_limit() {
        let mut index = TermFilteredIndex::new(Some(2));
        index.insert("1".into(), &extraction("a OR b")).unwrap();

        let err = index.insert("2".into(), &extraction("c")).unwrap_err();
        assert!(matches!(err, PercolatorError::ResourceExhausted(_)));
        assert_eq!(index.len(), 1);

        // Replacing a query frees its own terms first.
        index.insert("1".into(), &extraction("c")).unwrap();
        assert_eq!(index.indexed_terms(), 1);
    }
}
