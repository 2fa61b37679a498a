//! Results of matching a document batch.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::matcher::{MatchError, MatchRecord};

/// Matches of one batch, keyed by document id.
///
/// Every document of the batch has an entry, possibly empty. Counters cover
/// the whole batch.
#[derive(Debug, Serialize)]
pub struct Matches<T> {
    batch_size: usize,
    queries_registered: usize,
    queries_run: usize,
    #[serde(serialize_with = "serialize_micros")]
    query_build_time: Duration,
    #[serde(serialize_with = "serialize_micros")]
    search_time: Duration,
    matches: BTreeMap<String, Vec<T>>,
    errors: Vec<MatchError>,
}

impl<T: MatchRecord> Matches<T> {
    pub(crate) fn new(batch_size: usize, queries_registered: usize) -> Self {
        Matches {
            batch_size,
            queries_registered,
            queries_run: 0,
            query_build_time: Duration::ZERO,
            search_time: Duration::ZERO,
            matches: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn add_document(
        &mut self,
        doc_id: String,
        matches: Vec<T>,
        errors: Vec<MatchError>,
        queries_run: usize,
    ) {
        self.queries_run += queries_run;
        self.matches.insert(doc_id, matches);
        self.errors.extend(errors);
    }

    pub(crate) fn set_timings(&mut self, query_build_time: Duration, search_time: Duration) {
        self.query_build_time = query_build_time;
        self.search_time = search_time;
    }

    /// Number of documents in the batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of registered queries in the snapshot used.
    pub fn queries_registered(&self) -> usize {
        self.queries_registered
    }

    /// Number of candidates verified, summed over documents.
    pub fn queries_run(&self) -> usize {
        self.queries_run
    }

    /// Number of matches, summed over documents.
    pub fn matched_count(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    /// Time spent analyzing the documents.
    pub fn query_build_time(&self) -> Duration {
        self.query_build_time
    }

    /// Time spent selecting and verifying candidates.
    pub fn search_time(&self) -> Duration {
        self.search_time
    }

    /// Matches of one document.
    pub fn matches(&self, doc_id: &str) -> &[T] {
        self.matches.get(doc_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check whether a query matched a document.
    pub fn contains(&self, doc_id: &str, query_id: &str) -> bool {
        self.matches(doc_id).iter().any(|m| m.query_id() == query_id)
    }

    /// Ids of the queries matching one document, sorted.
    pub fn matched_ids(&self, doc_id: &str) -> Vec<&str> {
        let mut ids: Vec<&str> = self.matches(doc_id).iter().map(|m| m.query_id()).collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over `(document id, matches)` in document id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.matches.iter().map(|(id, m)| (id.as_str(), m.as_slice()))
    }

    /// Verification failures.
    pub fn errors(&self) -> &[MatchError] {
        &self.errors
    }
}

fn serialize_micros<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_micros() as u64)
}
