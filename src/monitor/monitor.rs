//! The monitor: query registration and document matching.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::analyzer::Analyzer;
use crate::document::analyzed::AnalyzedDocument;
use crate::document::batch::DocumentBatch;
use crate::document::document::InputDocument;
use crate::error::{PercolatorError, Result};
use crate::extraction::extractor::TermExtractor;
use crate::matcher::{CandidateMatcher, MatchError, MatcherFactory};
use crate::monitor::compiled::CompiledQuery;
use crate::monitor::config::MonitorConfig;
use crate::monitor::matches::Matches;
use crate::monitor::monitor_query::MonitorQuery;
use crate::monitor::query_parser::MonitorQueryParser;
use crate::monitor::store::{QueryStore, StoreSnapshot, UpdateReport};
use crate::presearcher::Presearcher;

/// Shorthand for the match type produced by a factory.
pub type FactoryMatch<F> = <<F as MatcherFactory>::Matcher as CandidateMatcher>::Match;

/// Store statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorStats {
    /// Current store version.
    pub version: u64,
    /// Number of registered queries.
    pub query_count: usize,
    /// Entries held by the candidate index.
    pub indexed_terms: usize,
    /// Presearcher name.
    pub presearcher: &'static str,
}

/// Matches documents against a set of registered queries.
///
/// Registration parses each query, extracts its necessary terms and indexes
/// them. Matching analyzes each document once, asks the presearcher for
/// candidates and verifies only those exactly.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use percolator::analysis::analyzer::StandardAnalyzer;
/// use percolator::document::{DocumentBatch, InputDocument};
/// use percolator::matcher::SimpleMatcherFactory;
/// use percolator::monitor::{Monitor, MonitorQuery};
/// use percolator::query::QueryParser;
///
/// let monitor = Monitor::builder(QueryParser::new().with_default_field("body")).build();
/// monitor.update(MonitorQuery::new("rust", "rust AND fast")).unwrap();
///
/// let doc = InputDocument::builder("doc1").add_text("body", "Rust is fast").build();
/// let batch = DocumentBatch::of(Arc::new(StandardAnalyzer::new().unwrap()), doc);
///
/// let matches = monitor.match_batch(&batch, &SimpleMatcherFactory).unwrap();
/// assert!(matches.contains("doc1", "rust"));
/// ```
pub struct Monitor {
    store: QueryStore,
    config: MonitorConfig,
}

impl Monitor {
    /// Create a monitor with a given presearcher and default settings otherwise.
    pub fn new<P>(parser: P, presearcher: Arc<dyn Presearcher>) -> Self
    where
        P: MonitorQueryParser + 'static,
    {
        Monitor::builder(parser).presearcher(presearcher).build()
    }

    /// Create a monitor from a configuration.
    pub fn with_config<P>(parser: P, config: MonitorConfig) -> Self
    where
        P: MonitorQueryParser + 'static,
    {
        Monitor::builder(parser).config(config).build()
    }

    /// Start building a monitor.
    pub fn builder<P>(parser: P) -> MonitorBuilder
    where
        P: MonitorQueryParser + 'static,
    {
        MonitorBuilder::new(Arc::new(parser))
    }

    /// The configuration in use.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Register or replace a query.
    ///
    /// A malformed query fails with a parse error and leaves the store as it was.
    pub fn update(&self, query: MonitorQuery) -> Result<()> {
        self.store.update(query)
    }

    /// Register or replace several queries, reporting failures per query.
    pub fn update_all<I>(&self, queries: I) -> Result<UpdateReport>
    where
        I: IntoIterator<Item = MonitorQuery>,
    {
        self.store.update_all(queries)
    }

    /// Remove a query. Returns whether it was registered.
    pub fn remove(&self, id: &str) -> Result<bool> {
        self.store.remove(id)
    }

    /// Remove several queries. Returns how many were registered.
    pub fn remove_all<'a, I>(&self, ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.store.remove_all(ids)
    }

    /// Remove every query.
    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }

    /// Release the registered queries. Every later call fails, and a
    /// registration still in progress publishes nothing.
    pub fn close(&self) -> Result<()> {
        self.store.close()
    }

    /// Check if the monitor was closed.
    pub fn is_closed(&self) -> bool {
        self.store.is_closed()
    }

    /// Look up a registered query.
    pub fn get_query(&self, id: &str) -> Result<Option<MonitorQuery>> {
        self.ensure_open()?;
        Ok(self.store.get(id).map(|q| q.source().clone()))
    }

    /// Look up the compiled form of a registered query.
    pub fn compiled_query(&self, id: &str) -> Result<Option<Arc<CompiledQuery>>> {
        self.ensure_open()?;
        Ok(self.store.get(id))
    }

    /// Number of registered queries.
    pub fn query_count(&self) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.store.len())
    }

    /// Ids of the registered queries, sorted.
    pub fn query_ids(&self) -> Result<Vec<String>> {
        self.ensure_open()?;
        let snapshot = self.store.snapshot();
        let mut ids: Vec<String> = snapshot.queries().map(|q| q.id().to_string()).collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Store statistics.
    pub fn stats(&self) -> Result<MonitorStats> {
        self.ensure_open()?;
        let snapshot = self.store.snapshot();
        Ok(MonitorStats {
            version: snapshot.version(),
            query_count: snapshot.len(),
            indexed_terms: snapshot.index().indexed_terms(),
            presearcher: self.store.presearcher().name(),
        })
    }

    /// Ids of the queries the presearcher selects for a document, without
    /// verifying them.
    pub fn candidates(&self, document: &InputDocument, analyzer: &dyn Analyzer) -> Result<Vec<String>> {
        self.ensure_open()?;
        let doc = AnalyzedDocument::analyze(document, analyzer)?;
        let snapshot = self.store.snapshot();
        Ok(snapshot
            .index()
            .candidates(&doc)
            .iter()
            .map(|id| id.to_string())
            .collect())
    }

    /// Match a single document.
    pub fn match_document<F>(
        &self,
        document: InputDocument,
        analyzer: Arc<dyn Analyzer>,
        factory: &F,
    ) -> Result<Matches<FactoryMatch<F>>>
    where
        F: MatcherFactory,
    {
        self.match_batch(&DocumentBatch::of(analyzer, document), factory)
    }

    /// Match every document of a batch against the registered queries.
    ///
    /// All documents see the same store snapshot. A candidate whose
    /// verification fails is recorded in [`Matches::errors`] and matching
    /// goes on.
    pub fn match_batch<F>(&self, batch: &DocumentBatch, factory: &F) -> Result<Matches<FactoryMatch<F>>>
    where
        F: MatcherFactory,
    {
        self.ensure_open()?;
        let snapshot = self.store.snapshot();
        let mut matches = Matches::new(batch.len(), snapshot.len());

        let build_start = Instant::now();
        let docs = if self.config.parallel_match {
            batch.par_analyze()?
        } else {
            batch.analyze()?
        };
        let query_build_time = build_start.elapsed();

        let search_start = Instant::now();
        let results: Vec<DocumentResult<FactoryMatch<F>>> = if self.config.parallel_match {
            docs.par_iter()
                .map(|doc| match_one(&snapshot, doc, factory))
                .collect()
        } else {
            docs.iter().map(|doc| match_one(&snapshot, doc, factory)).collect()
        };
        let search_time = search_start.elapsed();

        for result in results {
            matches.add_document(result.doc_id, result.matches, result.errors, result.queries_run);
        }
        matches.set_timings(query_build_time, search_time);

        debug!(
            "matched {} documents against store version {}: {} run, {} matched",
            batch.len(),
            snapshot.version(),
            matches.queries_run(),
            matches.matched_count()
        );
        Ok(matches)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(PercolatorError::closed("monitor is closed"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("store", &self.store)
            .field("config", &self.config)
            .field("closed", &self.is_closed())
            .finish()
    }
}

struct DocumentResult<T> {
    doc_id: String,
    matches: Vec<T>,
    errors: Vec<MatchError>,
    queries_run: usize,
}

fn match_one<F: MatcherFactory>(
    snapshot: &StoreSnapshot,
    doc: &AnalyzedDocument,
    factory: &F,
) -> DocumentResult<FactoryMatch<F>> {
    let mut result = DocumentResult {
        doc_id: doc.id().to_string(),
        matches: Vec::new(),
        errors: Vec::new(),
        queries_run: 0,
    };
    if snapshot.is_empty() {
        return result;
    }

    let mut matcher = factory.create_matcher(doc);
    for id in snapshot.index().candidates(doc) {
        let Some(query) = snapshot.get(&id) else {
            continue;
        };
        result.queries_run += 1;
        match matcher.match_query(query, doc) {
            Ok(Some(m)) => result.matches.push(m),
            Ok(None) => {}
            Err(error) => {
                warn!("query '{id}' failed on document '{}': {error}", doc.id());
                result.errors.push(MatchError {
                    query_id: id.to_string(),
                    doc_id: doc.id().to_string(),
                    error,
                });
            }
        }
    }
    result
}

/// Builder for [`Monitor`].
pub struct MonitorBuilder {
    parser: Arc<dyn MonitorQueryParser>,
    config: MonitorConfig,
    presearcher: Option<Arc<dyn Presearcher>>,
    extractors: Vec<Arc<dyn TermExtractor>>,
}

impl MonitorBuilder {
    fn new(parser: Arc<dyn MonitorQueryParser>) -> Self {
        MonitorBuilder {
            parser,
            config: MonitorConfig::default(),
            presearcher: None,
            extractors: Vec::new(),
        }
    }

    /// Use a configuration.
    pub fn config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom presearcher instead of the configured one.
    pub fn presearcher(mut self, presearcher: Arc<dyn Presearcher>) -> Self {
        self.presearcher = Some(presearcher);
        self
    }

    /// Register a term extractor for a custom query node kind.
    pub fn extractor(mut self, extractor: Arc<dyn TermExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Build the monitor.
    pub fn build(self) -> Monitor {
        let mut registry = self.config.extractor_registry();
        for extractor in self.extractors {
            registry.register(extractor);
        }
        let presearcher = self.presearcher.unwrap_or_else(|| {
            self.config
                .presearcher
                .build(self.config.max_indexed_terms)
        });

        info!("monitor created with {} presearcher", presearcher.name());
        Monitor {
            store: QueryStore::new(self.parser, registry, presearcher),
            config: self.config,
        }
    }
}
