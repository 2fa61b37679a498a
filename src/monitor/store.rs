//! Concurrent store of compiled queries.
//!
//! The registered queries and their candidate index form one immutable
//! [`StoreSnapshot`]. Readers clone the current `Arc` and work on it without
//! further locking. Writers serialize on a mutex, build the next snapshot
//! from a copy of the current one and publish it with a single pointer swap,
//! so a reader sees either the whole effect of a write or none of it.
//!
//! Closing takes the writer lock too. A write that was still compiling when
//! the store closed finds it closed once it gets the lock and publishes nothing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ahash::AHashMap;
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};

use crate::error::{PercolatorError, Result};
use crate::extraction::registry::ExtractorRegistry;
use crate::monitor::compiled::CompiledQuery;
use crate::monitor::monitor_query::MonitorQuery;
use crate::monitor::query_parser::MonitorQueryParser;
use crate::presearcher::{CandidateIndex, Presearcher};

/// One consistent version of the store.
#[derive(Debug)]
pub struct StoreSnapshot {
    version: u64,
    queries: AHashMap<Arc<str>, Arc<CompiledQuery>>,
    index: Box<dyn CandidateIndex>,
}

impl StoreSnapshot {
    fn empty(presearcher: &dyn Presearcher, version: u64) -> Self {
        StoreSnapshot {
            version,
            queries: AHashMap::new(),
            index: presearcher.new_index(),
        }
    }

    /// Version number, increased by every write that changed something.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of registered queries.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Check if no query is registered.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Look up a compiled query.
    pub fn get(&self, id: &str) -> Option<&Arc<CompiledQuery>> {
        self.queries.get(id)
    }

    /// All registered queries, in no particular order.
    pub fn queries(&self) -> impl Iterator<Item = &Arc<CompiledQuery>> {
        self.queries.values()
    }

    /// The candidate index.
    pub fn index(&self) -> &dyn CandidateIndex {
        self.index.as_ref()
    }
}

/// A registration that could not be applied.
#[derive(Debug)]
pub struct UpdateFailure {
    /// Id of the rejected query.
    pub id: String,
    /// Why it was rejected.
    pub error: PercolatorError,
}

/// Outcome of a batch registration.
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// Ids registered successfully, in submission order.
    pub updated: Vec<String>,
    /// Rejected registrations; the store holds their previous state.
    pub failures: Vec<UpdateFailure>,
}

impl UpdateReport {
    /// Check if every registration succeeded.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn the report into an error carrying the first failure, if any.
    pub fn into_result(self) -> Result<Vec<String>> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(self.updated),
        }
    }
}

/// Registry of compiled queries with snapshot reads.
pub struct QueryStore {
    parser: Arc<dyn MonitorQueryParser>,
    registry: ExtractorRegistry,
    presearcher: Arc<dyn Presearcher>,
    current: RwLock<Arc<StoreSnapshot>>,
    writer: Mutex<()>,
    closed: AtomicBool,
}

impl QueryStore {
    /// Create an empty store.
    pub fn new(
        parser: Arc<dyn MonitorQueryParser>,
        registry: ExtractorRegistry,
        presearcher: Arc<dyn Presearcher>,
    ) -> Self {
        let snapshot = StoreSnapshot::empty(presearcher.as_ref(), 0);
        QueryStore {
            parser,
            registry,
            presearcher,
            current: RwLock::new(Arc::new(snapshot)),
            writer: Mutex::new(()),
            closed: AtomicBool::new(false),
        }
    }

    /// The presearcher building the candidate indexes.
    pub fn presearcher(&self) -> &Arc<dyn Presearcher> {
        &self.presearcher
    }

    /// The extractor registry.
    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Parse and extract a query without registering it.
    pub fn compile(&self, query: MonitorQuery) -> Result<CompiledQuery> {
        query.validate()?;
        let tree = self.parser.parse(query.query(), query.metadata())?;
        let extraction = self.registry.extract(tree.as_ref())?;
        Ok(CompiledQuery::new(query, tree, extraction))
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.current.read().clone()
    }

    /// Number of registered queries.
    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    /// Check if no query is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a compiled query.
    pub fn get(&self, id: &str) -> Option<Arc<CompiledQuery>> {
        self.current.read().get(id).cloned()
    }

    /// Check if the store was closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(PercolatorError::closed("query store is closed"));
        }
        Ok(())
    }

    /// Register or replace one query.
    pub fn update(&self, query: MonitorQuery) -> Result<()> {
        self.update_all(std::iter::once(query))?.into_result().map(|_| ())
    }

    /// Register or replace several queries.
    ///
    /// Each query is compiled on its own; failures are reported per query
    /// and leave that id as it was. Successful ones become visible together.
    /// Fails with `Closed` if the store is closed before they are published.
    pub fn update_all<I>(&self, queries: I) -> Result<UpdateReport>
    where
        I: IntoIterator<Item = MonitorQuery>,
    {
        self.ensure_open()?;
        let mut report = UpdateReport::default();
        let mut compiled = Vec::new();

        for query in queries {
            let id = query.id().to_string();
            match self.compile(query) {
                Ok(c) => compiled.push(c),
                Err(error) => {
                    warn!("query '{id}' rejected: {error}");
                    report.failures.push(UpdateFailure { id, error });
                }
            }
        }
        if compiled.is_empty() {
            return Ok(report);
        }

        let _guard = self.writer.lock();
        self.ensure_open()?;
        let mut next = self.copy_current();

        for query in compiled {
            let id = query.id().clone();
            let previous = next.queries.get(&id).cloned();
            if let Err(error) = next.index.insert(id.clone(), query.extraction()) {
                warn!("query '{id}' rejected: {error}");
                report.failures.push(UpdateFailure {
                    id: id.to_string(),
                    error,
                });
                continue;
            }
            debug!("query '{id}' indexed as {}", query.extraction());
            if previous.is_some() {
                debug!("query '{id}' replaced");
            }
            next.queries.insert(id.clone(), Arc::new(query));
            report.updated.push(id.to_string());
        }

        if !report.updated.is_empty() {
            self.publish(next);
        }
        Ok(report)
    }

    /// Remove one query. Absent ids are ignored.
    pub fn remove(&self, id: &str) -> Result<bool> {
        Ok(self.remove_all(std::iter::once(id))? == 1)
    }

    /// Remove several queries, returning how many were present.
    pub fn remove_all<'a, I>(&self, ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let _guard = self.writer.lock();
        self.ensure_open()?;
        let current = self.snapshot();
        let ids: Vec<&str> = ids.into_iter().filter(|id| current.get(id).is_some()).collect();
        if ids.is_empty() {
            return Ok(0);
        }

        let mut next = self.copy_current();
        let mut removed = 0;
        for id in ids {
            if next.queries.remove(id).is_some() {
                next.index.remove(id);
                removed += 1;
            }
        }
        if removed > 0 {
            self.publish(next);
        }
        Ok(removed)
    }

    /// Remove every query and reset the candidate index.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.writer.lock();
        self.ensure_open()?;
        self.reset();
        info!("query store cleared");
        Ok(())
    }

    /// Release every query and refuse later writes.
    pub fn close(&self) -> Result<()> {
        let _guard = self.writer.lock();
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(PercolatorError::closed("query store already closed"));
        }
        self.reset();
        info!("query store closed");
        Ok(())
    }

    fn reset(&self) {
        let version = self.current.read().version + 1;
        self.publish(StoreSnapshot::empty(self.presearcher.as_ref(), version));
    }

    fn copy_current(&self) -> StoreSnapshot {
        let current = self.snapshot();
        StoreSnapshot {
            version: current.version + 1,
            queries: current.queries.clone(),
            index: current.index.clone_box(),
        }
    }

    fn publish(&self, snapshot: StoreSnapshot) {
        debug!(
            "publishing store version {} ({} queries)",
            snapshot.version,
            snapshot.queries.len()
        );
        *self.current.write() = Arc::new(snapshot);
    }
}

impl std::fmt::Debug for QueryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("QueryStore")
            .field("presearcher", &self.presearcher.name())
            .field("version", &snapshot.version)
            .field("queries", &snapshot.queries.len())
            .finish()
    }
}
