//! Compiled form of a registered query.

use std::sync::Arc;

use crate::extraction::result::ExtractionResult;
use crate::monitor::monitor_query::{Metadata, MonitorQuery};
use crate::query::query::Query;

/// A parsed query together with its extracted condition.
///
/// Never mutated once built; an update replaces the whole value.
#[derive(Debug)]
pub struct CompiledQuery {
    id: Arc<str>,
    source: MonitorQuery,
    query: Box<dyn Query>,
    extraction: ExtractionResult,
}

impl CompiledQuery {
    /// Bundle a parsed query with its extraction result.
    pub fn new(source: MonitorQuery, query: Box<dyn Query>, extraction: ExtractionResult) -> Self {
        CompiledQuery {
            id: Arc::from(source.id()),
            source,
            query,
            extraction,
        }
    }

    /// The query id.
    pub fn id(&self) -> &Arc<str> {
        &self.id
    }

    /// The registration this query was compiled from.
    pub fn source(&self) -> &MonitorQuery {
        &self.source
    }

    /// The query metadata.
    pub fn metadata(&self) -> &Metadata {
        self.source.metadata()
    }

    /// The query tree.
    pub fn query(&self) -> &dyn Query {
        self.query.as_ref()
    }

    /// The extracted necessary condition.
    pub fn extraction(&self) -> &ExtractionResult {
        &self.extraction
    }
}
