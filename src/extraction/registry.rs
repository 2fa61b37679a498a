//! Dispatch from query node kinds to term extractors.

use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{PercolatorError, Result};
use crate::extraction::extractor::{
    AnyTermExtractor, BooleanQueryExtractor, MatchAllExtractor, PhraseQueryExtractor,
    TermExtractor, TermQueryExtractor, any_term_leaf,
};
use crate::extraction::result::ExtractionResult;
use crate::query::query::Query;
use crate::query::range::TermRangeQuery;
use crate::query::wildcard::WildcardQuery;

/// What to do with a node kind that has no registered extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownNodePolicy {
    /// Treat the node as an unanalyzable leaf of its field.
    #[default]
    AnyTerm,
    /// Reject the query with an unsupported-node error.
    Fail,
}

/// Registry of term extractors keyed by query node kind.
///
/// # Examples
///
/// ```
/// use percolator::extraction::ExtractorRegistry;
/// use percolator::query::TermQuery;
///
/// let registry = ExtractorRegistry::new();
/// let result = registry.extract(&TermQuery::new("body", "hello")).unwrap();
/// assert_eq!(result.to_string(), "(body:hello)");
/// ```
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: AHashMap<&'static str, Arc<dyn TermExtractor>>,
    unknown_node_policy: UnknownNodePolicy,
    max_clauses: Option<usize>,
}

impl ExtractorRegistry {
    /// Create a registry with the built-in extractors.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(TermQueryExtractor));
        registry.register(Arc::new(BooleanQueryExtractor));
        registry.register(Arc::new(MatchAllExtractor));
        registry.register(Arc::new(PhraseQueryExtractor));
        registry.register(Arc::new(AnyTermExtractor::new(WildcardQuery::KIND)));
        registry.register(Arc::new(AnyTermExtractor::new(TermRangeQuery::KIND)));
        registry
    }

    /// Create a registry without any extractor.
    pub fn empty() -> Self {
        ExtractorRegistry {
            extractors: AHashMap::new(),
            unknown_node_policy: UnknownNodePolicy::default(),
            max_clauses: None,
        }
    }

    /// Set the policy for unknown node kinds.
    pub fn with_unknown_node_policy(mut self, policy: UnknownNodePolicy) -> Self {
        self.unknown_node_policy = policy;
        self
    }

    /// Keep at most `max` clauses per query.
    pub fn with_max_clauses(mut self, max: Option<usize>) -> Self {
        self.max_clauses = max;
        self
    }

    /// Register an extractor, replacing any previous one for the same kind.
    pub fn register(&mut self, extractor: Arc<dyn TermExtractor>) {
        self.extractors.insert(extractor.kind(), extractor);
    }

    /// Check if an extractor is registered for a kind.
    pub fn supports(&self, kind: &str) -> bool {
        self.extractors.contains_key(kind)
    }

    /// The unknown-node policy.
    pub fn unknown_node_policy(&self) -> UnknownNodePolicy {
        self.unknown_node_policy
    }

    /// Extract the condition of a whole query, applying the clause limit.
    pub fn extract(&self, query: &dyn Query) -> Result<ExtractionResult> {
        let result = self.extract_node(query)?;
        Ok(match self.max_clauses {
            Some(max) => result.limit_clauses(max),
            None => result,
        })
    }

    /// Extract the condition of one node, dispatching on its kind.
    pub fn extract_node(&self, query: &dyn Query) -> Result<ExtractionResult> {
        match self.extractors.get(query.kind()) {
            Some(extractor) => extractor.extract(query, self),
            None => self.fallback(query),
        }
    }

    /// Result for a node no extractor understands.
    pub fn fallback(&self, query: &dyn Query) -> Result<ExtractionResult> {
        match self.unknown_node_policy {
            UnknownNodePolicy::AnyTerm => Ok(any_term_leaf(query)),
            UnknownNodePolicy::Fail => Err(PercolatorError::unsupported_node(query.kind())),
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.extractors.keys().copied().collect();
        kinds.sort_unstable();
        f.debug_struct("ExtractorRegistry")
            .field("kinds", &kinds)
            .field("unknown_node_policy", &self.unknown_node_policy)
            .field("max_clauses", &self.max_clauses)
            .finish()
    }
}
