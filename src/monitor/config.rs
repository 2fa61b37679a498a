//! Monitor configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extraction::registry::{ExtractorRegistry, UnknownNodePolicy};
use crate::presearcher::PresearcherKind;

/// Configuration for a [`Monitor`](crate::monitor::Monitor).
///
/// # Examples
///
/// ```
/// use percolator::monitor::MonitorConfig;
/// use percolator::presearcher::PresearcherKind;
///
/// let config = MonitorConfig::from_json(r#"{"presearcher": "match_all"}"#).unwrap();
/// assert_eq!(config.presearcher, PresearcherKind::MatchAll);
/// assert!(config.parallel_match);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Candidate selection strategy.
    pub presearcher: PresearcherKind,
    /// Handling of query node kinds without a term extractor.
    pub unknown_node_policy: UnknownNodePolicy,
    /// Keep at most this many clauses per query (most selective first).
    pub max_clauses_per_query: Option<usize>,
    /// Fail registrations once the candidate index holds this many terms.
    pub max_indexed_terms: Option<usize>,
    /// Match the documents of a batch in parallel.
    pub parallel_match: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            presearcher: PresearcherKind::TermFiltered,
            unknown_node_policy: UnknownNodePolicy::AnyTerm,
            max_clauses_per_query: None,
            max_indexed_terms: None,
            parallel_match: true,
        }
    }
}

impl MonitorConfig {
    /// Read a configuration from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the presearcher.
    pub fn presearcher(mut self, kind: PresearcherKind) -> Self {
        self.presearcher = kind;
        self
    }

    /// Set the unknown node policy.
    pub fn unknown_node_policy(mut self, policy: UnknownNodePolicy) -> Self {
        self.unknown_node_policy = policy;
        self
    }

    /// Set the per-query clause limit.
    pub fn max_clauses_per_query(mut self, max: usize) -> Self {
        self.max_clauses_per_query = Some(max);
        self
    }

    /// Set the index size limit.
    pub fn max_indexed_terms(mut self, max: usize) -> Self {
        self.max_indexed_terms = Some(max);
        self
    }

    /// Enable or disable parallel matching.
    pub fn parallel_match(mut self, parallel: bool) -> Self {
        self.parallel_match = parallel;
        self
    }

    /// Build the extractor registry this configuration describes.
    pub fn extractor_registry(&self) -> ExtractorRegistry {
        ExtractorRegistry::new()
            .with_unknown_node_policy(self.unknown_node_policy)
            .with_max_clauses(self.max_clauses_per_query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.presearcher, PresearcherKind::TermFiltered);
        assert_eq!(config.unknown_node_policy, UnknownNodePolicy::AnyTerm);
        assert!(config.parallel_match);
    }

    #[test]
    fn test_from_json() {
        let config = MonitorConfig::from_json(
            r#"{"unknown_node_policy": "fail", "max_indexed_terms": 10, "parallel_match": false}"#,
        )
        .unwrap();

        assert_eq!(config.unknown_node_policy, UnknownNodePolicy::Fail);
        assert_eq!(config.max_indexed_terms, Some(10));
        assert!(!config.parallel_match);
        assert_eq!(config.presearcher, PresearcherKind::TermFiltered);
    }

    #[test]
    fn test_invalid_json() {
        assert!(MonitorConfig::from_json(r#"{"presearcher": "bogus"}"#).is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = MonitorConfig::default().max_clauses_per_query(3);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(MonitorConfig::from_json(&json).unwrap(), config);
    }
}
