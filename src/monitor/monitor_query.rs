//! Queries as submitted to the monitor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PercolatorError, Result};

/// Free-form key/value metadata attached to a query.
pub type Metadata = BTreeMap<String, String>;

/// A query registration: unique id, source text and metadata.
///
/// Registering a query with an id that is already present replaces the
/// previous registration entirely.
///
/// # Examples
///
/// ```
/// use percolator::monitor::MonitorQuery;
///
/// let query = MonitorQuery::new("q1", "title:rust").with_metadata("owner", "ops");
/// assert_eq!(query.id(), "q1");
/// assert_eq!(query.metadata()["owner"], "ops");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorQuery {
    id: String,
    query: String,
    #[serde(default)]
    metadata: Metadata,
}

impl MonitorQuery {
    /// Create a query without metadata.
    pub fn new<I: Into<String>, Q: Into<String>>(id: I, query: Q) -> Self {
        MonitorQuery {
            id: id.into(),
            query: query.into(),
            metadata: Metadata::new(),
        }
    }

    /// Add a metadata entry.
    pub fn with_metadata<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The query id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The query source text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The query metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Check that the query can be registered.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(PercolatorError::invalid_argument("query id must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_without_metadata() {
        let query: MonitorQuery = serde_json::from_str(r#"{"id":"1","query":"f:a"}"#).unwrap();
        assert_eq!(query, MonitorQuery::new("1", "f:a"));
    }

    #[test]
    fn test_empty_id_is_invalid() {
        assert!(MonitorQuery::new("", "f:a").validate().is_err());
        assert!(MonitorQuery::new("1", "f:a").validate().is_ok());
    }
}
