//! Base query trait.
//!
//! A registered query is kept as a tree of [`Query`] nodes. Each node can
//! evaluate itself exactly against one [`AnalyzedDocument`]; this is the
//! authoritative answer that every presearcher candidate is verified with.
//! The node [`kind`](Query::kind) is the tag term extractors are registered
//! under.

use std::any::Any;
use std::fmt::Debug;

use crate::document::analyzed::AnalyzedDocument;
use crate::error::Result;

/// Trait for query tree nodes.
pub trait Query: Send + Sync + Debug {
    /// Tag identifying the node kind (e.g. `"term"`, `"boolean"`).
    ///
    /// Term extractors are looked up by this tag. Custom node kinds should use
    /// a tag of their own; unknown tags fall back to the unanalyzable-leaf rule.
    fn kind(&self) -> &'static str;

    /// Decide whether this query matches the document.
    ///
    /// Errors are confined to this query/document pair.
    fn matches(&self, doc: &AnalyzedDocument) -> Result<bool>;

    /// Visit the positive `(field, term)` pairs of this query.
    ///
    /// Negated sub-queries are not visited. Used to report which terms of a
    /// matching query hit the document.
    fn visit_terms(&self, _visitor: &mut dyn FnMut(&str, &[u8])) {}

    /// Get a human-readable description of this query.
    fn description(&self) -> String;

    /// Clone this query.
    fn clone_box(&self) -> Box<dyn Query>;

    /// Get this query as Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Get the field name this query searches in, if applicable.
    ///
    /// Returns `None` for queries that don't target a single field
    /// (e.g. boolean or match-all queries).
    fn field(&self) -> Option<&str> {
        None
    }
}

impl Clone for Box<dyn Query> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
