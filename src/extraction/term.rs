//! Terms extracted from query trees.

use std::fmt;

/// Whether an extracted term is a literal value or the any-term sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryTermKind {
    /// A literal term value that must be present in the document.
    Exact,
    /// The clause could be satisfied by anything in the field.
    Any,
}

/// A `(field, term)` pair extracted from a query.
///
/// An [`Any`](QueryTermKind::Any) term never equals a literal term, even one
/// with empty bytes, so it always survives set operations on clauses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryTerm {
    field: String,
    term: Vec<u8>,
    kind: QueryTermKind,
}

impl QueryTerm {
    /// Create a literal term.
    pub fn exact<F: Into<String>>(field: F, term: impl Into<Vec<u8>>) -> Self {
        QueryTerm {
            field: field.into(),
            term: term.into(),
            kind: QueryTermKind::Exact,
        }
    }

    /// Create the any-term sentinel for a field.
    pub fn any<F: Into<String>>(field: F) -> Self {
        QueryTerm {
            field: field.into(),
            term: Vec::new(),
            kind: QueryTermKind::Any,
        }
    }

    /// The field the term belongs to.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The term bytes; empty for the any-term sentinel.
    pub fn term(&self) -> &[u8] {
        &self.term
    }

    /// The term kind.
    pub fn kind(&self) -> QueryTermKind {
        self.kind
    }

    /// Check if this is the any-term sentinel.
    pub fn is_any(&self) -> bool {
        self.kind == QueryTermKind::Any
    }
}

impl fmt::Display for QueryTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            QueryTermKind::Any => write!(f, "{}:__ANY__", self.field),
            QueryTermKind::Exact => match std::str::from_utf8(&self.term) {
                Ok(text) => write!(f, "{}:{}", self.field, text),
                Err(_) => write!(f, "{}:{:?}", self.field, self.term),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_is_distinct_from_literals() {
        assert_ne!(QueryTerm::any("f"), QueryTerm::exact("f", Vec::<u8>::new()));
        assert_ne!(QueryTerm::any("f"), QueryTerm::any("g"));
        assert_eq!(QueryTerm::exact("f", "a"), QueryTerm::exact("f", b"a".to_vec()));
    }

    #[test]
    fn test_display() {
        assert_eq!(QueryTerm::exact("f", "a").to_string(), "f:a");
        assert_eq!(QueryTerm::any("f").to_string(), "f:__ANY__");
    }
}
