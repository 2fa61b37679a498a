//! Term range query: terms between two byte bounds.

use std::ops::Bound;

use crate::document::analyzed::AnalyzedDocument;
use crate::error::{PercolatorError, Result};
use crate::query::query::Query;
use crate::util::numeric::{int_to_prefix_coded, long_to_prefix_coded};

/// A query matching documents with at least one term of a field inside a
/// byte-wise range.
///
/// Bounds compare terms lexicographically as bytes. Numeric ranges work on
/// full-precision prefix-coded terms because their byte order equals numeric
/// order (see [`TermRangeQuery::int_range`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRangeQuery {
    field: String,
    lower: Bound<Vec<u8>>,
    upper: Bound<Vec<u8>>,
    /// Length of the full-precision numeric term this range is restricted to.
    numeric_len: Option<usize>,
}

impl TermRangeQuery {
    /// Node kind tag.
    pub const KIND: &'static str = "term_range";

    /// Create a range over text or raw terms.
    pub fn new<F: Into<String>>(field: F, lower: Bound<Vec<u8>>, upper: Bound<Vec<u8>>) -> Self {
        TermRangeQuery {
            field: field.into(),
            lower,
            upper,
            numeric_len: None,
        }
    }

    /// Create an inclusive text range; `None` leaves a side open.
    pub fn inclusive<F: Into<String>>(field: F, lower: Option<&str>, upper: Option<&str>) -> Self {
        let to_bound = |b: Option<&str>| match b {
            Some(text) => Bound::Included(text.as_bytes().to_vec()),
            None => Bound::Unbounded,
        };
        Self::new(field, to_bound(lower), to_bound(upper))
    }

    /// Create an inclusive range over 32-bit numeric terms.
    pub fn int_range<F: Into<String>>(field: F, lower: Option<i32>, upper: Option<i32>) -> Self {
        let lower_term = int_to_prefix_coded(lower.unwrap_or(i32::MIN), 0);
        let upper_term = int_to_prefix_coded(upper.unwrap_or(i32::MAX), 0);
        TermRangeQuery {
            field: field.into(),
            numeric_len: Some(lower_term.len()),
            lower: Bound::Included(lower_term),
            upper: Bound::Included(upper_term),
        }
    }

    /// Create an inclusive range over 64-bit numeric terms.
    pub fn long_range<F: Into<String>>(field: F, lower: Option<i64>, upper: Option<i64>) -> Self {
        let lower_term = long_to_prefix_coded(lower.unwrap_or(i64::MIN), 0);
        let upper_term = long_to_prefix_coded(upper.unwrap_or(i64::MAX), 0);
        TermRangeQuery {
            field: field.into(),
            numeric_len: Some(lower_term.len()),
            lower: Bound::Included(lower_term),
            upper: Bound::Included(upper_term),
        }
    }

    /// Validate that the range is not inverted.
    pub fn validate(&self) -> Result<()> {
        if let (
            Bound::Included(l) | Bound::Excluded(l),
            Bound::Included(u) | Bound::Excluded(u),
        ) = (&self.lower, &self.upper)
        {
            if l > u {
                return Err(PercolatorError::parse(format!(
                    "inverted range on field '{}'",
                    self.field
                )));
            }
        }
        Ok(())
    }

    /// Get the lower bound.
    pub fn lower(&self) -> &Bound<Vec<u8>> {
        &self.lower
    }

    /// Get the upper bound.
    pub fn upper(&self) -> &Bound<Vec<u8>> {
        &self.upper
    }

    /// Check if a term is inside the range.
    pub fn contains(&self, term: &[u8]) -> bool {
        if let Some(len) = self.numeric_len {
            if term.len() != len || Some(&term[0]) != self.lower_first_byte() {
                return false;
            }
        }
        let above = match &self.lower {
            Bound::Included(l) => term >= l.as_slice(),
            Bound::Excluded(l) => term > l.as_slice(),
            Bound::Unbounded => true,
        };
        let below = match &self.upper {
            Bound::Included(u) => term <= u.as_slice(),
            Bound::Excluded(u) => term < u.as_slice(),
            Bound::Unbounded => true,
        };
        above && below
    }

    fn lower_first_byte(&self) -> Option<&u8> {
        match &self.lower {
            Bound::Included(l) | Bound::Excluded(l) => l.first(),
            Bound::Unbounded => None,
        }
    }
}

impl Query for TermRangeQuery {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn matches(&self, doc: &AnalyzedDocument) -> Result<bool> {
        let Some(field) = doc.field(&self.field) else {
            return Ok(false);
        };
        Ok(field.terms().any(|term| self.contains(term)))
    }

    fn description(&self) -> String {
        let show = |b: &[u8]| String::from_utf8_lossy(b).into_owned();
        let (open, lower) = match &self.lower {
            Bound::Included(l) => ('[', show(l)),
            Bound::Excluded(l) => ('{', show(l)),
            Bound::Unbounded => ('[', "*".to_string()),
        };
        let (close, upper) = match &self.upper {
            Bound::Included(u) => (']', show(u)),
            Bound::Excluded(u) => ('}', show(u)),
            Bound::Unbounded => (']', "*".to_string()),
        };
        format!("{}:{open}{lower} TO {upper}{close}", self.field)
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn field(&self) -> Option<&str> {
        Some(&self.field)
    }
}
