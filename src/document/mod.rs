//! Documents submitted for matching.
//!
//! An [`InputDocument`] is built by the caller, grouped into a
//! [`DocumentBatch`], and analyzed into an [`AnalyzedDocument`] that the
//! presearcher and the query evaluator both read.

pub mod analyzed;
pub mod batch;
#[allow(clippy::module_inception)]
pub mod document;
pub mod field_value;

pub use analyzed::{AnalyzedDocument, FieldTerms, TermOccurrence};
pub use batch::DocumentBatch;
pub use document::{DocumentBuilder, InputDocument};
pub use field_value::FieldValue;
