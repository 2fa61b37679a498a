//! Term extraction: deriving a conservative necessary condition from a query.
//!
//! A query tree is reduced to an [`ExtractionResult`]: clauses of
//! [`QueryTerm`]s in conjunctive normal form. Every document the query
//! matches contains at least one term of every clause, so a document missing
//! a clause can be skipped without evaluating the query.

pub mod extractor;
pub mod registry;
pub mod result;
pub mod term;

pub use extractor::{
    AnyTermExtractor, BooleanQueryExtractor, MatchAllExtractor, PhraseQueryExtractor,
    TermExtractor, TermQueryExtractor,
};
pub use registry::{ExtractorRegistry, UnknownNodePolicy};
pub use result::{Clause, ExtractionResult};
pub use term::{QueryTerm, QueryTermKind};
