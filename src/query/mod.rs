//! Query trees: node types, exact evaluation and the query string parser.

pub mod boolean;
pub mod match_all;
pub mod parser;
pub mod phrase;
#[allow(clippy::module_inception)]
pub mod query;
pub mod range;
pub mod term;
pub mod wildcard;

pub use boolean::{BooleanClause, BooleanQuery, BooleanQueryBuilder, Occur};
pub use match_all::MatchAllQuery;
pub use parser::QueryParser;
pub use phrase::PhraseQuery;
pub use query::Query;
pub use range::TermRangeQuery;
pub use term::TermQuery;
pub use wildcard::WildcardQuery;
