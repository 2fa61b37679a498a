//! Text analysis: tokenizers, token filters and analyzers.
//!
//! Document fields are analyzed into terms before candidate selection and
//! exact evaluation; query terms are expected to already be in analyzed form.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{
    Analyzer, KeywordAnalyzer, PerFieldAnalyzer, PipelineAnalyzer, StandardAnalyzer,
    WhitespaceAnalyzer,
};
pub use token::{Token, TokenStream};
pub use token_filter::{Filter, LowercaseFilter};
pub use tokenizer::{NumericTokenizer, RegexTokenizer, Tokenizer, WhitespaceTokenizer};
