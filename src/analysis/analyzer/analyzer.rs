//! Core analyzer trait definition.
//!
//! Analyzers turn raw field text into the terms that both the candidate index
//! and exact evaluation see:
//!
//! ```text
//! Raw Text → Analyzer → Token Stream → AnalyzedDocument
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1..N
//! ```
//!
//! The same analyzer must be used for documents as was assumed when the query
//! terms were written, otherwise filtering silently loses recall.
//!
//! # Examples
//!
//! ```
//! use percolator::analysis::analyzer::Analyzer;
//! use percolator::analysis::analyzer::standard::StandardAnalyzer;
//!
//! let analyzer = StandardAnalyzer::new().unwrap();
//! let tokens: Vec<_> = analyzer.analyze("Hello World").unwrap().collect();
//!
//! assert_eq!(tokens[0].text(), "hello");
//! assert_eq!(tokens[1].text(), "world");
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so one analyzer can be shared by every
/// worker that matches documents concurrently.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Analyze the text of a specific field.
    ///
    /// Analyzers that treat fields differently (see
    /// [`PerFieldAnalyzer`](super::per_field::PerFieldAnalyzer)) override this;
    /// everyone else analyzes every field the same way.
    fn analyze_field(&self, _field: &str, text: &str) -> Result<TokenStream> {
        self.analyze(text)
    }

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}
