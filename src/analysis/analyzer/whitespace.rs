//! Whitespace analyzer: split on whitespace, nothing else.

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// An analyzer that splits text on whitespace and keeps the case of every token.
#[derive(Debug)]
pub struct WhitespaceAnalyzer {
    inner: PipelineAnalyzer,
}

impl WhitespaceAnalyzer {
    /// Create a new whitespace analyzer.
    pub fn new() -> Self {
        WhitespaceAnalyzer {
            inner: PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new())).with_name("whitespace"),
        }
    }
}

impl Default for WhitespaceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for WhitespaceAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_analyzer_keeps_case() {
        let analyzer = WhitespaceAnalyzer::new();
        let tokens: Vec<_> = analyzer.analyze("Foo bar-baz").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text(), "Foo");
        assert_eq!(tokens[1].text(), "bar-baz");
    }
}
