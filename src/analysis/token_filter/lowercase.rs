//! Lowercase filter implementation.
//!
//! ```
//! use percolator::analysis::token_filter::Filter;
//! use percolator::analysis::token_filter::lowercase::LowercaseFilter;
//! use percolator::analysis::token::Token;
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("Hello", 0), Token::new("WORLD", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text(), "hello");
//! assert_eq!(filtered[1].text(), "world");
//! ```

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that converts tokens to lowercase.
///
/// Terms that are not valid UTF-8 (numeric or binary terms) pass through
/// untouched; positions and offsets are preserved.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }

    fn lowercase(mut token: Token) -> Token {
        if token.term.is_ascii() {
            token.term.make_ascii_lowercase();
            return token;
        }
        match std::str::from_utf8(&token.term) {
            Ok(text) => {
                let lowered = text.to_lowercase();
                token.term = lowered.into_bytes();
                token
            }
            Err(_) => token,
        }
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(Self::lowercase)))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
