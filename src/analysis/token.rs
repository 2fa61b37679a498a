//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows from a tokenizer through filters and
//! finally into an analyzed document or a query term. Terms are raw bytes:
//! most analyzers produce UTF-8 text, but numeric and binary fields produce
//! encoded byte strings that must compare equal on the query and document side.
//!
//! # Examples
//!
//! ```
//! use percolator::analysis::token::Token;
//!
//! let token = Token::with_offsets("world", 1, 6, 11);
//! assert_eq!(token.text(), "world");
//! assert_eq!(token.start_offset, 6);
//! assert_eq!(token.end_offset, 11);
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A token represents a single unit of text after tokenization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The term bytes of the token
    pub term: Vec<u8>,

    /// The position of the token in the original token stream (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the original text
    pub start_offset: usize,

    /// The byte offset where this token ends in the original text
    pub end_offset: usize,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            term: text.into().into_bytes(),
            position,
            start_offset: 0,
            end_offset: 0,
        }
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            term: text.into().into_bytes(),
            position,
            start_offset,
            end_offset,
        }
    }

    /// Create a token from raw term bytes (numeric or binary terms).
    pub fn from_bytes(term: Vec<u8>, position: usize) -> Self {
        Token {
            term,
            position,
            start_offset: 0,
            end_offset: 0,
        }
    }

    /// The term as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.term)
    }

    /// Get the length of the term in bytes.
    pub fn len(&self) -> usize {
        self.term.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }

    /// Clone this token with updated text.
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        let mut token = self.clone();
        token.term = text.into().into_bytes();
        token
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.text(), self.position)
    }
}

/// A stream of tokens produced by a tokenizer or filter.
pub type TokenStream = Box<dyn Iterator<Item = Token> + Send>;
