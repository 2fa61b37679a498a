//! Numeric tokenizer producing prefix-coded terms.
//!
//! A numeric value is indexed as one term per precision level: the full value
//! (shift 0) and then the value with `precision_step`, `2 * precision_step`, ...
//! low bits dropped. Exact term queries only ever need the shift 0 term; the
//! lower-precision terms let range filters use few term lookups.

use super::Tokenizer;

use crate::analysis::token::{Token, TokenStream};
use crate::error::{PercolatorError, Result};
use crate::util::numeric::{int_to_prefix_coded, long_to_prefix_coded};

/// Default number of bits dropped per additional precision level.
pub const DEFAULT_PRECISION_STEP: u32 = 16;

/// Width of the numeric values handled by a [`NumericTokenizer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericWidth {
    /// 32-bit integers
    Int,
    /// 64-bit integers
    Long,
}

/// A tokenizer that parses its input as an integer and emits prefix-coded terms.
#[derive(Clone, Debug)]
pub struct NumericTokenizer {
    width: NumericWidth,
    precision_step: u32,
}

impl NumericTokenizer {
    /// Create a tokenizer for 32-bit integers.
    pub fn int() -> Self {
        NumericTokenizer {
            width: NumericWidth::Int,
            precision_step: DEFAULT_PRECISION_STEP,
        }
    }

    /// Create a tokenizer for 64-bit integers.
    pub fn long() -> Self {
        NumericTokenizer {
            width: NumericWidth::Long,
            precision_step: DEFAULT_PRECISION_STEP,
        }
    }

    /// Set the precision step. A step of zero is rejected.
    pub fn with_precision_step(mut self, precision_step: u32) -> Result<Self> {
        if precision_step == 0 {
            return Err(PercolatorError::invalid_argument(
                "precision step must be at least 1",
            ));
        }
        self.precision_step = precision_step;
        Ok(self)
    }

    /// Get the value width.
    pub fn width(&self) -> NumericWidth {
        self.width
    }

    /// Get the precision step.
    pub fn precision_step(&self) -> u32 {
        self.precision_step
    }

    /// Terms for a 32-bit value, full precision first.
    pub fn int_terms(&self, value: i32) -> Vec<Token> {
        (0..32)
            .step_by(self.precision_step as usize)
            .map(|shift| Token::from_bytes(int_to_prefix_coded(value, shift), 0))
            .collect()
    }

    /// Terms for a 64-bit value, full precision first.
    pub fn long_terms(&self, value: i64) -> Vec<Token> {
        (0..64)
            .step_by(self.precision_step as usize)
            .map(|shift| Token::from_bytes(long_to_prefix_coded(value, shift), 0))
            .collect()
    }
}

impl Tokenizer for NumericTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let trimmed = text.trim();
        let tokens = match self.width {
            NumericWidth::Int => {
                let value: i32 = trimmed.parse().map_err(|e| {
                    PercolatorError::analysis(format!("not a 32-bit integer '{trimmed}': {e}"))
                })?;
                self.int_terms(value)
            }
            NumericWidth::Long => {
                let value: i64 = trimmed.parse().map_err(|e| {
                    PercolatorError::analysis(format!("not a 64-bit integer '{trimmed}': {e}"))
                })?;
                self.long_terms(value)
            }
        };

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "numeric"
    }
}
