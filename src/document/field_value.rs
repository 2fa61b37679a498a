//! Field value types for input documents.
//!
//! Text values go through the batch analyzer; numeric values are always
//! encoded as prefix-coded terms (see [`crate::util::numeric`]) and binary
//! values are indexed as one raw term, regardless of the analyzer.
//!
//! ```
//! use percolator::document::field_value::FieldValue;
//!
//! let text_value = FieldValue::Text("hello".to_string());
//! assert_eq!(text_value.as_text(), Some("hello"));
//!
//! let int_value = FieldValue::Int(42);
//! assert_eq!(int_value.as_long(), Some(42));
//! ```

use serde::{Deserialize, Serialize};

/// Represents a value for a field in an input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Text value, analyzed
    Text(String),
    /// 32-bit integer value
    Int(i32),
    /// 64-bit integer value
    Long(i64),
    /// Raw bytes, indexed as a single term
    Binary(Vec<u8>),
}

impl FieldValue {
    /// Get the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get the value widened to 64 bits if this is a numeric value.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) => Some(*value as i64),
            FieldValue::Long(value) => Some(*value),
            _ => None,
        }
    }

    /// Get the raw bytes if this is a binary value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Name of the value type (for error messages and output).
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Int(_) => "int",
            FieldValue::Long(_) => "long",
            FieldValue::Binary(_) => "binary",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Long(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(FieldValue::from("abc").as_text(), Some("abc"));
        assert_eq!(FieldValue::from(7i64).as_long(), Some(7));
        assert_eq!(FieldValue::Binary(vec![1, 2]).as_bytes(), Some(&[1u8, 2][..]));
        assert_eq!(FieldValue::Int(1).as_text(), None);
        assert_eq!(FieldValue::Int(1).type_name(), "int");
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&FieldValue::Int(3)).unwrap();
        assert_eq!(json, r#"{"type":"int","value":3}"#);
        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FieldValue::Int(3));
    }
}
