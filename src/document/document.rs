//! Input documents submitted for matching.

use serde::{Deserialize, Serialize};

use crate::document::field_value::FieldValue;

/// A document to be run against the registered queries.
///
/// A document is an identified bag of `(field, value)` pairs. A field may occur
/// several times; every value is analyzed and matched independently of the
/// others, so a phrase never spans two values. The id is metadata only and is
/// never matchable as a field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputDocument {
    id: String,
    fields: Vec<(String, FieldValue)>,
}

impl InputDocument {
    /// Create a builder for a document with the given id.
    pub fn builder<S: Into<String>>(id: S) -> DocumentBuilder {
        DocumentBuilder::new(id)
    }

    /// Get the document's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All `(field, value)` pairs in insertion order.
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Values of one field, in insertion order.
    pub fn values<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldValue> + 'a {
        self.fields
            .iter()
            .filter(move |(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == field)
    }

    /// Get the number of field values.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A builder for constructing input documents in a fluent manner.
#[derive(Debug)]
pub struct DocumentBuilder {
    document: InputDocument,
}

impl DocumentBuilder {
    /// Create a new builder for a document with the given id.
    pub fn new<S: Into<String>>(id: S) -> Self {
        DocumentBuilder {
            document: InputDocument {
                id: id.into(),
                fields: Vec::new(),
            },
        }
    }

    /// Add a field value of any type.
    pub fn add_field<S: Into<String>>(mut self, name: S, value: FieldValue) -> Self {
        self.document.fields.push((name.into(), value));
        self
    }

    /// Add a text field, analyzed with the batch analyzer.
    pub fn add_text<S: Into<String>, T: Into<String>>(self, name: S, value: T) -> Self {
        self.add_field(name, FieldValue::Text(value.into()))
    }

    /// Add a 32-bit integer field.
    pub fn add_int<S: Into<String>>(self, name: S, value: i32) -> Self {
        self.add_field(name, FieldValue::Int(value))
    }

    /// Add a 64-bit integer field.
    pub fn add_long<S: Into<String>>(self, name: S, value: i64) -> Self {
        self.add_field(name, FieldValue::Long(value))
    }

    /// Add a binary field, indexed as one raw term.
    pub fn add_binary<S: Into<String>>(self, name: S, value: Vec<u8>) -> Self {
        self.add_field(name, FieldValue::Binary(value))
    }

    /// Build the document.
    pub fn build(self) -> InputDocument {
        self.document
    }
}
