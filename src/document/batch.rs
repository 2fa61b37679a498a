//! Batches of documents matched as a unit.

use std::sync::Arc;

use ahash::AHashSet;
use rayon::prelude::*;

use crate::analysis::analyzer::Analyzer;
use crate::document::analyzed::AnalyzedDocument;
use crate::document::document::InputDocument;
use crate::error::{PercolatorError, Result};

/// A set of documents submitted together for matching.
///
/// Documents in a batch share an analyzer but are evaluated independently:
/// no query ever matches across two documents.
#[derive(Clone)]
pub struct DocumentBatch {
    analyzer: Arc<dyn Analyzer>,
    documents: Vec<InputDocument>,
    ids: AHashSet<String>,
}

impl DocumentBatch {
    /// Create an empty batch using the given analyzer for text fields.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        DocumentBatch {
            analyzer,
            documents: Vec::new(),
            ids: AHashSet::new(),
        }
    }

    /// Create a batch holding a single document.
    pub fn of(analyzer: Arc<dyn Analyzer>, document: InputDocument) -> Self {
        let mut batch = Self::new(analyzer);
        batch.ids.insert(document.id().to_string());
        batch.documents.push(document);
        batch
    }

    /// Create a batch from several documents; ids must be unique.
    pub fn from_documents<I>(analyzer: Arc<dyn Analyzer>, documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = InputDocument>,
    {
        let mut batch = Self::new(analyzer);
        for document in documents {
            batch.add(document)?;
        }
        Ok(batch)
    }

    /// Add a document. Fails if a document with the same id is already present.
    pub fn add(&mut self, document: InputDocument) -> Result<()> {
        if !self.ids.insert(document.id().to_string()) {
            return Err(PercolatorError::invalid_argument(format!(
                "duplicate document id '{}' in batch",
                document.id()
            )));
        }
        self.documents.push(document);
        Ok(())
    }

    /// The documents in insertion order.
    pub fn documents(&self) -> &[InputDocument] {
        &self.documents
    }

    /// The analyzer used for text fields.
    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the batch holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Analyze every document, one after another.
    pub fn analyze(&self) -> Result<Vec<AnalyzedDocument>> {
        self.documents
            .iter()
            .map(|doc| AnalyzedDocument::analyze(doc, self.analyzer.as_ref()))
            .collect()
    }

    /// Analyze every document on the rayon pool.
    pub fn par_analyze(&self) -> Result<Vec<AnalyzedDocument>> {
        self.documents
            .par_iter()
            .map(|doc| AnalyzedDocument::analyze(doc, self.analyzer.as_ref()))
            .collect()
    }
}

impl std::fmt::Debug for DocumentBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentBatch")
            .field("analyzer", &self.analyzer.name())
            .field("documents", &self.documents.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::WhitespaceAnalyzer;

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut batch = DocumentBatch::new(Arc::new(WhitespaceAnalyzer::new()));
        batch
            .add(InputDocument::builder("a").add_text("f", "x").build())
            .unwrap();
        let err = batch
            .add(InputDocument::builder("a").add_text("f", "y").build())
            .unwrap_err();

        assert!(matches!(err, PercolatorError::InvalidArgument(_)));
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_parallel_analysis_matches_sequential() {
        let docs = (0..16).map(|i| {
            InputDocument::builder(format!("doc{i}"))
                .add_text("f", format!("term{i} shared"))
                .build()
        });
        let batch = DocumentBatch::from_documents(Arc::new(WhitespaceAnalyzer::new()), docs).unwrap();

        let sequential = batch.analyze().unwrap();
        let parallel = batch.par_analyze().unwrap();
        assert_eq!(sequential.len(), parallel.len());
        for (a, b) in sequential.iter().zip(parallel.iter()) {
            assert_eq!(a.id(), b.id());
            assert_eq!(a.unique_term_count(), b.unique_term_count());
        }
    }
}
