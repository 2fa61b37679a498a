//! Matcher recording where the query terms hit the document.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::document::analyzed::AnalyzedDocument;
use crate::error::Result;
use crate::matcher::{CandidateMatcher, MatchRecord, MatcherFactory};
use crate::monitor::compiled::CompiledQuery;

/// One occurrence of a query term in the document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TermHit {
    /// The matched term, lossily decoded.
    pub term: String,
    /// Token position within the field.
    pub position: usize,
    /// Index of the field value holding the term.
    pub value_index: usize,
    /// Start byte offset within the value.
    pub start_offset: usize,
    /// End byte offset within the value.
    pub end_offset: usize,
}

/// A match with the term hits per field.
///
/// Queries without positive terms (match-all, pure negations, wildcards)
/// match with no hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightsMatch {
    /// Id of the matching query.
    pub query_id: String,
    /// Hits keyed by field, ordered by position.
    pub hits: BTreeMap<String, Vec<TermHit>>,
}

impl HighlightsMatch {
    /// Total number of hits.
    pub fn hit_count(&self) -> usize {
        self.hits.values().map(Vec::len).sum()
    }
}

impl MatchRecord for HighlightsMatch {
    fn query_id(&self) -> &str {
        &self.query_id
    }
}

/// Evaluates each candidate and collects the hits of its terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightingMatcher;

impl CandidateMatcher for HighlightingMatcher {
    type Match = HighlightsMatch;

    fn match_query(
        &mut self,
        query: &CompiledQuery,
        doc: &AnalyzedDocument,
    ) -> Result<Option<HighlightsMatch>> {
        if !query.query().matches(doc)? {
            return Ok(None);
        }

        let mut hits: BTreeMap<String, Vec<TermHit>> = BTreeMap::new();
        query.query().visit_terms(&mut |field, term| {
            let occurrences = doc.occurrences(field, term);
            if occurrences.is_empty() {
                return;
            }
            let text = String::from_utf8_lossy(term);
            let field_hits = hits.entry(field.to_string()).or_default();
            field_hits.extend(occurrences.iter().map(|occ| TermHit {
                term: text.to_string(),
                position: occ.position,
                value_index: occ.value_index,
                start_offset: occ.start_offset,
                end_offset: occ.end_offset,
            }));
        });
        for field_hits in hits.values_mut() {
            field_hits.sort_by_key(|h| h.position);
            field_hits.dedup();
        }

        Ok(Some(HighlightsMatch {
            query_id: query.id().to_string(),
            hits,
        }))
    }
}

/// Factory for [`HighlightingMatcher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightingMatcherFactory;

impl MatcherFactory for HighlightingMatcherFactory {
    type Matcher = HighlightingMatcher;

    fn create_matcher(&self, _doc: &AnalyzedDocument) -> HighlightingMatcher {
        HighlightingMatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::WhitespaceAnalyzer;
    use crate::document::document::InputDocument;
    use crate::extraction::registry::ExtractorRegistry;
    use crate::monitor::monitor_query::MonitorQuery;
    use crate::query::parser::QueryParser;

    fn compile(text: &str) -> CompiledQuery {
        let query = QueryParser::new().parse(text).unwrap();
        let extraction = ExtractorRegistry::new().extract(query.as_ref()).unwrap();
        CompiledQuery::new(MonitorQuery::new("q", text), query, extraction)
    }

    #[test]
    fn test_hits_with_offsets() {
        let doc = InputDocument::builder("d")
            .add_text("f", "the quick fox")
            .add_text("g", "fox")
            .build();
        let doc = AnalyzedDocument::analyze(&doc, &WhitespaceAnalyzer::new()).unwrap();

        let mut matcher = HighlightingMatcherFactory.create_matcher(&doc);
        let hit = matcher
            .match_query(&compile("f:fox OR f:quick -g:dog"), &doc)
            .unwrap()
            .unwrap();

        assert_eq!(hit.hit_count(), 2);
        let f_hits = &hit.hits["f"];
        assert_eq!(f_hits[0].term, "quick");
        assert_eq!((f_hits[0].start_offset, f_hits[0].end_offset), (4, 9));
        assert_eq!(f_hits[1].term, "fox");
        assert!(!hit.hits.contains_key("g"));
    }

    #[test]
    fn test_no_match() {
        let doc = InputDocument::builder("d").add_text("f", "cat").build();
        let doc = AnalyzedDocument::analyze(&doc, &WhitespaceAnalyzer::new()).unwrap();

        let mut matcher = HighlightingMatcher;
        assert!(matcher.match_query(&compile("f:dog"), &doc).unwrap().is_none());
    }
}
