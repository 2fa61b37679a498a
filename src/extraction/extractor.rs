//! Term extractor trait and the built-in extractors.
//!
//! Each extractor handles one query node kind and turns a node into its
//! [`ExtractionResult`], asking the registry to extract child nodes.

use crate::error::Result;
use crate::extraction::registry::ExtractorRegistry;
use crate::extraction::result::ExtractionResult;
use crate::extraction::term::QueryTerm;
use crate::query::boolean::{BooleanQuery, Occur};
use crate::query::match_all::MatchAllQuery;
use crate::query::phrase::PhraseQuery;
use crate::query::query::Query;
use crate::query::term::TermQuery;

/// Derives a necessary condition from one kind of query node.
pub trait TermExtractor: Send + Sync {
    /// The node kind this extractor is registered for.
    fn kind(&self) -> &'static str;

    /// Extract the condition of `query`.
    ///
    /// The result must never be stronger than necessary: every document the
    /// query matches satisfies every returned clause.
    fn extract(&self, query: &dyn Query, registry: &ExtractorRegistry) -> Result<ExtractionResult>;
}

/// Extracts the exact term of a [`TermQuery`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TermQueryExtractor;

impl TermExtractor for TermQueryExtractor {
    fn kind(&self) -> &'static str {
        TermQuery::KIND
    }

    fn extract(&self, query: &dyn Query, registry: &ExtractorRegistry) -> Result<ExtractionResult> {
        let Some(term) = query.as_any().downcast_ref::<TermQuery>() else {
            return registry.fallback(query);
        };
        Ok(ExtractionResult::single(QueryTerm::exact(
            term.field().unwrap_or_default(),
            term.term(),
        )))
    }
}

/// Match-all queries require nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAllExtractor;

impl TermExtractor for MatchAllExtractor {
    fn kind(&self) -> &'static str {
        MatchAllQuery::KIND
    }

    fn extract(&self, _query: &dyn Query, _registry: &ExtractorRegistry) -> Result<ExtractionResult> {
        Ok(ExtractionResult::always_candidate())
    }
}

/// Every term of a phrase must be present: one clause per term.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhraseQueryExtractor;

impl TermExtractor for PhraseQueryExtractor {
    fn kind(&self) -> &'static str {
        PhraseQuery::KIND
    }

    fn extract(&self, query: &dyn Query, registry: &ExtractorRegistry) -> Result<ExtractionResult> {
        let Some(phrase) = query.as_any().downcast_ref::<PhraseQuery>() else {
            return registry.fallback(query);
        };
        let field = phrase.field().unwrap_or_default();
        Ok(ExtractionResult::conjunction(
            phrase
                .terms()
                .iter()
                .map(|t| ExtractionResult::single(QueryTerm::exact(field, t.as_slice()))),
        ))
    }
}

/// Treats a node kind as an unanalyzable leaf of its field.
///
/// Used for wildcard and range queries, whose matching terms cannot be
/// enumerated up front.
#[derive(Debug, Clone, Copy)]
pub struct AnyTermExtractor {
    kind: &'static str,
}

impl AnyTermExtractor {
    /// Create an any-term extractor for a node kind.
    pub fn new(kind: &'static str) -> Self {
        AnyTermExtractor { kind }
    }
}

impl TermExtractor for AnyTermExtractor {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn extract(&self, query: &dyn Query, _registry: &ExtractorRegistry) -> Result<ExtractionResult> {
        Ok(any_term_leaf(query))
    }
}

/// The unanalyzable-leaf rule: one any-term clause for the node's field, or
/// no clause when the node has no field.
pub fn any_term_leaf(query: &dyn Query) -> ExtractionResult {
    match query.field() {
        Some(field) => ExtractionResult::single(QueryTerm::any(field)),
        None => ExtractionResult::always_candidate(),
    }
}

/// Combines the conditions of boolean clauses.
///
/// - MUST clauses are a conjunction.
/// - MUST_NOT clauses contribute nothing.
/// - SHOULD clauses with threshold `k` over `n` clauses: a conjunction when
///   `k >= n`, the union of each clause's first condition clause when `k == 1`,
///   and nothing otherwise. They only count when there are no MUST clauses
///   or `k > 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanQueryExtractor;

impl TermExtractor for BooleanQueryExtractor {
    fn kind(&self) -> &'static str {
        BooleanQuery::KIND
    }

    fn extract(&self, query: &dyn Query, registry: &ExtractorRegistry) -> Result<ExtractionResult> {
        let Some(boolean) = query.as_any().downcast_ref::<BooleanQuery>() else {
            return registry.fallback(query);
        };

        let must = boolean
            .clauses_by_occur(Occur::Must)
            .map(|c| registry.extract_node(c.query.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let should: Vec<&dyn Query> = boolean
            .clauses_by_occur(Occur::Should)
            .map(|c| c.query.as_ref())
            .collect();

        let mut minimum = boolean.minimum_should_match();
        if minimum == 0 && must.is_empty() && !should.is_empty() {
            minimum = 1;
        }

        let should_part = if minimum == 0 || should.is_empty() {
            ExtractionResult::always_candidate()
        } else {
            let children = should
                .iter()
                .map(|q| registry.extract_node(*q))
                .collect::<Result<Vec<_>>>()?;
            if minimum >= children.len() {
                ExtractionResult::conjunction(children)
            } else if minimum == 1 {
                ExtractionResult::union_of_first_clauses(children)
            } else {
                ExtractionResult::always_candidate()
            }
        };

        Ok(ExtractionResult::conjunction(
            must.into_iter().chain(std::iter::once(should_part)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::boolean::BooleanQueryBuilder;
    use crate::query::wildcard::WildcardQuery;

    fn term(t: &str) -> Box<dyn Query> {
        Box::new(TermQuery::new("f", t))
    }

    fn extract(query: &dyn Query) -> ExtractionResult {
        ExtractorRegistry::new().extract(query).unwrap()
    }

    #[test]
    fn test_term_extraction() {
        let result = extract(&TermQuery::new("f", "a"));
        assert_eq!(result.to_string(), "(f:a)");
    }

    #[test]
    fn test_conjunction() {
        let query = BooleanQueryBuilder::new().must(term("a")).must(term("b")).build();
        assert_eq!(extract(&query).to_string(), "(f:a) AND (f:b)");
    }

    #[test]
    fn test_disjunction_single_clause() {
        let query = BooleanQueryBuilder::new().should(term("a")).should(term("b")).build();
        assert_eq!(extract(&query).to_string(), "(f:a OR f:b)");
    }

    #[test]
    fn test_disjunction_all_required_is_conjunction() {
        let query = BooleanQueryBuilder::new()
            .should(term("a"))
            .should(term("b"))
            .minimum_should_match(2)
            .build();
        assert_eq!(extract(&query).to_string(), "(f:a) AND (f:b)");
    }

    #[test]
    fn test_disjunction_partial_threshold_is_always_candidate() {
        let query = BooleanQueryBuilder::new()
            .should(term("a"))
            .should(term("b"))
            .should(term("c"))
            .minimum_should_match(2)
            .build();
        assert!(extract(&query).is_always_candidate());
    }

    #[test]
    fn test_optional_should_next_to_must_is_ignored() {
        let query = BooleanQueryBuilder::new().must(term("a")).should(term("b")).build();
        assert_eq!(extract(&query).to_string(), "(f:a)");
    }

    #[test]
    fn test_negation_contributes_nothing() {
        let query = BooleanQueryBuilder::new()
            .must(Box::new(MatchAllQuery::new()))
            .must_not(term("a"))
            .build();
        assert!(extract(&query).is_always_candidate());

        let query = BooleanQueryBuilder::new().must(term("b")).must_not(term("a")).build();
        assert_eq!(extract(&query).to_string(), "(f:b)");
    }

    #[test]
    fn test_phrase_requires_every_term() {
        let result = extract(&PhraseQuery::new("f", ["a", "b"]));
        assert_eq!(result.to_string(), "(f:a) AND (f:b)");
    }

    #[test]
    fn test_wildcard_in_disjunction_is_vacuous() {
        let query = BooleanQueryBuilder::new()
            .should(term("a"))
            .should(Box::new(WildcardQuery::new("g", "x*").unwrap()))
            .build();
        let result = extract(&query);
        assert_eq!(result.to_string(), "(f:a OR g:__ANY__)");
        assert!(result.is_vacuous());
    }
}
