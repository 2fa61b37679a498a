//! Boolean query implementation for combining multiple queries.

use crate::document::analyzed::AnalyzedDocument;
use crate::error::Result;
use crate::query::query::Query;

/// Occurrence requirements for boolean clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    /// The clause must match (equivalent to AND).
    Must,
    /// The clause should match (equivalent to OR).
    Should,
    /// The clause must not match (equivalent to NOT).
    MustNot,
}

impl Occur {
    fn prefix(self) -> &'static str {
        match self {
            Occur::Must => "+",
            Occur::Should => "",
            Occur::MustNot => "-",
        }
    }
}

/// A clause in a boolean query.
#[derive(Debug, Clone)]
pub struct BooleanClause {
    /// The query for this clause.
    pub query: Box<dyn Query>,
    /// The occurrence requirement.
    pub occur: Occur,
}

impl BooleanClause {
    /// Create a new boolean clause.
    pub fn new(query: Box<dyn Query>, occur: Occur) -> Self {
        BooleanClause { query, occur }
    }
}

/// A boolean query that combines multiple queries with boolean logic.
///
/// Matching rules:
/// - every MUST clause matches and no MUST_NOT clause matches;
/// - at least `minimum_should_match` SHOULD clauses match, or at least one of
///   them when there are no MUST clauses and the minimum is zero;
/// - a query with only MUST_NOT clauses matches every document none of them
///   match;
/// - an empty query matches nothing.
#[derive(Debug, Clone, Default)]
pub struct BooleanQuery {
    clauses: Vec<BooleanClause>,
    minimum_should_match: usize,
}

impl BooleanQuery {
    /// Node kind tag.
    pub const KIND: &'static str = "boolean";

    /// Create a new empty boolean query.
    pub fn new() -> Self {
        BooleanQuery::default()
    }

    /// Add a clause to this boolean query.
    pub fn add_clause(&mut self, clause: BooleanClause) {
        self.clauses.push(clause);
    }

    /// Add a MUST clause.
    pub fn add_must(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::new(query, Occur::Must));
    }

    /// Add a SHOULD clause.
    pub fn add_should(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::new(query, Occur::Should));
    }

    /// Add a MUST_NOT clause.
    pub fn add_must_not(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::new(query, Occur::MustNot));
    }

    /// Set the minimum number of should clauses that must match.
    pub fn with_minimum_should_match(mut self, minimum: usize) -> Self {
        self.minimum_should_match = minimum;
        self
    }

    /// Get the clauses.
    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    /// Get the minimum should match value.
    pub fn minimum_should_match(&self) -> usize {
        self.minimum_should_match
    }

    /// Check if this query has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Get clauses by occurrence type.
    pub fn clauses_by_occur(&self, occur: Occur) -> impl Iterator<Item = &BooleanClause> {
        self.clauses.iter().filter(move |c| c.occur == occur)
    }
}

impl Query for BooleanQuery {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn matches(&self, doc: &AnalyzedDocument) -> Result<bool> {
        if self.clauses.is_empty() {
            return Ok(false);
        }

        let mut has_must = false;
        let mut has_should = false;
        let mut should_matched = 0;

        for clause in &self.clauses {
            match clause.occur {
                Occur::Must => {
                    has_must = true;
                    if !clause.query.matches(doc)? {
                        return Ok(false);
                    }
                }
                Occur::MustNot => {
                    if clause.query.matches(doc)? {
                        return Ok(false);
                    }
                }
                Occur::Should => {
                    has_should = true;
                    if clause.query.matches(doc)? {
                        should_matched += 1;
                    }
                }
            }
        }

        let required_should = if self.minimum_should_match > 0 {
            self.minimum_should_match
        } else if !has_must && has_should {
            1
        } else {
            0
        };

        Ok(should_matched >= required_should)
    }

    fn visit_terms(&self, visitor: &mut dyn FnMut(&str, &[u8])) {
        for clause in &self.clauses {
            if clause.occur != Occur::MustNot {
                clause.query.visit_terms(visitor);
            }
        }
    }

    fn description(&self) -> String {
        let inner = self
            .clauses
            .iter()
            .map(|c| format!("{}{}", c.occur.prefix(), c.query.description()))
            .collect::<Vec<_>>()
            .join(" ");
        if self.minimum_should_match > 0 {
            format!("({inner})~{}", self.minimum_should_match)
        } else {
            format!("({inner})")
        }
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Builder for boolean queries.
#[derive(Debug, Default)]
pub struct BooleanQueryBuilder {
    query: BooleanQuery,
}

impl BooleanQueryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        BooleanQueryBuilder::default()
    }

    /// Add a MUST clause.
    pub fn must(mut self, query: Box<dyn Query>) -> Self {
        self.query.add_must(query);
        self
    }

    /// Add a SHOULD clause.
    pub fn should(mut self, query: Box<dyn Query>) -> Self {
        self.query.add_should(query);
        self
    }

    /// Add a MUST_NOT clause.
    pub fn must_not(mut self, query: Box<dyn Query>) -> Self {
        self.query.add_must_not(query);
        self
    }

    /// Add a clause with an explicit occurrence.
    pub fn clause(mut self, query: Box<dyn Query>, occur: Occur) -> Self {
        self.query.add_clause(BooleanClause::new(query, occur));
        self
    }

    /// Set the minimum number of should clauses that must match.
    pub fn minimum_should_match(mut self, minimum: usize) -> Self {
        self.query.minimum_should_match = minimum;
        self
    }

    /// Build the boolean query.
    pub fn build(self) -> BooleanQuery {
        self.query
    }
}
