//! Conjunctive-normal-form necessary conditions.

use std::fmt;

use crate::extraction::term::QueryTerm;

/// A disjunction of terms: at least one must be present in the document.
///
/// A clause holding an any-term, or no terms at all, is always satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clause {
    terms: Vec<QueryTerm>,
}

impl Clause {
    /// Create a clause from terms; duplicates are dropped.
    pub fn new<I: IntoIterator<Item = QueryTerm>>(terms: I) -> Self {
        let mut terms: Vec<QueryTerm> = terms.into_iter().collect();
        terms.sort();
        terms.dedup();
        Clause { terms }
    }

    /// A clause holding a single term.
    pub fn single(term: QueryTerm) -> Self {
        Clause { terms: vec![term] }
    }

    /// The terms of the clause.
    pub fn terms(&self) -> &[QueryTerm] {
        &self.terms
    }

    /// Literal terms of the clause.
    pub fn literal_terms(&self) -> impl Iterator<Item = &QueryTerm> {
        self.terms.iter().filter(|t| !t.is_any())
    }

    /// Number of literal terms.
    pub fn literal_count(&self) -> usize {
        self.literal_terms().count()
    }

    /// Whether any document satisfies this clause.
    pub fn is_always_satisfied(&self) -> bool {
        self.terms.is_empty() || self.terms.iter().any(QueryTerm::is_any)
    }

    /// Merge another clause into this one (disjunction of both).
    pub fn union(mut self, other: &Clause) -> Self {
        self.terms.extend(other.terms.iter().cloned());
        Clause::new(self.terms)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self.terms.iter().map(ToString::to_string).collect();
        write!(f, "({})", terms.join(" OR "))
    }
}

/// The necessary condition extracted from a query: every clause must hold.
///
/// If the query matches a document, the document satisfies every clause. An
/// empty result holds no information, so the query is always a candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    clauses: Vec<Clause>,
}

impl ExtractionResult {
    /// The empty result: always a candidate.
    pub fn always_candidate() -> Self {
        ExtractionResult::default()
    }

    /// A single clause with a single term.
    pub fn single(term: QueryTerm) -> Self {
        ExtractionResult {
            clauses: vec![Clause::single(term)],
        }
    }

    /// Build from clauses.
    pub fn from_clauses(clauses: Vec<Clause>) -> Self {
        ExtractionResult { clauses }
    }

    /// Conjunction of several results: all of their clauses.
    pub fn conjunction<I: IntoIterator<Item = ExtractionResult>>(results: I) -> Self {
        ExtractionResult {
            clauses: results.into_iter().flat_map(|r| r.clauses).collect(),
        }
    }

    /// Disjunction of several results, approximated by one clause holding the
    /// first clause of every alternative.
    ///
    /// If any alternative carries no clause (or an empty first clause), nothing
    /// can be required and the result is always a candidate.
    pub fn union_of_first_clauses<I: IntoIterator<Item = ExtractionResult>>(results: I) -> Self {
        let mut merged = Clause::default();
        for result in results {
            match result.clauses.first() {
                Some(first) if !first.terms().is_empty() => merged = merged.union(first),
                _ => return ExtractionResult::always_candidate(),
            }
        }
        if merged.terms().is_empty() {
            return ExtractionResult::always_candidate();
        }
        ExtractionResult {
            clauses: vec![merged],
        }
    }

    /// The clauses of the condition.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Whether the result carries no clause at all.
    pub fn is_always_candidate(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Whether every document satisfies the condition.
    pub fn is_vacuous(&self) -> bool {
        self.clauses.iter().all(Clause::is_always_satisfied)
    }

    /// Clauses that can actually reject a document.
    pub fn required_clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().filter(|c| !c.is_always_satisfied())
    }

    /// Number of literal terms across all clauses.
    pub fn literal_count(&self) -> usize {
        self.clauses.iter().map(Clause::literal_count).sum()
    }

    /// Keep at most `max` clauses, preferring the most selective ones.
    ///
    /// Clauses that can reject documents come first, then those with fewer
    /// literal terms. Dropping clauses only weakens the condition.
    pub fn limit_clauses(mut self, max: usize) -> Self {
        if self.clauses.len() <= max {
            return self;
        }
        self.clauses
            .sort_by_key(|c| (c.is_always_satisfied(), c.literal_count()));
        self.clauses.truncate(max);
        self
    }
}

impl fmt::Display for ExtractionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return write!(f, "<always>");
        }
        let clauses: Vec<String> = self.clauses.iter().map(ToString::to_string).collect();
        write!(f, "{}", clauses.join(" AND "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(t: &str) -> QueryTerm {
        QueryTerm::exact("f", t)
    }

    #[test]
    fn test_conjunction_keeps_every_clause() {
        let result = ExtractionResult::conjunction(vec![
            ExtractionResult::single(exact("a")),
            ExtractionResult::single(exact("b")),
        ]);
        assert_eq!(result.clauses().len(), 2);
        assert_eq!(result.to_string(), "(f:a) AND (f:b)");
    }

    #[test]
    fn test_union_of_first_clauses() {
        let left = ExtractionResult::conjunction(vec![
            ExtractionResult::single(exact("a")),
            ExtractionResult::single(exact("x")),
        ]);
        let right = ExtractionResult::single(exact("b"));

        let result = ExtractionResult::union_of_first_clauses(vec![left, right]);
        assert_eq!(result.clauses().len(), 1);
        assert_eq!(result.clauses()[0].literal_count(), 2);
    }

    #[test]
    fn test_union_with_empty_alternative_is_always_candidate() {
        let result = ExtractionResult::union_of_first_clauses(vec![
            ExtractionResult::single(exact("a")),
            ExtractionResult::always_candidate(),
        ]);
        assert!(result.is_always_candidate());
    }

    #[test]
    fn test_any_term_propagates() {
        let result = ExtractionResult::union_of_first_clauses(vec![
            ExtractionResult::single(exact("a")),
            ExtractionResult::single(QueryTerm::any("g")),
        ]);
        assert!(!result.is_always_candidate());
        assert!(result.is_vacuous());
        assert_eq!(result.required_clauses().count(), 0);
    }

    #[test]
    fn test_limit_prefers_selective_clauses() {
        let result = ExtractionResult::from_clauses(vec![
            Clause::single(QueryTerm::any("f")),
            Clause::new(vec![exact("a"), exact("b"), exact("c")]),
            Clause::single(exact("d")),
        ])
        .limit_clauses(1);

        assert_eq!(result.clauses(), &[Clause::single(exact("d"))]);
    }
}
