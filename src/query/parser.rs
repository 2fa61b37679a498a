//! Query parser for converting string queries to query trees.
//!
//! Supported syntax:
//! - Field-specific terms: `title:hello`; bare terms use the default field
//! - Match everything: `*:*`
//! - Phrases: `"hello world"`, `title:"hello world"`
//! - Required / prohibited clauses: `+required -forbidden`, `NOT forbidden`
//! - Operators: `a AND b`, `a OR b`
//! - Juxtaposed clauses without a prefix are optional, as in Lucene: `+a b`
//!   requires `a` and only lets `b` match. Both sides of an `AND` are required.
//! - Grouping: `(a OR b) AND c`, `title:(a OR b)`
//! - Wildcards: `title:te?t*`
//! - Ranges: `year:[2000 TO 2010]`, `name:{a TO *}`
//!
//! Fields declared with [`QueryParser::with_numeric_field`] take integer
//! values and ranges, encoded the same way numeric document fields are
//! indexed.
//!
//! Anything else that cannot be read unambiguously is a parse error.

use std::iter::Peekable;
use std::ops::Bound;
use std::str::Chars;
use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::tokenizer::numeric::NumericWidth;
use crate::error::{PercolatorError, Result};
use crate::query::boolean::{BooleanQuery, BooleanQueryBuilder, Occur};
use crate::query::match_all::MatchAllQuery;
use crate::query::phrase::PhraseQuery;
use crate::query::query::Query;
use crate::query::range::TermRangeQuery;
use crate::query::term::TermQuery;
use crate::query::wildcard::WildcardQuery;
use crate::util::numeric::{int_to_prefix_coded, long_to_prefix_coded};

/// A Lucene-style query parser.
///
/// Without an analyzer, terms are used verbatim and phrases are split on
/// whitespace. With an analyzer, term and phrase text is analyzed per field:
/// a term producing several tokens becomes a phrase. Wildcard and range
/// bounds are never analyzed.
#[derive(Clone, Default)]
pub struct QueryParser {
    default_field: Option<String>,
    analyzer: Option<Arc<dyn Analyzer>>,
    numeric_fields: AHashMap<String, NumericWidth>,
}

impl QueryParser {
    /// Create a new query parser without a default field.
    pub fn new() -> Self {
        QueryParser::default()
    }

    /// Set the default field to search in when no field is specified.
    pub fn with_default_field<S: Into<String>>(mut self, field: S) -> Self {
        self.default_field = Some(field.into());
        self
    }

    /// Analyze term and phrase text with the given analyzer.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Treat `field` as numeric: its values and range bounds must be
    /// integers of the given width.
    pub fn with_numeric_field<S: Into<String>>(mut self, field: S, width: NumericWidth) -> Self {
        self.numeric_fields.insert(field.into(), width);
        self
    }

    /// Width of a numeric field, if the field was declared numeric.
    pub fn numeric_field(&self, field: &str) -> Option<NumericWidth> {
        self.numeric_fields.get(field).copied()
    }

    /// Get the default field.
    pub fn default_field(&self) -> Option<&str> {
        self.default_field.as_deref()
    }

    /// Parse a query string into a query tree.
    ///
    /// An empty string yields an empty boolean query, which matches nothing.
    pub fn parse(&self, query_str: &str) -> Result<Box<dyn Query>> {
        let trimmed = query_str.trim();
        if trimmed.is_empty() {
            return Ok(Box::new(BooleanQuery::new()));
        }

        let mut parser = QueryStringParser::new(trimmed, self);
        let query = parser.parse_or(self.default_field.as_deref())?;
        parser.skip_whitespace();
        match parser.chars.peek().copied() {
            None => Ok(query),
            Some(')') => Err(PercolatorError::parse("unbalanced ')'")),
            Some(c) => Err(PercolatorError::parse(format!("unexpected character '{c}'"))),
        }
    }
}

impl std::fmt::Debug for QueryParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryParser")
            .field("default_field", &self.default_field)
            .field("analyzer", &self.analyzer.as_ref().map(|a| a.name()))
            .field("numeric_fields", &self.numeric_fields)
            .finish()
    }
}

/// Internal recursive-descent parser over the query characters.
struct QueryStringParser<'a> {
    chars: Peekable<Chars<'a>>,
    config: &'a QueryParser,
}

impl<'a> QueryStringParser<'a> {
    fn new(query_str: &'a str, config: &'a QueryParser) -> Self {
        QueryStringParser {
            chars: query_str.chars().peekable(),
            config,
        }
    }

    fn parse_or(&mut self, field: Option<&str>) -> Result<Box<dyn Query>> {
        let mut alternatives = vec![self.parse_and(field)?];

        while self.peek_keyword("OR") {
            self.consume_keyword("OR");
            alternatives.push(self.parse_and(field)?);
        }

        if alternatives.len() == 1 {
            return Ok(alternatives.remove(0));
        }
        let builder = alternatives
            .into_iter()
            .fold(BooleanQueryBuilder::new(), |b, q| b.should(q));
        Ok(Box::new(builder.build()))
    }

    fn parse_and(&mut self, field: Option<&str>) -> Result<Box<dyn Query>> {
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        let mut pending_and = false;

        loop {
            self.skip_whitespace();
            match self.chars.peek().copied() {
                None | Some(')') => break,
                _ => {}
            }
            if self.peek_keyword("OR") {
                break;
            }
            if self.peek_keyword("AND") {
                let Some(last) = clauses.last_mut().filter(|_| !pending_and) else {
                    return Err(PercolatorError::parse("AND without left operand"));
                };
                if last.0 == Occur::Should {
                    last.0 = Occur::Must;
                }
                self.consume_keyword("AND");
                pending_and = true;
                continue;
            }
            let (mut occur, query) = self.parse_clause(field)?;
            if pending_and && occur == Occur::Should {
                occur = Occur::Must;
            }
            clauses.push((occur, query));
            pending_and = false;
        }

        if pending_and {
            return Err(PercolatorError::parse("AND without right operand"));
        }
        if clauses.is_empty() {
            return Err(PercolatorError::parse("expected a query clause"));
        }
        if clauses.len() == 1 && clauses[0].0 != Occur::MustNot {
            return Ok(clauses.remove(0).1);
        }

        let builder = clauses
            .into_iter()
            .fold(BooleanQueryBuilder::new(), |b, (occur, q)| b.clause(q, occur));
        Ok(Box::new(builder.build()))
    }

    fn parse_clause(&mut self, field: Option<&str>) -> Result<(Occur, Box<dyn Query>)> {
        let occur = match self.chars.peek().copied() {
            Some('+') => {
                self.chars.next();
                Occur::Must
            }
            Some('-') => {
                self.chars.next();
                Occur::MustNot
            }
            _ if self.peek_keyword("NOT") => {
                self.consume_keyword("NOT");
                Occur::MustNot
            }
            _ => Occur::Should,
        };

        match self.chars.peek().copied() {
            None => Err(PercolatorError::parse("operator without operand")),
            Some(c) if c.is_whitespace() || c == ')' => {
                Err(PercolatorError::parse("operator without operand"))
            }
            _ => Ok((occur, self.parse_primary(field)?)),
        }
    }

    fn parse_primary(&mut self, field: Option<&str>) -> Result<Box<dyn Query>> {
        match self.chars.peek().copied() {
            Some('(') => return self.parse_group(field),
            Some('"') => {
                let field = self.require_field(field)?;
                return self.parse_phrase(&field);
            }
            _ => {}
        }

        let word = self.read_word(true);
        if self.chars.peek() == Some(&':') {
            self.chars.next();
            let field_name = unescape(&word);
            if field_name.is_empty() {
                return Err(PercolatorError::parse("empty field name"));
            }
            return self.parse_field_value(&field_name);
        }

        if word.is_empty() {
            return Err(PercolatorError::parse(format!(
                "unexpected character '{}'",
                self.chars.peek().copied().unwrap_or(' ')
            )));
        }
        let field = self.require_field(field)?;
        self.term_or_wildcard(&field, &word)
    }

    fn parse_field_value(&mut self, field: &str) -> Result<Box<dyn Query>> {
        match self.chars.peek().copied() {
            Some('(') => self.parse_group(Some(field)),
            Some('"') => self.parse_phrase(field),
            Some('[') | Some('{') => self.parse_range(field),
            _ => {
                let value = self.read_word(false);
                if value.is_empty() {
                    return Err(PercolatorError::parse(format!(
                        "missing value for field '{field}'"
                    )));
                }
                if field == "*" && value == "*" {
                    return Ok(Box::new(MatchAllQuery::new()));
                }
                self.term_or_wildcard(field, &value)
            }
        }
    }

    fn parse_group(&mut self, field: Option<&str>) -> Result<Box<dyn Query>> {
        self.chars.next();
        self.skip_whitespace();
        if self.chars.peek() == Some(&')') {
            return Err(PercolatorError::parse("empty group"));
        }
        let inner = self.parse_or(field)?;
        self.skip_whitespace();
        if self.chars.next() != Some(')') {
            return Err(PercolatorError::parse("unbalanced '('"));
        }
        Ok(inner)
    }

    fn parse_phrase(&mut self, field: &str) -> Result<Box<dyn Query>> {
        self.chars.next();

        let mut phrase = String::new();
        loop {
            match self.chars.next() {
                Some('"') => break,
                Some('\\') => {
                    if let Some(escaped) = self.chars.next() {
                        phrase.push(escaped);
                    }
                }
                Some(c) => phrase.push(c),
                None => return Err(PercolatorError::parse("unterminated phrase")),
            }
        }

        let terms = self.analyze(field, &phrase)?;
        Ok(match terms.len() {
            0 => Box::new(BooleanQuery::new()),
            1 => Box::new(TermQuery::from_bytes(field, terms.into_iter().next().unwrap_or_default())),
            _ => Box::new(PhraseQuery::from_bytes(field, terms)),
        })
    }

    fn parse_range(&mut self, field: &str) -> Result<Box<dyn Query>> {
        let inclusive_lower = self.chars.next() == Some('[');
        self.skip_whitespace();
        let lower = self.read_range_bound();
        self.skip_whitespace();
        if !self.peek_keyword("TO") {
            return Err(PercolatorError::parse(format!(
                "expected TO in range on field '{field}'"
            )));
        }
        self.consume_keyword("TO");
        let upper = self.read_range_bound();
        self.skip_whitespace();
        let inclusive_upper = match self.chars.next() {
            Some(']') => true,
            Some('}') => false,
            _ => {
                return Err(PercolatorError::parse(format!(
                    "unterminated range on field '{field}'"
                )));
            }
        };
        if lower.is_empty() || upper.is_empty() {
            return Err(PercolatorError::parse(format!(
                "missing range bound on field '{field}'"
            )));
        }

        if let Some(width) = self.config.numeric_field(field) {
            return numeric_range(field, width, &lower, inclusive_lower, &upper, inclusive_upper);
        }

        let bound = |value: String, inclusive: bool| {
            if value == "*" {
                Bound::Unbounded
            } else if inclusive {
                Bound::Included(unescape(&value).into_bytes())
            } else {
                Bound::Excluded(unescape(&value).into_bytes())
            }
        };
        let query = TermRangeQuery::new(
            field,
            bound(lower, inclusive_lower),
            bound(upper, inclusive_upper),
        );
        query.validate()?;
        Ok(Box::new(query))
    }

    fn read_range_bound(&mut self) -> String {
        let mut bound = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || c == ']' || c == '}' {
                break;
            }
            bound.push(c);
            self.chars.next();
        }
        bound
    }

    fn term_or_wildcard(&self, field: &str, raw: &str) -> Result<Box<dyn Query>> {
        if let Some(width) = self.config.numeric_field(field) {
            let value = parse_numeric(field, width, &unescape(raw))?;
            return Ok(Box::new(TermQuery::from_bytes(field, numeric_term(width, value))));
        }
        if has_unescaped_wildcard(raw) {
            return Ok(Box::new(WildcardQuery::new(field, raw)?));
        }

        let text = unescape(raw);
        if self.config.analyzer.is_none() {
            return Ok(Box::new(TermQuery::new(field, text)));
        }
        let terms = self.analyze(field, &text)?;
        Ok(match terms.len() {
            0 => Box::new(BooleanQuery::new()),
            1 => Box::new(TermQuery::from_bytes(field, terms.into_iter().next().unwrap_or_default())),
            _ => Box::new(PhraseQuery::from_bytes(field, terms)),
        })
    }

    fn analyze(&self, field: &str, text: &str) -> Result<Vec<Vec<u8>>> {
        match &self.config.analyzer {
            Some(analyzer) => Ok(analyzer
                .analyze_field(field, text)?
                .map(|token| token.term)
                .collect()),
            None => Ok(text
                .split_whitespace()
                .map(|t| t.as_bytes().to_vec())
                .collect()),
        }
    }

    fn require_field(&self, field: Option<&str>) -> Result<String> {
        field.map(str::to_string).ok_or_else(|| {
            PercolatorError::parse("No default field specified and no field prefix found")
        })
    }

    /// Read a raw word, keeping escapes. With `stop_at_colon` the word ends
    /// at the first unescaped ':' (field name position).
    fn read_word(&mut self, stop_at_colon: bool) -> String {
        let mut word = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || c == ')' || c == '(' || c == '"' || (stop_at_colon && c == ':')
            {
                break;
            }
            self.chars.next();
            word.push(c);
            if c == '\\' {
                if let Some(escaped) = self.chars.next() {
                    word.push(escaped);
                }
            }
        }
        word
    }

    fn peek_keyword(&mut self, keyword: &str) -> bool {
        self.skip_whitespace();
        let mut lookahead = self.chars.clone();
        for expected in keyword.chars() {
            if lookahead.next() != Some(expected) {
                return false;
            }
        }
        match lookahead.peek() {
            None => true,
            Some(c) => c.is_whitespace() || *c == '(' || *c == '"',
        }
    }

    fn consume_keyword(&mut self, keyword: &str) {
        for _ in keyword.chars() {
            self.chars.next();
        }
        self.skip_whitespace();
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }
}

fn parse_numeric(field: &str, width: NumericWidth, text: &str) -> Result<i64> {
    let parsed = match width {
        NumericWidth::Int => text.parse::<i32>().map(i64::from),
        NumericWidth::Long => text.parse::<i64>(),
    };
    parsed.map_err(|e| {
        PercolatorError::parse(format!(
            "invalid value '{text}' for numeric field '{field}': {e}"
        ))
    })
}

/// Full-precision term for a value already checked against `width`.
fn numeric_term(width: NumericWidth, value: i64) -> Vec<u8> {
    match width {
        NumericWidth::Int => int_to_prefix_coded(value as i32, 0),
        NumericWidth::Long => long_to_prefix_coded(value, 0),
    }
}

fn numeric_range(
    field: &str,
    width: NumericWidth,
    lower: &str,
    inclusive_lower: bool,
    upper: &str,
    inclusive_upper: bool,
) -> Result<Box<dyn Query>> {
    let bound = |text: &str| match text {
        "*" => Ok(None),
        _ => parse_numeric(field, width, &unescape(text)).map(Some),
    };
    let (lower, upper) = (bound(lower)?, bound(upper)?);
    if let (Some(l), Some(u)) = (lower, upper) {
        if l > u {
            return Err(PercolatorError::parse(format!(
                "inverted range on field '{field}'"
            )));
        }
    }

    // Exclusive bounds become inclusive ones a step inward. Stepping past the
    // end of the value range leaves nothing to match.
    let (min, max) = match width {
        NumericWidth::Int => (i64::from(i32::MIN), i64::from(i32::MAX)),
        NumericWidth::Long => (i64::MIN, i64::MAX),
    };
    let lower = match lower {
        Some(l) if !inclusive_lower => match l.checked_add(1).filter(|l| *l <= max) {
            Some(l) => Some(l),
            None => return Ok(Box::new(BooleanQuery::new())),
        },
        other => other,
    };
    let upper = match upper {
        Some(u) if !inclusive_upper => match u.checked_sub(1).filter(|u| *u >= min) {
            Some(u) => Some(u),
            None => return Ok(Box::new(BooleanQuery::new())),
        },
        other => other,
    };
    if let (Some(l), Some(u)) = (lower, upper) {
        if l > u {
            return Ok(Box::new(BooleanQuery::new()));
        }
    }

    Ok(Box::new(match width {
        NumericWidth::Int => {
            TermRangeQuery::int_range(field, lower.map(|v| v as i32), upper.map(|v| v as i32))
        }
        NumericWidth::Long => TermRangeQuery::long_range(field, lower, upper),
    }))
}

fn has_unescaped_wildcard(raw: &str) -> bool {
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '*' | '?' => return true,
            _ => {}
        }
    }
    false
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
