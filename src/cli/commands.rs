//! Command implementations for the Percolator CLI.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use log::info;
use serde_json::Value;

use crate::analysis::analyzer::{Analyzer, KeywordAnalyzer, StandardAnalyzer, WhitespaceAnalyzer};
use crate::analysis::tokenizer::numeric::NumericWidth;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::document::batch::DocumentBatch;
use crate::document::document::{DocumentBuilder, InputDocument};
use crate::error::{PercolatorError, Result};
use crate::matcher::{HighlightingMatcherFactory, SimpleMatcherFactory};
use crate::monitor::{Monitor, MonitorConfig, MonitorQuery};
use crate::query::parser::QueryParser;

/// Execute a CLI command.
pub fn execute_command(args: PercolatorArgs) -> Result<()> {
    match &args.command {
        Command::Match(match_args) => run_match(match_args, &args),
        Command::Check(check_args) => run_check(check_args, &args),
    }
}

/// Match documents against the queries file.
fn run_match(args: &MatchArgs, cli_args: &PercolatorArgs) -> Result<()> {
    let analyzer = build_analyzer(args.query_args.analyzer)?;
    let (monitor, summary) = load_monitor(&args.query_args, analyzer.clone())?;

    let documents = load_documents(&args.documents)?;
    info!("loaded {} documents from {}", documents.len(), args.documents.display());
    let batch = DocumentBatch::from_documents(analyzer, documents)?;

    if args.highlight {
        let matches = monitor.match_batch(&batch, &HighlightingMatcherFactory)?;
        output_matches(&summary, &matches, cli_args)
    } else {
        let matches = monitor.match_batch(&batch, &SimpleMatcherFactory)?;
        output_matches(&summary, &matches, cli_args)
    }
}

/// Register the queries file and report what was rejected.
fn run_check(args: &CheckArgs, cli_args: &PercolatorArgs) -> Result<()> {
    let analyzer = build_analyzer(args.query_args.analyzer)?;
    let (_, summary) = load_monitor(&args.query_args, analyzer)?;
    output_load_summary(&summary, cli_args)?;

    if summary.queries_failed.is_empty() {
        Ok(())
    } else {
        Err(PercolatorError::parse(format!(
            "{} queries rejected",
            summary.queries_failed.len()
        )))
    }
}

/// Build a monitor holding the queries file.
pub fn load_monitor(args: &QueryArgs, analyzer: Arc<dyn Analyzer>) -> Result<(Monitor, LoadSummary)> {
    let mut config = match &args.config {
        Some(path) => MonitorConfig::from_json(&fs::read_to_string(path)?)?,
        None => MonitorConfig::default(),
    };
    if let Some(presearcher) = args.presearcher {
        config.presearcher = presearcher.into();
    }

    // Integer document values are indexed as longs.
    let parser = args.numeric_fields.iter().fold(
        QueryParser::new()
            .with_default_field(args.default_field.clone())
            .with_analyzer(analyzer),
        |parser, field| parser.with_numeric_field(field.clone(), NumericWidth::Long),
    );
    let monitor = Monitor::with_config(parser, config);

    let queries = load_queries(&args.queries)?;
    info!("loaded {} queries from {}", queries.len(), args.queries.display());
    let report = monitor.update_all(queries)?;
    let summary = LoadSummary::new(&report, monitor.stats()?);
    Ok((monitor, summary))
}

/// Create the analyzer selected on the command line.
pub fn build_analyzer(arg: AnalyzerArg) -> Result<Arc<dyn Analyzer>> {
    Ok(match arg {
        AnalyzerArg::Standard => Arc::new(StandardAnalyzer::new()?),
        AnalyzerArg::Whitespace => Arc::new(WhitespaceAnalyzer::new()),
        AnalyzerArg::Keyword => Arc::new(KeywordAnalyzer::new()),
    })
}

/// Read queries from a JSONL file. Blank lines are skipped.
pub fn load_queries(path: &Path) -> Result<Vec<MonitorQuery>> {
    read_jsonl(path, |value| Ok(serde_json::from_value(value)?))
}

/// Read documents from a JSONL file. Blank lines are skipped.
pub fn load_documents(path: &Path) -> Result<Vec<InputDocument>> {
    read_jsonl(path, |value| document_from_json(&value))
}

fn read_jsonl<T, F>(path: &Path, mut convert: F) -> Result<Vec<T>>
where
    F: FnMut(Value) -> Result<T>,
{
    let reader = BufReader::new(File::open(path)?);
    let mut items = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str::<Value>(&line)
            .map_err(PercolatorError::from)
            .and_then(&mut convert)
            .map_err(|e| {
                PercolatorError::invalid_argument(format!(
                    "{}:{}: {e}",
                    path.display(),
                    line_num + 1
                ))
            })?;
        items.push(item);
    }
    Ok(items)
}

/// Convert a JSON object `{"id": ..., "fields": {...}}` into a document.
///
/// Strings become text values, integers long values, other scalars their
/// JSON text. Arrays add one value per element.
pub fn document_from_json(value: &Value) -> Result<InputDocument> {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| PercolatorError::invalid_argument("document needs a string \"id\""))?;
    let fields = value
        .get("fields")
        .and_then(Value::as_object)
        .ok_or_else(|| PercolatorError::invalid_argument("document needs a \"fields\" object"))?;

    let mut builder = InputDocument::builder(id);
    for (name, field_value) in fields {
        builder = match field_value {
            Value::Array(values) => values
                .iter()
                .try_fold(builder, |b, v| add_json_value(b, name, v))?,
            v => add_json_value(builder, name, v)?,
        };
    }
    Ok(builder.build())
}

fn add_json_value(builder: DocumentBuilder, name: &str, value: &Value) -> Result<DocumentBuilder> {
    Ok(match value {
        Value::String(text) => builder.add_text(name, text.as_str()),
        Value::Number(n) => match n.as_i64() {
            Some(v) => builder.add_long(name, v),
            None => builder.add_text(name, n.to_string()),
        },
        Value::Bool(b) => builder.add_text(name, b.to_string()),
        Value::Null => builder,
        Value::Array(_) | Value::Object(_) => {
            return Err(PercolatorError::invalid_argument(format!(
                "unsupported value for field '{name}'"
            )));
        }
    })
}
