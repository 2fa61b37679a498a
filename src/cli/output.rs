//! Output formatting for CLI commands.

use serde::Serialize;

use crate::cli::args::{OutputFormat, PercolatorArgs};
use crate::error::Result;
use crate::matcher::{HighlightsMatch, MatchRecord, QueryMatch};
use crate::monitor::{Matches, MonitorStats, UpdateReport};

/// Registration outcome, as printed by the commands.
#[derive(Debug, Serialize)]
pub struct LoadSummary {
    pub queries_loaded: usize,
    pub queries_failed: Vec<FailedQuery>,
    pub stats: MonitorStats,
}

/// One rejected query.
#[derive(Debug, Serialize)]
pub struct FailedQuery {
    pub id: String,
    pub error: String,
}

impl LoadSummary {
    /// Summarize an update report.
    pub fn new(report: &UpdateReport, stats: MonitorStats) -> Self {
        LoadSummary {
            queries_loaded: report.updated.len(),
            queries_failed: report
                .failures
                .iter()
                .map(|f| FailedQuery {
                    id: f.id.clone(),
                    error: f.error.to_string(),
                })
                .collect(),
            stats,
        }
    }
}

/// Full result of the match command.
#[derive(Debug, Serialize)]
pub struct MatchOutput<'a, T> {
    pub load: &'a LoadSummary,
    pub matches: &'a Matches<T>,
}

/// How a match is rendered in human output.
pub trait HumanMatch: MatchRecord {
    /// Extra text printed after the query id.
    fn detail(&self) -> String {
        String::new()
    }
}

impl HumanMatch for QueryMatch {}

impl HumanMatch for HighlightsMatch {
    fn detail(&self) -> String {
        let fields: Vec<String> = self
            .hits
            .iter()
            .map(|(field, hits)| {
                let terms: Vec<String> = hits
                    .iter()
                    .map(|h| format!("{}@{}..{}", h.term, h.start_offset, h.end_offset))
                    .collect();
                format!("{field}[{}]", terms.join(", "))
            })
            .collect();
        if fields.is_empty() {
            String::new()
        } else {
            format!(" {}", fields.join(" "))
        }
    }
}

/// Print the outcome of loading queries.
pub fn output_load_summary(summary: &LoadSummary, args: &PercolatorArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => output_json(summary, args),
        OutputFormat::Human => {
            print_load_summary_human(summary, args);
            Ok(())
        }
    }
}

/// Print the outcome of the match command.
pub fn output_matches<T: HumanMatch>(
    summary: &LoadSummary,
    matches: &Matches<T>,
    args: &PercolatorArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => output_json(
            &MatchOutput {
                load: summary,
                matches,
            },
            args,
        ),
        OutputFormat::Human => {
            print_load_summary_human(summary, args);
            for (doc_id, doc_matches) in matches.iter() {
                println!("{doc_id}: {} match(es)", doc_matches.len());
                for m in doc_matches {
                    println!("  {}{}", m.query_id(), m.detail());
                }
            }
            for error in matches.errors() {
                eprintln!(
                    "error: query '{}' on document '{}': {}",
                    error.query_id, error.doc_id, error.error
                );
            }
            if args.verbosity() > 0 {
                println!();
                println!(
                    "{} documents, {} queries registered, {} run, {} matched",
                    matches.batch_size(),
                    matches.queries_registered(),
                    matches.queries_run(),
                    matches.matched_count()
                );
                println!(
                    "analysis {:.3}ms, search {:.3}ms",
                    matches.query_build_time().as_secs_f64() * 1000.0,
                    matches.search_time().as_secs_f64() * 1000.0
                );
            }
            Ok(())
        }
    }
}

fn print_load_summary_human(summary: &LoadSummary, args: &PercolatorArgs) {
    for failed in &summary.queries_failed {
        eprintln!("rejected query '{}': {}", failed.id, failed.error);
    }
    if args.verbosity() > 0 {
        println!(
            "Loaded {} queries ({} rejected) into {} presearcher, {} indexed terms",
            summary.queries_loaded,
            summary.queries_failed.len(),
            summary.stats.presearcher,
            summary.stats.indexed_terms
        );
    }
}

fn output_json<T: Serialize>(result: &T, args: &PercolatorArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
