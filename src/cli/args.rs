//! Command line argument parsing for the Percolator CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::presearcher::PresearcherKind;

/// Percolator - match documents against a large set of stored queries
#[derive(Parser, Debug, Clone)]
#[command(name = "percolator")]
#[command(about = "Match a stream of documents against a large set of stored queries")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct PercolatorArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PercolatorArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Match documents against registered queries
    Match(MatchArgs),

    /// Parse and index queries without matching, reporting failures
    Check(CheckArgs),
}

/// Query loading options shared by the commands.
#[derive(Parser, Debug, Clone)]
pub struct QueryArgs {
    /// Queries file (JSONL: {"id", "query", "metadata"})
    #[arg(long, value_name = "QUERIES_FILE")]
    pub queries: PathBuf,

    /// Monitor configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Candidate selection strategy (overrides the configuration file)
    #[arg(long)]
    pub presearcher: Option<PresearcherArg>,

    /// Field used by query terms without a field prefix
    #[arg(long, default_value = "text")]
    pub default_field: String,

    /// Analyzer for query terms and document text
    #[arg(long, default_value = "standard")]
    pub analyzer: AnalyzerArg,

    /// Field holding integers; query values and range bounds on it are
    /// encoded like integer document values (repeatable)
    #[arg(long = "numeric-field", value_name = "FIELD")]
    pub numeric_fields: Vec<String>,
}

/// Arguments for matching
#[derive(Parser, Debug, Clone)]
pub struct MatchArgs {
    #[command(flatten)]
    pub query_args: QueryArgs,

    /// Documents file (JSONL: {"id", "fields": {name: value | [values]}})
    #[arg(long, value_name = "DOCUMENTS_FILE")]
    pub documents: PathBuf,

    /// Report term hits for every match
    #[arg(long)]
    pub highlight: bool,
}

/// Arguments for checking a queries file
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub query_args: QueryArgs,
}

/// Presearcher choice on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresearcherArg {
    /// Select candidates by extracted terms
    TermFiltered,
    /// Verify every query against every document
    MatchAll,
}

impl From<PresearcherArg> for PresearcherKind {
    fn from(arg: PresearcherArg) -> Self {
        match arg {
            PresearcherArg::TermFiltered => PresearcherKind::TermFiltered,
            PresearcherArg::MatchAll => PresearcherKind::MatchAll,
        }
    }
}

/// Analyzer choice on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerArg {
    /// Word tokens, lowercased
    Standard,
    /// Whitespace-separated tokens, unchanged
    Whitespace,
    /// The whole value as one token
    Keyword,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_match_command() {
        let args = PercolatorArgs::parse_from([
            "percolator",
            "--format",
            "json",
            "match",
            "--queries",
            "q.jsonl",
            "--documents",
            "d.jsonl",
            "--presearcher",
            "match-all",
            "--highlight",
            "--numeric-field",
            "year",
            "--numeric-field",
            "price",
        ]);

        assert_eq!(args.output_format, OutputFormat::Json);
        let Command::Match(match_args) = args.command else {
            panic!("expected match command");
        };
        assert_eq!(match_args.query_args.presearcher, Some(PresearcherArg::MatchAll));
        assert_eq!(match_args.query_args.default_field, "text");
        assert_eq!(match_args.query_args.analyzer, AnalyzerArg::Standard);
        assert_eq!(match_args.query_args.numeric_fields, vec!["year", "price"]);
        assert!(match_args.highlight);
    }

    #[test]
    fn test_verbosity() {
        let args = PercolatorArgs::parse_from(["percolator", "-vv", "check", "--queries", "q"]);
        assert_eq!(args.verbosity(), 2);

        let args = PercolatorArgs::parse_from(["percolator", "-q", "-v", "check", "--queries", "q"]);
        assert_eq!(args.verbosity(), 0);
    }
}
