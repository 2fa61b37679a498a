//! # Percolator
//!
//! Reverse search for Rust: register many queries, then find out which of
//! them match each incoming document.
//!
//! ## Features
//!
//! - Term extraction turning query trees into conservative required-term conditions
//! - Term-filtered candidate selection, with a match-all baseline
//! - Exact verification of candidates only
//! - Lock-free reads through immutable store snapshots
//! - Parallel matching of document batches
//! - Pluggable query parsers, term extractors and matchers

pub mod analysis;
pub mod cli;
pub mod document;
pub mod error;
pub mod extraction;
pub mod matcher;
pub mod monitor;
pub mod presearcher;
pub mod query;
pub mod util;

pub mod prelude {
    pub use crate::analysis::analyzer::{Analyzer, StandardAnalyzer, WhitespaceAnalyzer};
    pub use crate::document::{DocumentBatch, InputDocument};
    pub use crate::error::{PercolatorError, Result};
    pub use crate::matcher::{HighlightingMatcherFactory, SimpleMatcherFactory};
    pub use crate::monitor::{Monitor, MonitorConfig, MonitorQuery};
    pub use crate::presearcher::PresearcherKind;
    pub use crate::query::QueryParser;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
