//! Parsing of query source text for the monitor.

use crate::error::Result;
use crate::monitor::monitor_query::Metadata;
use crate::query::parser::QueryParser;
use crate::query::query::Query;

/// Turns the source text of a registered query into a query tree.
///
/// Implemented by [`QueryParser`] and by closures, so custom node kinds can
/// be produced from the text and metadata of a registration.
pub trait MonitorQueryParser: Send + Sync {
    /// Parse the source text. Malformed input is a parse error.
    fn parse(&self, text: &str, metadata: &Metadata) -> Result<Box<dyn Query>>;
}

impl MonitorQueryParser for QueryParser {
    fn parse(&self, text: &str, _metadata: &Metadata) -> Result<Box<dyn Query>> {
        QueryParser::parse(self, text)
    }
}

impl<F> MonitorQueryParser for F
where
    F: Fn(&str, &Metadata) -> Result<Box<dyn Query>> + Send + Sync,
{
    fn parse(&self, text: &str, metadata: &Metadata) -> Result<Box<dyn Query>> {
        self(text, metadata)
    }
}
