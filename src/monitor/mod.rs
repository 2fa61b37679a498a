//! Query registration, storage and the match pipeline.
//!
//! ```text
//! MonitorQuery → parse → extract → QueryStore snapshot (queries + candidate index)
//! DocumentBatch → analyze → candidates → exact verification → Matches
//! ```

pub mod compiled;
pub mod config;
pub mod matches;
#[allow(clippy::module_inception)]
pub mod monitor;
pub mod monitor_query;
pub mod query_parser;
pub mod store;

pub use compiled::CompiledQuery;
pub use config::MonitorConfig;
pub use matches::Matches;
pub use monitor::{FactoryMatch, Monitor, MonitorBuilder, MonitorStats};
pub use monitor_query::{Metadata, MonitorQuery};
pub use query_parser::MonitorQueryParser;
pub use store::{QueryStore, StoreSnapshot, UpdateFailure, UpdateReport};
