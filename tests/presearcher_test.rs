//! Behaviour shared by every presearcher.

use std::sync::Arc;

use percolator::analysis::analyzer::{Analyzer, KeywordAnalyzer, WhitespaceAnalyzer};
use percolator::document::analyzed::AnalyzedDocument;
use percolator::document::{DocumentBatch, InputDocument};
use percolator::error::Result;
use percolator::matcher::SimpleMatcherFactory;
use percolator::monitor::{Metadata, Monitor, MonitorQuery};
use percolator::presearcher::{MatchAllPresearcher, Presearcher, TermFilteredPresearcher};
use percolator::query::{Query, QueryParser, TermQuery};
use percolator::util::numeric::int_to_prefix_coded;

const TEXTFIELD: &str = "text";

fn whitespace() -> Arc<dyn Analyzer> {
    Arc::new(WhitespaceAnalyzer::new())
}

fn build_doc(id: &str, field: &str, text: &str) -> DocumentBatch {
    DocumentBatch::of(whitespace(), InputDocument::builder(id).add_text(field, text).build())
}

fn monitor(presearcher: Arc<dyn Presearcher>) -> Monitor {
    Monitor::new(QueryParser::new().with_default_field(TEXTFIELD), presearcher)
}

/// A query kind no extractor knows, without a field, matching everything.
#[derive(Debug, Clone)]
struct OpaqueQuery;

impl Query for OpaqueQuery {
    fn kind(&self) -> &'static str {
        "opaque"
    }

    fn matches(&self, _doc: &AnalyzedDocument) -> Result<bool> {
        Ok(true)
    }

    fn description(&self) -> String {
        "OpaqueQuery".to_string()
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

macro_rules! presearcher_tests {
    ($name:ident, $presearcher:expr) => {
        mod $name {
            use super::*;

            fn presearcher() -> Arc<dyn Presearcher> {
                Arc::new($presearcher)
            }

            #[test]
            fn test_null_field_handling() -> Result<()> {
                let monitor = monitor(presearcher());
                monitor.update(MonitorQuery::new("1", "field_1:test"))?;

                let matches = monitor.match_batch(&build_doc("doc1", "field_2", "test"), &SimpleMatcherFactory)?;
                assert_eq!(matches.matched_count(), 0);
                Ok(())
            }

            #[test]
            fn test_empty_monitor_handling() -> Result<()> {
                let monitor = monitor(presearcher());
                monitor.update(MonitorQuery::new("1", "test"))?;
                monitor.clear()?;

                let matches = monitor.match_batch(&build_doc("doc1", "field_2", "test"), &SimpleMatcherFactory)?;
                assert_eq!(matches.matched_count(), 0);
                assert_eq!(matches.queries_run(), 0);
                Ok(())
            }

            #[test]
            fn test_match_all_query_handling() -> Result<()> {
                let monitor = monitor(presearcher());
                monitor.update(MonitorQuery::new("1", "*:*"))?;

                let matches = monitor.match_batch(&build_doc("doc1", "f", "wibble"), &SimpleMatcherFactory)?;
                assert_eq!(matches.matched_count(), 1);
                Ok(())
            }

            #[test]
            fn test_negative_query_handling() -> Result<()> {
                let monitor = monitor(presearcher());
                monitor.update(MonitorQuery::new("1", "*:* -f:foo"))?;

                let matches = monitor.match_batch(&build_doc("doc1", "f", "bar"), &SimpleMatcherFactory)?;
                assert_eq!(matches.matched_count(), 1);

                let matches = monitor.match_batch(&build_doc("doc2", "f", "foo"), &SimpleMatcherFactory)?;
                assert_eq!(matches.matched_count(), 0);
                Ok(())
            }

            #[test]
            fn test_field_isolation() -> Result<()> {
                let monitor = monitor(presearcher());
                monitor.update(MonitorQuery::new("1", "a:value"))?;

                let matches = monitor.match_batch(&build_doc("doc1", "b", "value"), &SimpleMatcherFactory)?;
                assert_eq!(matches.matched_count(), 0);

                let matches = monitor.match_batch(&build_doc("doc2", "a", "value"), &SimpleMatcherFactory)?;
                assert!(matches.contains("doc2", "1"));
                Ok(())
            }

            #[test]
            fn test_any_token_handling() -> Result<()> {
                let parser = |_: &str, _: &Metadata| -> Result<Box<dyn Query>> { Ok(Box::new(OpaqueQuery)) };
                let monitor = Monitor::new(parser, presearcher());
                monitor.update(MonitorQuery::new("1", "testquery"))?;

                let matches = monitor.match_batch(&build_doc("1", "f", "wibble"), &SimpleMatcherFactory)?;
                assert_eq!(matches.matched_count(), 1);
                assert_eq!(matches.queries_run(), 1);
                Ok(())
            }

            #[test]
            fn test_non_string_term_handling() -> Result<()> {
                let term = vec![60u8, 8, 0, 0, 0, 9, 0xff];
                let query_term = term.clone();
                let parser = move |_: &str, _: &Metadata| -> Result<Box<dyn Query>> {
                    Ok(Box::new(TermQuery::from_bytes("f", query_term.clone())))
                };
                let monitor = Monitor::new(parser, presearcher());
                monitor.update(MonitorQuery::new("1", "testquery"))?;

                let doc = InputDocument::builder("1").add_binary("f", term).build();
                let matches = monitor.match_document(doc, whitespace(), &SimpleMatcherFactory)?;
                assert_eq!(matches.matched_count(), 1);
                assert_eq!(matches.queries_run(), 1);

                let matches = monitor.match_batch(&build_doc("2", "f", "wibble"), &SimpleMatcherFactory)?;
                assert_eq!(matches.matched_count(), 0);
                Ok(())
            }

            #[test]
            fn test_filters_on_numeric_term_queries() -> Result<()> {
                let parser = |text: &str, _: &Metadata| -> Result<Box<dyn Query>> {
                    let value: i32 = text
                        .parse()
                        .map_err(|e| percolator::error::PercolatorError::parse(format!("{e}")))?;
                    Ok(Box::new(TermQuery::from_bytes(TEXTFIELD, int_to_prefix_coded(value, 0))))
                };
                let monitor = Monitor::new(parser, presearcher());

                for i in 8..=15 {
                    monitor.update(MonitorQuery::new(format!("query{i}"), i.to_string()))?;
                }

                let keyword: Arc<dyn Analyzer> = Arc::new(KeywordAnalyzer::new());
                for i in 8..=15 {
                    let doc = InputDocument::builder(format!("doc{i}")).add_int(TEXTFIELD, i).build();
                    let matches = monitor.match_document(doc, keyword.clone(), &SimpleMatcherFactory)?;

                    let doc_id = format!("doc{i}");
                    assert_eq!(matches.matched_count(), 1);
                    assert_eq!(matches.matched_ids(&doc_id), vec![format!("query{i}").as_str()]);
                }
                Ok(())
            }

            #[test]
            fn test_phrase_and_wildcard_are_verified() -> Result<()> {
                let monitor = monitor(presearcher());
                monitor.update(MonitorQuery::new("phrase", "\"quick brown\""))?;
                monitor.update(MonitorQuery::new("wild", "text:qu*"))?;

                let matches = monitor.match_batch(&build_doc("doc1", TEXTFIELD, "brown quick"), &SimpleMatcherFactory)?;
                assert_eq!(matches.matched_ids("doc1"), vec!["wild"]);

                let matches = monitor.match_batch(&build_doc("doc2", TEXTFIELD, "the quick brown fox"), &SimpleMatcherFactory)?;
                assert_eq!(matches.matched_ids("doc2"), vec!["phrase", "wild"]);
                Ok(())
            }
        }
    };
}

presearcher_tests!(match_all, MatchAllPresearcher::new());
presearcher_tests!(term_filtered, TermFilteredPresearcher::new());

#[test]
fn test_term_filtering_skips_unrelated_queries() -> Result<()> {
    let monitor = monitor(Arc::new(TermFilteredPresearcher::new()));
    monitor.update_all((0..100).map(|i| MonitorQuery::new(format!("q{i}"), format!("term{i}"))))?;

    let matches = monitor.match_batch(&build_doc("doc", TEXTFIELD, "term7 other"), &SimpleMatcherFactory)?;
    assert_eq!(matches.queries_registered(), 100);
    assert_eq!(matches.queries_run(), 1);
    assert_eq!(matches.matched_ids("doc"), vec!["q7"]);
    Ok(())
}

#[test]
fn test_match_all_runs_every_query() -> Result<()> {
    let monitor = monitor(Arc::new(MatchAllPresearcher::new()));
    monitor.update_all((0..10).map(|i| MonitorQuery::new(format!("q{i}"), format!("term{i}"))))?;

    let matches = monitor.match_batch(&build_doc("doc", TEXTFIELD, "term7"), &SimpleMatcherFactory)?;
    assert_eq!(matches.queries_run(), 10);
    assert_eq!(matches.matched_count(), 1);
    Ok(())
}
