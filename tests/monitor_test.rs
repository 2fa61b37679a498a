//! Monitor lifecycle: registration, removal, closing and error isolation.

use std::sync::{Arc, Barrier};
use std::thread;

use percolator::analysis::analyzer::{Analyzer, StandardAnalyzer, WhitespaceAnalyzer};
use percolator::document::analyzed::AnalyzedDocument;
use percolator::document::{DocumentBatch, InputDocument};
use percolator::error::{PercolatorError, Result};
use percolator::extraction::{ExtractionResult, ExtractorRegistry, QueryTerm, TermExtractor, UnknownNodePolicy};
use percolator::matcher::{HighlightingMatcherFactory, SimpleMatcherFactory};
use percolator::monitor::{Metadata, Monitor, MonitorConfig, MonitorQuery, QueryStore};
use percolator::presearcher::{PresearcherKind, TermFilteredPresearcher};
use percolator::query::{Query, QueryParser};

fn analyzer() -> Arc<dyn Analyzer> {
    Arc::new(WhitespaceAnalyzer::new())
}

fn parser() -> QueryParser {
    QueryParser::new().with_default_field("text")
}

fn doc(id: &str, text: &str) -> InputDocument {
    InputDocument::builder(id).add_text("text", text).build()
}

/// Query whose evaluation fails when the document contains "boom".
#[derive(Debug, Clone)]
struct FragileQuery;

impl Query for FragileQuery {
    fn kind(&self) -> &'static str {
        "fragile"
    }

    fn matches(&self, doc: &AnalyzedDocument) -> Result<bool> {
        if doc.contains("text", b"boom") {
            return Err(PercolatorError::evaluation("fragile query exploded"));
        }
        Ok(true)
    }

    fn description(&self) -> String {
        "fragile".to_string()
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn field(&self) -> Option<&str> {
        Some("text")
    }
}

fn fragile_parser(text: &str, metadata: &Metadata) -> Result<Box<dyn Query>> {
    if metadata.get("kind").map(String::as_str) == Some("fragile") {
        return Ok(Box::new(FragileQuery));
    }
    parser().parse(text)
}

#[test]
fn test_replace_not_merge() -> Result<()> {
    let monitor = Monitor::with_config(parser(), MonitorConfig::default());
    monitor.update(MonitorQuery::new("1", "foo"))?;
    monitor.update(MonitorQuery::new("1", "bar"))?;

    assert_eq!(monitor.query_count()?, 1);
    assert_eq!(monitor.get_query("1")?.map(|q| q.query().to_string()), Some("bar".to_string()));

    let matches = monitor.match_document(doc("d1", "foo"), analyzer(), &SimpleMatcherFactory)?;
    assert_eq!(matches.matched_count(), 0);
    let matches = monitor.match_document(doc("d2", "bar"), analyzer(), &SimpleMatcherFactory)?;
    assert_eq!(matches.matched_count(), 1);
    Ok(())
}

#[test]
fn test_idempotent_removal() -> Result<()> {
    let monitor = Monitor::with_config(parser(), MonitorConfig::default());
    monitor.update(MonitorQuery::new("1", "foo"))?;
    let before = monitor.stats()?;

    assert!(!monitor.remove("missing")?);
    assert_eq!(monitor.stats()?, before);

    assert!(monitor.remove("1")?);
    assert!(!monitor.remove("1")?);
    assert_eq!(monitor.query_count()?, 0);
    Ok(())
}

#[test]
fn test_remove_all_and_query_ids() -> Result<()> {
    let monitor = Monitor::with_config(parser(), MonitorConfig::default());
    monitor.update_all(["a", "b", "c"].map(|id| MonitorQuery::new(id, id)))?;

    assert_eq!(monitor.query_ids()?, vec!["a", "b", "c"]);
    assert_eq!(monitor.remove_all(["a", "c", "z"])?, 2);
    assert_eq!(monitor.query_ids()?, vec!["b"]);
    Ok(())
}

#[test]
fn test_parse_error_leaves_store_unchanged() -> Result<()> {
    let monitor = Monitor::with_config(parser(), MonitorConfig::default());
    monitor.update(MonitorQuery::new("1", "foo"))?;
    let before = monitor.stats()?;

    let err = monitor.update(MonitorQuery::new("1", "(foo")).unwrap_err();
    assert!(matches!(err, PercolatorError::Parse(_)));
    assert_eq!(monitor.stats()?, before);
    assert_eq!(monitor.get_query("1")?.map(|q| q.query().to_string()), Some("foo".to_string()));
    Ok(())
}

#[test]
fn test_update_all_reports_per_query() -> Result<()> {
    let monitor = Monitor::with_config(parser(), MonitorConfig::default());
    let report = monitor.update_all(vec![
        MonitorQuery::new("good", "foo"),
        MonitorQuery::new("bad", "foo AND"),
        MonitorQuery::new("", "foo"),
    ])?;

    assert_eq!(report.updated, vec!["good"]);
    assert_eq!(report.failures.len(), 2);
    assert!(!report.is_ok());
    assert_eq!(monitor.query_count()?, 1);
    Ok(())
}

#[test]
fn test_closed_monitor() -> Result<()> {
    let monitor = Monitor::with_config(parser(), MonitorConfig::default());
    monitor.update(MonitorQuery::new("1", "foo"))?;
    monitor.close()?;

    assert!(monitor.is_closed());
    assert!(matches!(monitor.update(MonitorQuery::new("2", "bar")), Err(PercolatorError::Closed(_))));
    assert!(matches!(monitor.query_count(), Err(PercolatorError::Closed(_))));
    assert!(matches!(
        monitor.match_document(doc("d", "foo"), analyzer(), &SimpleMatcherFactory),
        Err(PercolatorError::Closed(_))
    ));
    assert!(matches!(monitor.close(), Err(PercolatorError::Closed(_))));
    Ok(())
}

#[test]
fn test_evaluation_error_is_per_candidate() -> Result<()> {
    let monitor = Monitor::with_config(fragile_parser, MonitorConfig::default());
    monitor.update(MonitorQuery::new("fragile", "").with_metadata("kind", "fragile"))?;
    monitor.update(MonitorQuery::new("plain", "boom"))?;

    let batch = DocumentBatch::from_documents(
        analyzer(),
        vec![doc("d1", "boom"), doc("d2", "calm")],
    )?;
    let matches = monitor.match_batch(&batch, &SimpleMatcherFactory)?;

    assert_eq!(matches.matched_ids("d1"), vec!["plain"]);
    assert_eq!(matches.matched_ids("d2"), vec!["fragile"]);
    assert_eq!(matches.errors().len(), 1);
    assert_eq!(matches.errors()[0].query_id, "fragile");
    assert_eq!(matches.errors()[0].doc_id, "d1");
    assert!(matches!(matches.errors()[0].error, PercolatorError::Evaluation(_)));
    Ok(())
}

#[test]
fn test_duplicate_document_ids_rejected() {
    let result = DocumentBatch::from_documents(analyzer(), vec![doc("d", "a"), doc("d", "b")]);
    assert!(matches!(result, Err(PercolatorError::InvalidArgument(_))));
}

#[test]
fn test_counters() -> Result<()> {
    let monitor = Monitor::with_config(parser(), MonitorConfig::default().parallel_match(false));
    monitor.update_all(vec![
        MonitorQuery::new("1", "+foo +bar"),
        MonitorQuery::new("2", "foo"),
        MonitorQuery::new("3", "baz"),
    ])?;

    let batch = DocumentBatch::from_documents(
        analyzer(),
        vec![doc("d1", "foo"), doc("d2", "foo bar"), doc("d3", "nothing")],
    )?;
    let matches = monitor.match_batch(&batch, &SimpleMatcherFactory)?;

    assert_eq!(matches.batch_size(), 3);
    assert_eq!(matches.queries_registered(), 3);
    assert_eq!(matches.queries_run(), 3);
    assert_eq!(matches.matched_count(), 3);
    assert!(matches.matches("d3").is_empty());
    Ok(())
}

#[test]
fn test_highlighting_through_monitor() -> Result<()> {
    let monitor = Monitor::with_config(
        parser().with_analyzer(Arc::new(StandardAnalyzer::new()?)),
        MonitorConfig::default(),
    );
    monitor.update(MonitorQuery::new("1", "\"Quick Fox\" OR lazy"))?;

    let analyzer: Arc<dyn Analyzer> = Arc::new(StandardAnalyzer::new()?);
    let matches = monitor.match_document(doc("d", "The quick fox, the lazy dog"), analyzer, &HighlightingMatcherFactory)?;

    let hit = &matches.matches("d")[0];
    let terms: Vec<&str> = hit.hits["text"].iter().map(|h| h.term.as_str()).collect();
    assert_eq!(terms, vec!["quick", "fox", "lazy"]);
    Ok(())
}

#[test]
fn test_strict_unknown_nodes() -> Result<()> {
    let config = MonitorConfig::default().unknown_node_policy(UnknownNodePolicy::Fail);
    let monitor = Monitor::with_config(fragile_parser, config);

    let err = monitor
        .update(MonitorQuery::new("1", "").with_metadata("kind", "fragile"))
        .unwrap_err();
    assert!(matches!(err, PercolatorError::UnsupportedNode(_)));
    assert_eq!(monitor.query_count()?, 0);
    Ok(())
}

#[test]
fn test_custom_extractor_via_builder() -> Result<()> {
    struct FragileExtractor;

    impl TermExtractor for FragileExtractor {
        fn kind(&self) -> &'static str {
            "fragile"
        }

        fn extract(&self, _query: &dyn Query, _registry: &ExtractorRegistry) -> Result<ExtractionResult> {
            Ok(ExtractionResult::single(QueryTerm::exact("text", "calm")))
        }
    }

    let monitor = Monitor::builder(fragile_parser)
        .extractor(Arc::new(FragileExtractor))
        .build();
    monitor.update(MonitorQuery::new("fragile", "").with_metadata("kind", "fragile"))?;

    let candidates = monitor.candidates(&doc("d1", "boom"), analyzer().as_ref())?;
    assert!(candidates.is_empty());
    let candidates = monitor.candidates(&doc("d2", "calm"), analyzer().as_ref())?;
    assert_eq!(candidates, vec!["fragile"]);
    Ok(())
}

#[test]
fn test_index_limit() -> Result<()> {
    let config = MonitorConfig::default()
        .presearcher(PresearcherKind::TermFiltered)
        .max_indexed_terms(2);
    let monitor = Monitor::with_config(parser(), config);

    monitor.update(MonitorQuery::new("1", "a OR b"))?;
    let err = monitor.update(MonitorQuery::new("2", "c")).unwrap_err();
    assert!(matches!(err, PercolatorError::ResourceExhausted(_)));
    assert_eq!(monitor.query_count()?, 1);
    assert_eq!(monitor.stats()?.indexed_terms, 2);
    Ok(())
}

#[test]
fn test_close_during_registration_publishes_nothing() -> Result<()> {
    let parsing = Arc::new(Barrier::new(2));
    let closed = Arc::new(Barrier::new(2));
    let parser = {
        let (parsing, closed) = (parsing.clone(), closed.clone());
        move |text: &str, _: &Metadata| -> Result<Box<dyn Query>> {
            parsing.wait();
            closed.wait();
            parser().parse(text)
        }
    };
    let store = Arc::new(QueryStore::new(
        Arc::new(parser),
        ExtractorRegistry::new(),
        Arc::new(TermFilteredPresearcher::new()),
    ));

    let writer = {
        let store = store.clone();
        thread::spawn(move || store.update(MonitorQuery::new("late", "late")))
    };
    parsing.wait();
    store.close()?;
    closed.wait();

    let result = writer.join().expect("writer panicked");
    assert!(matches!(result, Err(PercolatorError::Closed(_))));
    assert!(store.is_closed());
    assert!(store.is_empty());
    assert!(store.get("late").is_none());
    Ok(())
}
