//! Matching while queries are being registered and removed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use percolator::analysis::analyzer::{Analyzer, WhitespaceAnalyzer};
use percolator::document::{DocumentBatch, InputDocument};
use percolator::error::Result;
use percolator::matcher::SimpleMatcherFactory;
use percolator::monitor::{Monitor, MonitorQuery};
use percolator::presearcher::TermFilteredPresearcher;
use percolator::query::QueryParser;

fn monitor() -> Arc<Monitor> {
    Arc::new(Monitor::new(
        QueryParser::new().with_default_field("text"),
        Arc::new(TermFilteredPresearcher::new()),
    ))
}

#[test]
fn test_match_during_updates() -> Result<()> {
    let monitor = monitor();
    monitor.update(MonitorQuery::new("stable", "stable"))?;
    let done = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..2)
        .map(|w| {
            let monitor = monitor.clone();
            thread::spawn(move || -> Result<()> {
                for i in 0..200 {
                    let id = format!("w{w}-{}", i % 20);
                    monitor.update(MonitorQuery::new(id.clone(), format!("churn{}", i % 7)))?;
                    if i % 3 == 0 {
                        monitor.remove(&id)?;
                    }
                }
                Ok(())
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let monitor = monitor.clone();
            let done = done.clone();
            thread::spawn(move || -> Result<usize> {
                let analyzer: Arc<dyn Analyzer> = Arc::new(WhitespaceAnalyzer::new());
                let mut rounds = 0;
                while !done.load(Ordering::SeqCst) || rounds == 0 {
                    let doc = InputDocument::builder("d").add_text("text", "stable churn3").build();
                    let matches = monitor.match_batch(&DocumentBatch::of(analyzer.clone(), doc), &SimpleMatcherFactory)?;
                    assert!(matches.contains("d", "stable"));
                    assert!(matches.errors().is_empty());
                    assert!(matches.queries_run() <= matches.queries_registered());
                    rounds += 1;
                }
                Ok(rounds)
            })
        })
        .collect();

    for writer in writers {
        writer.join().expect("writer panicked")?;
    }
    done.store(true, Ordering::SeqCst);
    for reader in readers {
        assert!(reader.join().expect("reader panicked")? > 0);
    }

    let ids = monitor.query_ids()?;
    assert!(ids.contains(&"stable".to_string()));
    assert_eq!(monitor.query_count()?, ids.len());
    Ok(())
}

#[test]
fn test_snapshot_is_stable_for_a_batch() -> Result<()> {
    let monitor = monitor();
    monitor.update_all((0..50).map(|i| MonitorQuery::new(format!("q{i}"), "shared")))?;

    let remover = {
        let monitor = monitor.clone();
        thread::spawn(move || -> Result<()> {
            for i in 0..50 {
                monitor.remove(&format!("q{i}"))?;
            }
            Ok(())
        })
    };

    let analyzer: Arc<dyn Analyzer> = Arc::new(WhitespaceAnalyzer::new());
    let documents: Vec<_> = (0..20)
        .map(|i| InputDocument::builder(format!("d{i}")).add_text("text", "shared").build())
        .collect();
    let batch = DocumentBatch::from_documents(analyzer, documents)?;
    let matches = monitor.match_batch(&batch, &SimpleMatcherFactory)?;

    // Every document saw the same set of queries.
    let first = matches.matched_ids("d0");
    for i in 1..20 {
        assert_eq!(matches.matched_ids(&format!("d{i}")), first);
    }
    assert_eq!(first.len(), matches.queries_registered());

    remover.join().expect("remover panicked")?;
    assert_eq!(monitor.query_count()?, 0);
    Ok(())
}
