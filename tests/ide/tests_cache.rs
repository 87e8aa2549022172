//! Document cache and AnalysisHost tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use calc::ide::{
    AnalysisConfig, AnalysisHost, CacheConfig, CacheError, DocumentCache, EvictionPolicy,
    ParsedDocument,
};
use calc::{DocumentId, DocumentSnapshot};

fn counting_parse<'a>(
    host: &'a AnalysisHost,
    calls: &'a AtomicUsize,
) -> impl FnOnce(&DocumentSnapshot) -> ParsedDocument + 'a {
    move |snapshot| {
        calls.fetch_add(1, Ordering::SeqCst);
        host.analyze(snapshot)
    }
}

// =============================================================================
// HITS AND MISSES
// =============================================================================

#[test]
fn test_unchanged_version_returns_identical_object() {
    let host = AnalysisHost::new();
    let first = host.get_or_reparse("a.calc", 1, "SUM([Sales])").unwrap();
    let second = host.get_or_reparse("a.calc", 1, "SUM([Sales])").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_changed_version_returns_independent_result() {
    let host = AnalysisHost::new();
    let first = host.get_or_reparse("a.calc", 1, "IF [A] THEN 1").unwrap();
    let second = host.get_or_reparse("a.calc", 2, "IF [A] THEN 1 END").unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.diagnostics.len(), 1);
    assert!(second.diagnostics.is_empty());
}

#[test]
fn test_same_version_different_text_reparses() {
    let host = AnalysisHost::new();
    let calls = AtomicUsize::new(0);
    let cache = host.cache();

    let a = DocumentSnapshot::new("a.calc", 1, "1");
    let b = DocumentSnapshot::new("a.calc", 1, "2");
    cache.get_or_reparse(&a, counting_parse(&host, &calls)).unwrap();
    cache.get_or_reparse(&a, counting_parse(&host, &calls)).unwrap();
    cache.get_or_reparse(&b, counting_parse(&host, &calls)).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_stale_result_is_not_stored() {
    let host = AnalysisHost::new();
    let newer = host.get_or_reparse("a.calc", 5, "[New]").unwrap();
    let older = host.get_or_reparse("a.calc", 4, "[Old]").unwrap();

    assert_eq!(older.version, 4);
    let stored = host.cache().get(&DocumentId::from("a.calc")).unwrap();
    assert!(Arc::ptr_eq(&stored, &newer));
}

#[test]
fn test_documents_are_independent() {
    let host = AnalysisHost::new();
    let a = host.get_or_reparse("a.calc", 1, "[A]").unwrap();
    let b = host.get_or_reparse("b.calc", 1, "[A]").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(host.cache().len(), 2);
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[test]
fn test_invalidate_forgets_document() {
    let host = AnalysisHost::new();
    let id = DocumentId::from("a.calc");
    host.get_or_reparse(id.clone(), 1, "1").unwrap();
    assert!(host.invalidate(&id));
    assert!(!host.invalidate(&id));
    assert!(host.cache().is_empty());
}

#[test]
fn test_lru_eviction_skips_active_documents() {
    let config = AnalysisConfig::default().with_cache(CacheConfig::default().with_max_entries(2));
    let host = AnalysisHost::with_config(config);
    let (a, b, c) = (
        DocumentId::from("a"),
        DocumentId::from("b"),
        DocumentId::from("c"),
    );

    host.get_or_reparse(a.clone(), 1, "1").unwrap();
    host.mark_active(&a);
    host.get_or_reparse(b.clone(), 1, "2").unwrap();
    host.get_or_reparse(c.clone(), 1, "3").unwrap();

    assert!(host.cache().contains(&a));
    assert!(!host.cache().contains(&b));
    assert!(host.cache().contains(&c));

    host.mark_inactive(&a);
    assert_eq!(host.evict(EvictionPolicy::LeastRecentlyUsed { max_entries: 1 }), 1);
    assert!(!host.cache().contains(&a));
}

#[test]
fn test_size_eviction() {
    let cache = DocumentCache::default();
    let host = AnalysisHost::new();
    for (i, text) in ["[A]", "[B] + [C]", "[D]"].iter().enumerate() {
        let snapshot = DocumentSnapshot::new(format!("doc{i}"), 1, *text);
        cache.get_or_reparse(&snapshot, |s| host.analyze(s)).unwrap();
    }
    let total = cache.total_bytes();
    assert!(total > 0);
    assert!(cache.evict(EvictionPolicy::Size { max_bytes: total - 1 }) >= 1);
    assert!(cache.total_bytes() < total);

    let remaining = cache.len();
    assert_eq!(cache.evict(EvictionPolicy::Size { max_bytes: 0 }), remaining);
    assert_eq!(cache.total_bytes(), 0);
}

#[test]
fn test_shutdown_refuses_requests() {
    let host = AnalysisHost::new();
    host.get_or_reparse("a.calc", 1, "1").unwrap();
    host.shutdown();

    assert!(host.cache().is_empty());
    assert_eq!(
        host.get_or_reparse("a.calc", 1, "1").unwrap_err(),
        CacheError::ShutDown
    );
    assert!(host.analysis(&DocumentSnapshot::new("a.calc", 1, "1")).is_err());
}

// =============================================================================
// CONCURRENCY
// =============================================================================

#[test]
fn test_concurrent_requests_share_one_entry() {
    let host = AnalysisHost::new();
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| host.get_or_reparse("shared", 1, "SUM([Sales])").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(host.cache().len(), 1);
    let stored = host.cache().get(&DocumentId::from("shared")).unwrap();
    assert!(results.iter().all(|r| r.version == 1 && r.tree == stored.tree));
}

#[test]
fn test_reparse_all_keeps_input_order() {
    let host = AnalysisHost::new();
    let snapshots: Vec<_> = (0..16)
        .map(|i| DocumentSnapshot::new(format!("doc{i}"), i, format!("[F{i}] + {i}")))
        .collect();

    let results = host.reparse_all(&snapshots);
    assert_eq!(results.len(), 16);
    for (snapshot, result) in snapshots.iter().zip(&results) {
        let parsed = result.as_ref().unwrap();
        assert_eq!(parsed.id, snapshot.id);
        assert_eq!(parsed.version, snapshot.version);
    }
    assert_eq!(host.cache().len(), 16);
}

#[test]
fn test_reparse_all_reuses_cached_versions() {
    let host = AnalysisHost::new();
    let cached = host.get_or_reparse("b.calc", 3, "AVG([Profit])").unwrap();

    let snapshots = vec![
        DocumentSnapshot::new("a.calc", 1, "SUM([Sales])"),
        DocumentSnapshot::new("b.calc", 3, "AVG([Profit])"),
        DocumentSnapshot::new("c.calc", 7, "LEFT([Name])"),
    ];
    let results: Vec<_> = host
        .reparse_all(&snapshots)
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let ids: Vec<_> = results.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a.calc", "b.calc", "c.calc"]);
    assert!(Arc::ptr_eq(&results[1], &cached));
    assert_eq!(results[2].diagnostics.len(), 1);
    assert_eq!(host.cache().len(), 3);
}

#[test]
fn test_reparse_all_after_shutdown_fails_each_document() {
    let host = AnalysisHost::new();
    host.shutdown();
    let snapshots = vec![
        DocumentSnapshot::new("a.calc", 1, "SUM([Sales])"),
        DocumentSnapshot::new("b.calc", 1, "SUM([Sales])"),
    ];
    let results = host.reparse_all(&snapshots);
    assert!(results.iter().all(|r| r == &Err(CacheError::ShutDown)));
}

#[test]
fn test_closing_during_parse_does_not_store() {
    let host = AnalysisHost::new();
    let cache = host.cache();
    let id = DocumentId::from("closing.calc");
    let snapshot = DocumentSnapshot::new(id.clone(), 1, "SUM([Sales])");

    let parsed = cache
        .get_or_reparse(&snapshot, |s| {
            cache.invalidate(&s.id);
            host.analyze(s)
        })
        .unwrap();
    assert_eq!(parsed.version, 1);
    assert!(!cache.contains(&id));
}
