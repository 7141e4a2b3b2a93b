mod helpers;

use ghibli_cache::cache::{CacheConfig, DatasetCache, RefreshOutcome};
use ghibli_cache::ghibli::FetchError;
use ghibli_cache::graph::EntityKind;
use helpers::{FakeSource, assert_single_tag, assert_symmetric, tagged_dataset};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn cache_with(source: &Arc<FakeSource>, staleness_threshold: Duration) -> Arc<DatasetCache> {
    Arc::new(DatasetCache::new(
        source.clone(),
        CacheConfig {
            staleness_threshold,
        },
    ))
}

#[tokio::test]
async fn first_read_fetches_then_serves_from_cache() {
    let source = FakeSource::new(tagged_dataset("v1"));
    let cache = cache_with(&source, Duration::from_secs(60));
    assert_eq!(cache.generation(), 0);
    assert!(cache.age().is_none());

    let first = cache.read().await;
    assert_eq!(first.len(EntityKind::Films), 3);
    assert_eq!(source.fetches(), 1);

    let second = cache.read().await;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.fetches(), 1);
    assert_eq!(cache.generation(), 1);
    assert_eq!(cache.raw_counts(), Some(tagged_dataset("v1").counts()));
}

#[tokio::test]
async fn zero_threshold_refreshes_on_every_read() {
    let source = FakeSource::new(tagged_dataset("v1"));
    let cache = cache_with(&source, Duration::ZERO);

    cache.read().await;
    tokio::time::sleep(Duration::from_millis(2)).await;
    source.set_dataset(tagged_dataset("v2"));
    let snapshot = cache.read().await;

    assert_eq!(source.fetches(), 2);
    assert_single_tag(&snapshot, "v2");
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let source = FakeSource::new(tagged_dataset("v1"));
    let cache = cache_with(&source, Duration::ZERO);
    let before = cache.read().await;
    let age_before = cache.age().unwrap();

    source.set_failing(true);
    source.set_dataset(tagged_dataset("v2"));
    tokio::time::sleep(Duration::from_millis(5)).await;

    let err = cache.refresh().await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::Status {
            kind: EntityKind::People,
            status: 503,
            ..
        }
    ));

    // The read swallows the error and serves what was there.
    let after = cache.read().await;
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(cache.generation(), 1);
    assert!(cache.age().unwrap() >= age_before + Duration::from_millis(5));
}

#[tokio::test]
async fn read_before_any_success_is_empty() {
    let source = FakeSource::new(tagged_dataset("v1"));
    source.set_failing(true);
    let cache = cache_with(&source, Duration::from_secs(60));

    let snapshot = cache.read().await;
    assert!(snapshot.is_empty());
    assert_eq!(cache.generation(), 0);
    assert_eq!(cache.raw_counts(), None);

    source.set_failing(false);
    let snapshot = cache.read().await;
    assert_eq!(snapshot.len(EntityKind::Vehicles), 2);
}

#[tokio::test]
async fn held_snapshot_survives_replacement() {
    let source = FakeSource::new(tagged_dataset("v1"));
    let cache = cache_with(&source, Duration::from_secs(60));
    let held = cache.read().await;

    source.set_dataset(tagged_dataset("v2"));
    assert!(matches!(
        cache.refresh().await,
        Ok(RefreshOutcome::Published(_))
    ));

    assert_single_tag(&held, "v1");
    assert_single_tag(&cache.current(), "v2");
    assert_eq!(cache.generation(), 2);
}

#[tokio::test]
async fn readers_keep_old_snapshot_while_refresh_is_in_flight() {
    let source = FakeSource::new(tagged_dataset("v1"));
    let cache = cache_with(&source, Duration::from_secs(60));
    cache.read().await;

    source.set_dataset(tagged_dataset("v2"));
    source.hold();
    let refresh = tokio::spawn({
        let cache = cache.clone();
        async move { cache.refresh().await }
    });
    source.wait_fetch_started().await;

    // The fetch is parked; reads don't wait for it.
    let during = cache.read().await;
    assert_single_tag(&during, "v1");
    assert_eq!(cache.generation(), 1);

    source.release();
    let outcome = refresh.await.unwrap().unwrap();
    assert!(matches!(outcome, RefreshOutcome::Published(_)));
    assert_single_tag(&cache.current(), "v2");
}

#[tokio::test]
async fn queued_refresh_coalesces_with_in_flight_one() {
    let source = FakeSource::new(tagged_dataset("v1"));
    let cache = cache_with(&source, Duration::from_secs(60));

    source.hold();
    let first = tokio::spawn({
        let cache = cache.clone();
        async move { cache.refresh().await }
    });
    source.wait_fetch_started().await;

    let second = tokio::spawn({
        let cache = cache.clone();
        async move { cache.refresh().await }
    });
    // Let the second refresh observe the generation and queue on the gate.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    source.release();
    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();

    assert!(matches!(first, RefreshOutcome::Published(_)));
    assert_eq!(second, RefreshOutcome::Coalesced);
    assert_eq!(source.fetches(), 1);
    assert_eq!(cache.generation(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_readers_never_see_a_mixed_snapshot() {
    let source = FakeSource::new(tagged_dataset("v0"));
    let cache = cache_with(&source, Duration::from_secs(60));
    cache.refresh().await.unwrap();

    let done = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cache = cache.clone();
            let done = done.clone();
            std::thread::spawn(move || {
                let mut reads = 0usize;
                loop {
                    let finished = done.load(Ordering::Acquire);
                    let snapshot = cache.current();
                    assert_symmetric(&snapshot);
                    let tag = snapshot
                        .films()
                        .next()
                        .and_then(|f| f.title.as_deref())
                        .and_then(|title| title.rsplit(' ').next())
                        .map(str::to_owned)
                        .unwrap();
                    assert_single_tag(&snapshot, &tag);
                    reads += 1;
                    if finished {
                        break reads;
                    }
                }
            })
        })
        .collect();

    for round in 1..=20 {
        source.set_dataset(tagged_dataset(&format!("v{round}")));
        cache.refresh().await.unwrap();
        tokio::task::yield_now().await;
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(cache.generation(), 21);
    assert_single_tag(&cache.current(), "v20");
}
