//! Reconciliation cycles, failure handling and the start/stop lifecycle.
#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use lostfound_core::{
    Catalog, CatalogObserver, Category, CoreError, Item, ItemId, ItemRepository, ItemStatus,
    MemoryRepository, Reconciler, ReconcilerState, RepoError, ReportType, SearchQuery, Snapshot,
    WatchObserver,
};
use pretty_assertions::assert_eq;

// ── Helpers ─────────────────────────────────────────────────────────

fn item(id: &str) -> Item {
    Item {
        id: ItemId::from(id),
        name: format!("report {id}"),
        description: String::new(),
        category: Category::Bags,
        report_type: ReportType::Found,
        location: "Car park".into(),
        contact: String::new(),
        reported_by: "Anonymous".into(),
        reported_on: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        status: ItemStatus::Active,
    }
}

/// Records the id set of every snapshot it is handed.
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<Vec<String>>>,
}

impl Recorder {
    fn calls(&self) -> Vec<Vec<String>> {
        self.seen.lock().unwrap().clone()
    }
}

impl CatalogObserver for Recorder {
    fn on_catalog_changed(&self, snapshot: &Snapshot) {
        let mut ids: Vec<String> = snapshot.iter().map(|i| i.id.to_string()).collect();
        ids.sort();
        self.seen.lock().unwrap().push(ids);
    }
}

fn setup(
    interval: Duration,
) -> (Arc<MemoryRepository>, Arc<Catalog>, Reconciler, Arc<Recorder>) {
    let repo = Arc::new(MemoryRepository::new());
    let catalog = Arc::new(Catalog::new());
    let reconciler = Reconciler::new(
        Arc::clone(&catalog),
        Arc::clone(&repo) as Arc<dyn ItemRepository>,
        interval,
    );
    let recorder = Arc::new(Recorder::default());
    reconciler.subscribe(Arc::clone(&recorder) as Arc<dyn CatalogObserver>);
    (repo, catalog, reconciler, recorder)
}

/// Repository whose `list_active` takes a while and flags when entered.
struct SlowRepository {
    inner: MemoryRepository,
    entered: AtomicBool,
    delay: Duration,
}

#[async_trait]
impl ItemRepository for SlowRepository {
    async fn insert(&self, item: &Item) -> Result<ItemId, RepoError> {
        self.inner.insert(item).await
    }

    async fn list_active(&self) -> Result<Vec<Item>, RepoError> {
        self.entered.store(true, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.inner.list_active().await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Item>, RepoError> {
        self.inner.search(query).await
    }

    async fn get(&self, id: &ItemId) -> Result<Option<Item>, RepoError> {
        self.inner.get(id).await
    }

    async fn max_sequence(&self, prefix: &str) -> Result<u64, RepoError> {
        self.inner.max_sequence(prefix).await
    }
}

// ── Single cycles ───────────────────────────────────────────────────

#[tokio::test]
async fn two_cycles_merge_supersets_and_notify_each_time() {
    let (repo, catalog, reconciler, recorder) = setup(Duration::from_secs(5));
    let second = Arc::new(Recorder::default());
    reconciler.subscribe(Arc::clone(&second) as Arc<dyn CatalogObserver>);

    repo.insert(&item("A")).await.unwrap();
    repo.insert(&item("B")).await.unwrap();
    let first = reconciler.reconcile_once().await.unwrap();
    assert_eq!(first.fetched, 2);
    assert_eq!(first.inserted, 2);
    assert_eq!(catalog.len(), 2);

    repo.insert(&item("C")).await.unwrap();
    let again = reconciler.reconcile_once().await.unwrap();
    assert_eq!(again.fetched, 3);
    assert_eq!(again.inserted, 1);
    assert_eq!(again.total, 3);

    let expected = vec![
        vec!["A".to_string(), "B".to_string()],
        vec!["A".to_string(), "B".to_string(), "C".to_string()],
    ];
    assert_eq!(recorder.calls(), expected);
    assert_eq!(second.calls(), expected);
}

#[tokio::test]
async fn failed_pull_skips_merge_and_notification() {
    let (repo, catalog, reconciler, recorder) = setup(Duration::from_secs(5));
    repo.insert(&item("A")).await.unwrap();
    reconciler.reconcile_once().await.unwrap();

    repo.set_available(false);
    let err = reconciler.reconcile_once().await.unwrap_err();
    assert!(matches!(err, CoreError::RepositoryUnavailable { .. }));
    assert_eq!(recorder.calls().len(), 1);
    assert_eq!(catalog.len(), 1, "last known good snapshot is kept");

    let health = reconciler.health();
    assert_eq!(health.consecutive_failures, 1);
    assert!(health.last_error.is_some());

    repo.set_available(true);
    reconciler.reconcile_once().await.unwrap();
    let health = reconciler.health();
    assert_eq!(health.consecutive_failures, 0);
    assert!(health.last_success.is_some());
    assert_eq!(recorder.calls().len(), 2);
}

#[tokio::test]
async fn conflicting_record_is_counted_and_rest_of_batch_merges() {
    let (repo, catalog, reconciler, recorder) = setup(Duration::from_secs(5));
    let mut stale = item("A");
    stale.name = "stale copy".into();
    catalog.add(stale).unwrap();

    repo.insert(&item("A")).await.unwrap();
    repo.insert(&item("B")).await.unwrap();
    let report = reconciler.reconcile_once().await.unwrap();

    assert_eq!(report.conflicts, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(catalog.find(&ItemId::from("A")).unwrap().name, "stale copy");
    assert_eq!(recorder.calls(), vec![vec!["A".to_string(), "B".to_string()]]);
}

// ── Background loop ─────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn loop_reconciles_on_every_tick() {
    let (repo, catalog, reconciler, recorder) = setup(Duration::from_secs(5));
    repo.insert(&item("A")).await.unwrap();

    reconciler.start().await;
    assert_eq!(reconciler.state(), ReconcilerState::Running);

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(recorder.calls().len(), 2);
    assert_eq!(catalog.len(), 1);

    reconciler.stop().await;
    assert_eq!(reconciler.state(), ReconcilerState::Stopped);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(recorder.calls().len(), 2, "no cycles after stop");
}

#[tokio::test(start_paused = true)]
async fn loop_survives_failing_ticks() {
    let (repo, catalog, reconciler, recorder) = setup(Duration::from_secs(5));
    repo.insert(&item("A")).await.unwrap();
    repo.set_available(false);

    reconciler.start().await;
    tokio::time::sleep(Duration::from_secs(11)).await;
    assert!(recorder.calls().is_empty());
    assert_eq!(reconciler.health().consecutive_failures, 2);

    repo.set_available(true);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(recorder.calls().len(), 1);
    assert_eq!(catalog.len(), 1);

    reconciler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn start_and_stop_are_idempotent() {
    let (_repo, _catalog, reconciler, recorder) = setup(Duration::from_secs(5));

    reconciler.stop().await;
    assert_eq!(reconciler.state(), ReconcilerState::Stopped);

    reconciler.start().await;
    reconciler.start().await;
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(recorder.calls().len(), 1, "second start spawned nothing");

    reconciler.stop().await;
    reconciler.stop().await;
    assert_eq!(reconciler.state(), ReconcilerState::Stopped);

    // Restart after a stop runs a fresh loop.
    reconciler.start().await;
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(recorder.calls().len(), 2);
    reconciler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn state_changes_are_published_to_subscribers() {
    let (_repo, _catalog, reconciler, _recorder) = setup(Duration::from_secs(5));
    let mut state = reconciler.subscribe_state();
    assert_eq!(*state.borrow_and_update(), ReconcilerState::Stopped);

    reconciler.start().await;
    state.changed().await.unwrap();
    assert_eq!(*state.borrow_and_update(), ReconcilerState::Running);

    reconciler.stop().await;
    state.changed().await.unwrap();
    assert_eq!(*state.borrow_and_update(), ReconcilerState::Stopped);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn published_state_matches_the_loop_after_racing_start_and_stop() {
    let (_repo, _catalog, reconciler, recorder) = setup(Duration::from_secs(60));

    for _ in 0..50 {
        let starter = reconciler.clone();
        let stopper = reconciler.clone();
        let (started, stopped) = tokio::join!(
            tokio::spawn(async move { starter.start().await }),
            tokio::spawn(async move { stopper.stop().await }),
        );
        started.unwrap();
        stopped.unwrap();

        if reconciler.state() == ReconcilerState::Running {
            let before = recorder.calls().len();
            reconciler.request_refresh();
            tokio::time::timeout(Duration::from_secs(5), async {
                while recorder.calls().len() <= before {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
            })
            .await
            .expect("state is Running but no loop ran the requested cycle");
        }

        reconciler.stop().await;
        assert_eq!(reconciler.state(), ReconcilerState::Stopped);
    }
}

#[tokio::test(start_paused = true)]
async fn health_subscribers_see_failures_and_recovery() {
    let (repo, _catalog, reconciler, _recorder) = setup(Duration::from_secs(5));
    let mut health = reconciler.subscribe_health();

    repo.set_available(false);
    assert!(reconciler.reconcile_once().await.is_err());
    health.changed().await.unwrap();
    {
        let seen = health.borrow_and_update();
        assert_eq!(seen.consecutive_failures, 1);
        assert!(seen.last_error.is_some());
        assert!(seen.last_success.is_none());
    }

    repo.set_available(true);
    reconciler.reconcile_once().await.unwrap();
    health.changed().await.unwrap();
    let seen = health.borrow_and_update();
    assert_eq!(seen.consecutive_failures, 0);
    assert!(seen.last_success.is_some());
}

#[tokio::test(start_paused = true)]
async fn stop_lets_the_in_flight_cycle_finish() {
    let repo = Arc::new(SlowRepository {
        inner: MemoryRepository::with_items(vec![item("A")]),
        entered: AtomicBool::new(false),
        delay: Duration::from_secs(2),
    });
    let catalog = Arc::new(Catalog::new());
    let reconciler = Reconciler::new(
        Arc::clone(&catalog),
        Arc::clone(&repo) as Arc<dyn ItemRepository>,
        Duration::from_secs(60),
    );
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notified);
    reconciler.subscribe(Arc::new(move |_: &Snapshot| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    reconciler.start().await;
    reconciler.request_refresh();
    while !repo.entered.load(Ordering::SeqCst) {
        tokio::task::yield_now().await;
    }

    reconciler.stop().await;

    assert_eq!(notified.load(Ordering::SeqCst), 1);
    assert_eq!(catalog.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn refresh_request_runs_without_timer() {
    let (repo, catalog, reconciler, _recorder) = setup(Duration::ZERO);
    let watcher = Arc::new(WatchObserver::new());
    let mut stream = watcher.subscribe();
    reconciler.subscribe(Arc::clone(&watcher) as Arc<dyn CatalogObserver>);

    reconciler.start().await;
    repo.insert(&item("A")).await.unwrap();
    reconciler.request_refresh();

    let snapshot = tokio::time::timeout(Duration::from_secs(1), stream.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(catalog.len(), 1);

    reconciler.stop().await;
}
