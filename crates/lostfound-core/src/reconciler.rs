// ── Background reconciliation ──
//
// Periodically pulls the authoritative item set from the repository,
// merges it into the catalog, and pushes the merged snapshot to every
// registered observer. A failed pull skips the cycle; the next tick
// retries.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{CoreError, RepoError};
use crate::observer::CatalogObserver;
use crate::repository::ItemRepository;
use crate::store::{AddOutcome, Catalog, Snapshot};

// ── State ────────────────────────────────────────────────────────

/// Lifecycle of the background loop, observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilerState {
    Stopped,
    Running,
}

/// Outcome bookkeeping across cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilerHealth {
    pub last_success: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}

/// What a single successful cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Items returned by the repository.
    pub fetched: usize,
    /// Items that were new to the catalog.
    pub inserted: usize,
    /// Items refused because their identifier was bound to other content.
    pub conflicts: usize,
    /// Catalog size after the merge.
    pub total: usize,
}

// ── Reconciler ───────────────────────────────────────────────────

/// Keeps the catalog eventually consistent with the repository.
///
/// Cheaply cloneable. `start` spawns the periodic loop on the current
/// tokio runtime; `stop` cancels it and waits for any in-flight cycle.
#[derive(Clone)]
pub struct Reconciler {
    inner: Arc<ReconcilerInner>,
}

struct ReconcilerInner {
    catalog: Arc<Catalog>,
    repository: Arc<dyn ItemRepository>,
    interval: Duration,
    observers: RwLock<Vec<Arc<dyn CatalogObserver>>>,
    wake: Notify,
    state: watch::Sender<ReconcilerState>,
    health: watch::Sender<ReconcilerHealth>,
    running: Mutex<Option<RunningLoop>>,
}

struct RunningLoop {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Reconciler {
    /// Create a stopped reconciler. A zero `interval` disables the timer;
    /// the loop then only runs on [`request_refresh`](Self::request_refresh).
    pub fn new(
        catalog: Arc<Catalog>,
        repository: Arc<dyn ItemRepository>,
        interval: Duration,
    ) -> Self {
        let (state, _) = watch::channel(ReconcilerState::Stopped);
        let (health, _) = watch::channel(ReconcilerHealth::default());

        Self {
            inner: Arc::new(ReconcilerInner {
                catalog,
                repository,
                interval,
                observers: RwLock::new(Vec::new()),
                wake: Notify::new(),
                state,
                health,
                running: Mutex::new(None),
            }),
        }
    }

    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Register an observer for every subsequent successful cycle.
    pub fn subscribe(&self, observer: Arc<dyn CatalogObserver>) {
        self.inner
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Launch the periodic loop. No-op when already running.
    pub async fn start(&self) {
        let mut running = self.inner.running.lock().await;
        if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
            debug!("reconciler already running");
            return;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(reconcile_loop(self.clone(), cancel.clone()));
        *running = Some(RunningLoop { cancel, handle });
        // Published under the lock so a concurrent `stop` cannot interleave.
        self.inner.state.send_replace(ReconcilerState::Running);
        drop(running);

        info!(interval = ?self.inner.interval, "reconciler started");
    }

    /// Cancel the loop and join it. An in-flight cycle finishes first.
    /// No-op when already stopped.
    pub async fn stop(&self) {
        let mut running = self.inner.running.lock().await;
        let Some(run) = running.take() else {
            return;
        };

        run.cancel.cancel();
        if let Err(e) = run.handle.await {
            warn!(error = %e, "reconciler task ended abnormally");
        }
        self.inner.state.send_replace(ReconcilerState::Stopped);
        drop(running);

        info!("reconciler stopped");
    }

    /// Ask the running loop for a cycle now instead of at the next tick.
    ///
    /// Requests made while a cycle is in flight coalesce into one follow-up
    /// cycle.
    pub fn request_refresh(&self) {
        self.inner.wake.notify_one();
    }

    // ── Observation ──────────────────────────────────────────────

    pub fn state(&self) -> ReconcilerState {
        *self.inner.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ReconcilerState> {
        self.inner.state.subscribe()
    }

    pub fn health(&self) -> ReconcilerHealth {
        self.inner.health.borrow().clone()
    }

    pub fn subscribe_health(&self) -> watch::Receiver<ReconcilerHealth> {
        self.inner.health.subscribe()
    }

    // ── Cycle ────────────────────────────────────────────────────

    /// Run one pull → merge → notify cycle inline.
    ///
    /// Observers are notified only after the whole batch is merged, and
    /// not at all when the pull fails.
    pub async fn reconcile_once(&self) -> Result<CycleReport, CoreError> {
        let items = match self.inner.repository.list_active().await {
            Ok(items) => items,
            Err(e) => {
                self.record_failure(&e);
                return Err(e.into());
            }
        };

        let catalog = &self.inner.catalog;
        let fetched = items.len();
        let mut inserted = 0;
        let mut conflicts = 0;
        for item in items {
            match catalog.add(item) {
                Ok(AddOutcome::Inserted) => inserted += 1,
                Ok(AddOutcome::AlreadyPresent) => {}
                // Logged by the catalog; the rest of the batch still merges.
                Err(_) => conflicts += 1,
            }
        }

        let snapshot: Snapshot = Arc::new(catalog.all_items());
        let report = CycleReport {
            fetched,
            inserted,
            conflicts,
            total: snapshot.len(),
        };

        self.notify_observers(&snapshot);
        self.record_success();

        debug!(
            fetched = report.fetched,
            inserted = report.inserted,
            conflicts = report.conflicts,
            total = report.total,
            "reconciliation complete"
        );
        Ok(report)
    }

    // ── Private helpers ──────────────────────────────────────────

    fn notify_observers(&self, snapshot: &Snapshot) {
        // Clone the list so observers run without the registry lock held.
        let observers: Vec<Arc<dyn CatalogObserver>> = self
            .inner
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for observer in observers {
            observer.on_catalog_changed(snapshot);
        }
    }

    fn record_success(&self) {
        self.inner.health.send_modify(|h| {
            h.last_success = Some(Utc::now());
            h.consecutive_failures = 0;
            h.last_error = None;
        });
    }

    fn record_failure(&self, err: &RepoError) {
        let mut failures = 0;
        self.inner.health.send_modify(|h| {
            h.consecutive_failures = h.consecutive_failures.saturating_add(1);
            h.last_error = Some(err.to_string());
            failures = h.consecutive_failures;
        });
        warn!(error = %err, consecutive_failures = failures, "reconciliation failed; keeping last snapshot");
    }
}

// ── Background task ──────────────────────────────────────────────

/// Tick or wake, then reconcile, until cancelled.
///
/// Cancellation is checked before every cycle, never during one, so a
/// batch is always merged and published whole.
async fn reconcile_loop(reconciler: Reconciler, cancel: CancellationToken) {
    let period = reconciler.inner.interval;
    let mut ticker = (!period.is_zero()).then(|| {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    // Consume the immediate first tick; the owner does the initial load.
    if let Some(interval) = ticker.as_mut() {
        interval.tick().await;
    }

    loop {
        let woken = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = next_tick(ticker.as_mut()) => false,
            () = reconciler.inner.wake.notified() => true,
        };

        if woken {
            if let Some(interval) = ticker.as_mut() {
                interval.reset();
            }
        }

        // Failures are recorded and logged inside; the loop keeps going.
        let _ = reconciler.reconcile_once().await;
    }
}

async fn next_tick(ticker: Option<&mut Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
