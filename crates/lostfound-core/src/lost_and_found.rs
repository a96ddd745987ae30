// ── Lost & found facade ──
//
// Owns the shared catalog, the repository handle, the identifier
// sequence and the reconciler. Front ends talk to this type only.

use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info};

use crate::config::CatalogConfig;
use crate::error::CoreError;
use crate::model::{Category, Item, ItemId, NewItem};
use crate::observer::{CatalogObserver, SnapshotStream, WatchObserver};
use crate::reconciler::Reconciler;
use crate::repository::ItemRepository;
use crate::search::{SearchEngine, SearchQuery};
use crate::sequence::IdSequence;
use crate::store::{Catalog, Snapshot};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<LostAndFoundInner>`. Opening performs the
/// initial load; [`start`](Self::start) launches periodic reconciliation and
/// [`shutdown`](Self::shutdown) stops it.
#[derive(Clone)]
pub struct LostAndFound {
    inner: Arc<LostAndFoundInner>,
}

struct LostAndFoundInner {
    config: CatalogConfig,
    catalog: Arc<Catalog>,
    repository: Arc<dyn ItemRepository>,
    sequence: Arc<IdSequence>,
    reconciler: Reconciler,
}

impl LostAndFound {
    /// Seed the identifier sequence from the store and load the catalog.
    ///
    /// Fails when the store is unreachable; there is nothing to serve yet.
    pub async fn open(
        config: CatalogConfig,
        repository: Arc<dyn ItemRepository>,
    ) -> Result<Self, CoreError> {
        if config.id_prefix.trim().is_empty() {
            return Err(CoreError::Config {
                message: "identifier prefix must not be empty".into(),
            });
        }

        let last = repository.max_sequence(&config.id_prefix).await?;
        let sequence = Arc::new(IdSequence::new(
            config.id_prefix.clone(),
            config.id_width,
            last,
        ));
        debug!(prefix = %config.id_prefix, last, "identifier sequence seeded");

        let catalog = Arc::new(Catalog::new());
        let reconciler = Reconciler::new(
            Arc::clone(&catalog),
            Arc::clone(&repository),
            config.reconcile_interval,
        );

        // Keep the sequence ahead of identifiers other writers allocated.
        let seen = Arc::clone(&sequence);
        let tracker: Arc<dyn CatalogObserver> = Arc::new(move |snapshot: &Snapshot| {
            for item in snapshot.iter() {
                seen.observe(&item.id);
            }
        });
        reconciler.subscribe(tracker);

        let report = reconciler.reconcile_once().await?;
        info!(items = report.total, "catalog loaded");

        Ok(Self {
            inner: Arc::new(LostAndFoundInner {
                config,
                catalog,
                repository,
                sequence,
                reconciler,
            }),
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.inner.catalog
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.inner.reconciler
    }

    pub fn repository(&self) -> &Arc<dyn ItemRepository> {
        &self.inner.repository
    }

    // ── Lifecycle ────────────────────────────────────────────────

    pub async fn start(&self) {
        self.inner.reconciler.start().await;
    }

    pub async fn shutdown(&self) {
        self.inner.reconciler.stop().await;
    }

    // ── Observation ──────────────────────────────────────────────

    pub fn subscribe(&self, observer: Arc<dyn CatalogObserver>) {
        self.inner.reconciler.subscribe(observer);
    }

    /// Subscribe to snapshots published after each reconciliation,
    /// starting from the current catalog contents.
    pub fn watch(&self) -> SnapshotStream {
        let observer = WatchObserver::new();
        observer.on_catalog_changed(&Arc::new(self.inner.catalog.all_items()));
        let stream = observer.subscribe();
        self.inner.reconciler.subscribe(Arc::new(observer));
        stream
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Validate, allocate an identifier, persist, then add to the catalog.
    ///
    /// If the store rejects the write the catalog is left untouched.
    pub async fn report(&self, draft: NewItem) -> Result<Item, CoreError> {
        draft.validate()?;

        let id = self.inner.sequence.next_id();
        let item = draft.into_item(id, Local::now().date_naive());

        let stored = self.inner.repository.insert(&item).await?;
        self.inner.catalog.add(item.clone())?;
        self.inner.reconciler.request_refresh();

        info!(
            id = %stored,
            category = %item.category,
            kind = %item.report_type,
            "item reported"
        );
        Ok(item)
    }

    // ── Reads ────────────────────────────────────────────────────

    pub fn all_items(&self) -> Vec<Arc<Item>> {
        self.inner.catalog.all_items()
    }

    pub fn items_by_category(&self, category: Category) -> Vec<Arc<Item>> {
        self.inner.catalog.items_by_category(category)
    }

    pub fn find(&self, id: &ItemId) -> Option<Arc<Item>> {
        self.inner.catalog.find(id)
    }

    /// Catalog lookup, falling back to the store for reports the catalog
    /// does not hold (e.g. no longer active).
    pub async fn item(&self, id: &ItemId) -> Result<Arc<Item>, CoreError> {
        if let Some(item) = self.inner.catalog.find(id) {
            return Ok(item);
        }
        self.inner
            .repository
            .get(id)
            .await?
            .map(Arc::new)
            .ok_or_else(|| CoreError::NotFound { id: id.clone() })
    }

    /// Query the catalog.
    pub fn search(&self, query: &SearchQuery) -> Vec<Arc<Item>> {
        SearchEngine::query(self.inner.catalog.as_ref(), query)
    }

    /// Query the store directly.
    pub async fn search_store(&self, query: &SearchQuery) -> Result<Vec<Item>, CoreError> {
        Ok(SearchEngine::query_repository(self.inner.repository.as_ref(), query).await?)
    }
}
