//! Persistent store contract and an in-memory implementation.
//!
//! The catalog is a cache of whatever an [`ItemRepository`] holds. Each call
//! owns its own connection or session for the duration of that call; nothing
//! is held across reconciliation ticks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::RepoError;
use crate::model::{Item, ItemId, ItemStatus};
use crate::search::SearchQuery;

/// Authoritative store of lost & found reports.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Persist a new report. Returns the identifier it was stored under.
    async fn insert(&self, item: &Item) -> Result<ItemId, RepoError>;

    /// Every `Active` report, most recently reported first; ties keep
    /// insertion order.
    async fn list_active(&self) -> Result<Vec<Item>, RepoError>;

    /// `Active` reports matching `query`, in `list_active` order.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Item>, RepoError>;

    /// Single report by identifier, whatever its status.
    async fn get(&self, id: &ItemId) -> Result<Option<Item>, RepoError>;

    /// Largest numeric suffix among identifiers starting with `prefix`,
    /// or 0 when there are none.
    async fn max_sequence(&self, prefix: &str) -> Result<u64, RepoError>;
}

/// In-memory [`ItemRepository`] for tests and local experiments.
///
/// Can be switched offline to exercise the transient-failure paths.
/// Nothing survives the process.
#[derive(Debug)]
pub struct MemoryRepository {
    items: RwLock<Vec<Item>>,
    available: AtomicBool,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle simulated availability. While offline every call fails with
    /// [`RepoError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Change the status of a stored report, e.g. when it is claimed.
    pub fn set_status(&self, id: &ItemId, status: ItemStatus) -> Result<(), RepoError> {
        self.ensure_available()?;
        let mut items = self.items.write().map_err(poison_err)?;
        let Some(item) = items.iter_mut().find(|i| &i.id == id) else {
            return Err(RepoError::InvalidData {
                id: id.to_string(),
                message: "no such record".into(),
            });
        };
        item.status = status;
        Ok(())
    }

    fn ensure_available(&self) -> Result<(), RepoError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RepoError::unavailable("memory repository is offline"))
        }
    }

    fn active_sorted(&self) -> Result<Vec<Item>, RepoError> {
        let mut active: Vec<Item> = self
            .items
            .read()
            .map_err(poison_err)?
            .iter()
            .filter(|i| i.status == ItemStatus::Active)
            .cloned()
            .collect();
        // Stable sort keeps insertion order among same-day reports.
        active.sort_by(|a, b| b.reported_on.cmp(&a.reported_on));
        Ok(active)
    }
}

fn poison_err<T>(_: PoisonError<T>) -> RepoError {
    RepoError::unavailable("memory repository lock poisoned")
}

#[async_trait]
impl ItemRepository for MemoryRepository {
    async fn insert(&self, item: &Item) -> Result<ItemId, RepoError> {
        self.ensure_available()?;
        let mut items = self.items.write().map_err(poison_err)?;
        if items.iter().any(|i| i.id == item.id) {
            return Err(RepoError::Conflict {
                id: item.id.clone(),
            });
        }
        items.push(item.clone());
        Ok(item.id.clone())
    }

    async fn list_active(&self) -> Result<Vec<Item>, RepoError> {
        self.ensure_available()?;
        self.active_sorted()
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Item>, RepoError> {
        self.ensure_available()?;
        Ok(self
            .active_sorted()?
            .into_iter()
            .filter(|i| query.matches(i))
            .collect())
    }

    async fn get(&self, id: &ItemId) -> Result<Option<Item>, RepoError> {
        self.ensure_available()?;
        Ok(self
            .items
            .read()
            .map_err(poison_err)?
            .iter()
            .find(|i| &i.id == id)
            .cloned())
    }

    async fn max_sequence(&self, prefix: &str) -> Result<u64, RepoError> {
        self.ensure_available()?;
        Ok(self
            .items
            .read()
            .map_err(poison_err)?
            .iter()
            .filter_map(|i| i.id.sequence(prefix))
            .max()
            .unwrap_or(0))
    }
}
