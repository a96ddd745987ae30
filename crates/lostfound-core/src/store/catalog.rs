// ── Dual-indexed item catalog ──
//
// Primary index (id -> item, insertion ordered) and secondary index
// (category -> items, insertion ordered) live behind one mutex so every
// `add` updates both or neither.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use tracing::error;

use crate::error::CatalogError;
use crate::model::{Category, Item, ItemId};

/// Result of a successful [`Catalog::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The identifier was new; both indices grew by one.
    Inserted,
    /// An identical record was already present; nothing changed.
    AlreadyPresent,
}

#[derive(Default)]
struct Indices {
    by_id: IndexMap<ItemId, Arc<Item>>,
    by_category: HashMap<Category, Vec<Arc<Item>>>,
    /// Bumped on every insertion.
    version: u64,
}

/// Thread-safe in-memory view of every known item.
///
/// Reads copy `Arc` handles out of the critical section, so the lock is
/// held only for as long as the copy takes. Callers never see a borrow
/// into the indices.
#[derive(Default)]
pub struct Catalog {
    indices: Mutex<Indices>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item into both indices.
    ///
    /// Re-adding an identical record is a no-op. A different record under
    /// an existing identifier is refused and nothing is mutated.
    pub fn add(&self, item: Item) -> Result<AddOutcome, CatalogError> {
        let mut indices = self.lock();

        if let Some(existing) = indices.by_id.get(&item.id) {
            if **existing == item {
                return Ok(AddOutcome::AlreadyPresent);
            }
            let id = item.id.clone();
            drop(indices);
            error!(%id, "refusing conflicting record for an existing identifier");
            return Err(CatalogError::DuplicateIdentifier { id });
        }

        let item = Arc::new(item);
        indices
            .by_category
            .entry(item.category)
            .or_default()
            .push(Arc::clone(&item));
        indices.by_id.insert(item.id.clone(), item);
        indices.version += 1;

        Ok(AddOutcome::Inserted)
    }

    /// Every item in insertion order, as an independent copy.
    pub fn all_items(&self) -> Vec<Arc<Item>> {
        self.lock().by_id.values().cloned().collect()
    }

    /// Items of one category in insertion order. Empty when none exist.
    pub fn items_by_category(&self, category: Category) -> Vec<Arc<Item>> {
        self.lock()
            .by_category
            .get(&category)
            .cloned()
            .unwrap_or_default()
    }

    /// Point lookup by identifier.
    pub fn find(&self, id: &ItemId) -> Option<Arc<Item>> {
        self.lock().by_id.get(id).cloned()
    }

    /// Number of items per non-empty category, read in one critical section.
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        self.lock()
            .by_category
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(category, bucket)| (*category, bucket.len()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().by_id.is_empty()
    }

    /// Monotonic counter of insertions. Equal versions mean equal contents.
    pub fn version(&self) -> u64 {
        self.lock().version
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Both indices are updated before any code that could panic runs, so
    /// a poisoned lock still guards a consistent pair.
    fn lock(&self) -> MutexGuard<'_, Indices> {
        self.indices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
