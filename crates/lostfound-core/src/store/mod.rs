// ── In-memory catalog ──
//
// The only shared mutable state in the subsystem.

mod catalog;

use std::sync::Arc;

use crate::model::Item;

pub use catalog::{AddOutcome, Catalog};

/// Immutable point-in-time copy of the catalog, as pushed to observers.
pub type Snapshot = Arc<Vec<Arc<Item>>>;
