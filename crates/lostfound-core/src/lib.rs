//! Concurrent lost & found catalog between a persistent store and UI consumers.
//!
//! - **[`Catalog`]**: Dual-indexed (by identifier and by category) in-memory
//!   set of [`Item`]s behind one mutex. Additive, idempotent writes and
//!   copy-out snapshot reads.
//!
//! - **[`Reconciler`]**: Background tokio task that pulls
//!   [`ItemRepository::list_active`] on a fixed period, merges the batch into
//!   the catalog, then notifies every [`CatalogObserver`]. Start/stop is
//!   idempotent; stop joins the task after any in-flight cycle.
//!
//! - **[`SearchEngine`]**: Stateless text + category + report-type filter
//!   over any [`ItemSource`], or delegated to the store.
//!
//! - **[`LostAndFound`]**: Facade owning all of the above plus the
//!   identifier [`IdSequence`]; the write path validates, persists, then
//!   adds to the catalog.

pub mod config;
pub mod error;
pub mod lost_and_found;
pub mod model;
pub mod observer;
pub mod reconciler;
pub mod repository;
pub mod search;
pub mod sequence;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::CatalogConfig;
pub use error::{CatalogError, CoreError, RepoError};
pub use lost_and_found::LostAndFound;
pub use model::{Category, Item, ItemId, ItemStatus, ItemValidationError, NewItem, ReportType};
pub use observer::{CatalogObserver, SnapshotStream, WatchObserver};
pub use reconciler::{CycleReport, Reconciler, ReconcilerHealth, ReconcilerState};
pub use repository::{ItemRepository, MemoryRepository};
pub use search::{ItemSource, SearchEngine, SearchQuery};
pub use sequence::IdSequence;
pub use store::{AddOutcome, Catalog, Snapshot};
