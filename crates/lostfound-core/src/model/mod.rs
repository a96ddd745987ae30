// ── Domain model ──
//
// Value types shared by the catalog, the reconciler, repositories and
// every front end.

pub mod item;
pub mod item_id;

pub use item::{
    ANONYMOUS_REPORTER, Category, Item, ItemStatus, ItemValidationError, NewItem, ReportType,
};
pub use item_id::ItemId;
