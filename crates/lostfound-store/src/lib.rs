//! SQLite persistence for lost & found reports.
//!
//! [`SqliteRepository`] implements [`lostfound_core::ItemRepository`] over
//! one database file. The schema is versioned through `PRAGMA user_version`
//! and migrated forward on open.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::StoreError;
pub use repository::SqliteRepository;
pub use schema::latest_version;
