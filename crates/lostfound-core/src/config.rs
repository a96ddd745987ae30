// ── Runtime catalog configuration ──
//
// Describes how the subsystem numbers items and how often it reconciles.
// Never touches disk: front ends build a `CatalogConfig` (usually through
// `lostfound-config`) and hand it in.

use std::time::Duration;

/// Default reconciliation period.
pub const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_secs(5);

/// Default identifier prefix for lost & found reports.
pub const DEFAULT_ID_PREFIX: &str = "ITEM";

/// Default zero-padding of the identifier sequence (`ITEM001`).
pub const DEFAULT_ID_WIDTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// How often the reconciler pulls from the store. Zero disables the
    /// timer; explicit refresh requests still run.
    pub reconcile_interval: Duration,
    /// Prefix of every identifier this process allocates.
    pub id_prefix: String,
    /// Minimum number of digits in the sequence part of an identifier.
    pub id_width: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            reconcile_interval: DEFAULT_RECONCILE_INTERVAL,
            id_prefix: DEFAULT_ID_PREFIX.into(),
            id_width: DEFAULT_ID_WIDTH,
        }
    }
}
