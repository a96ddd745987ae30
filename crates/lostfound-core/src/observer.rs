// ── Catalog observers ──
//
// Consumers that want a push after each reconciliation. The reconciler
// hands every observer the same immutable snapshot; anything owned by a
// UI thread should forward it through a channel rather than render inline.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::Snapshot;

/// Receives a fresh snapshot after every successful merge.
///
/// Called on the reconciler's task; implementations must return quickly.
pub trait CatalogObserver: Send + Sync {
    fn on_catalog_changed(&self, snapshot: &Snapshot);
}

impl<F> CatalogObserver for F
where
    F: Fn(&Snapshot) + Send + Sync,
{
    fn on_catalog_changed(&self, snapshot: &Snapshot) {
        self(snapshot);
    }
}

/// Observer that republishes snapshots on a `watch` channel.
///
/// Lets any number of async consumers pick up the latest snapshot on their
/// own schedule via [`SnapshotStream`].
pub struct WatchObserver {
    tx: watch::Sender<Snapshot>,
}

impl WatchObserver {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(Vec::new()));
        Self { tx }
    }

    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.tx.subscribe())
    }
}

impl Default for WatchObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogObserver for WatchObserver {
    fn on_catalog_changed(&self, snapshot: &Snapshot) {
        // `send_replace` updates unconditionally, even with zero receivers.
        self.tx.send_replace(Arc::clone(snapshot));
    }
}

/// One consumer's view of the snapshots a [`WatchObserver`] publishes.
///
/// Keeps the snapshot it last handed out, so a render loop can redraw
/// from [`current`](Self::current) without waiting on the reconciler.
pub struct SnapshotStream {
    last_seen: Snapshot,
    updates: watch::Receiver<Snapshot>,
}

impl SnapshotStream {
    pub(crate) fn new(updates: watch::Receiver<Snapshot>) -> Self {
        let last_seen = Arc::clone(&updates.borrow());
        Self { last_seen, updates }
    }

    /// Catalog contents as of subscribing or the last [`changed`](Self::changed).
    pub fn current(&self) -> &Snapshot {
        &self.last_seen
    }

    /// Whatever the reconciler published most recently, seen or not.
    pub fn latest(&self) -> Snapshot {
        Arc::clone(&self.updates.borrow())
    }

    /// Block until the next reconciliation publishes, then remember and
    /// return that snapshot. `None` after the observer is gone.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.updates.changed().await.ok()?;
        self.last_seen = Arc::clone(&self.updates.borrow_and_update());
        Some(Arc::clone(&self.last_seen))
    }

    /// Publications after this point as a [`Stream`]; the snapshot already
    /// in [`current`](Self::current) is not repeated.
    pub fn into_stream(self) -> SnapshotWatchStream {
        SnapshotWatchStream {
            inner: WatchStream::from_changes(self.updates),
        }
    }
}

/// Catalog snapshots, one per reconciliation published after subscribing.
pub struct SnapshotWatchStream {
    inner: WatchStream<Snapshot>,
}

impl Stream for SnapshotWatchStream {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
