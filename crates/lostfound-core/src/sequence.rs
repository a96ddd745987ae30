// ── Identifier allocation ──
//
// One atomic counter per process, seeded once from the store's largest
// existing suffix. Concurrent writers each get a distinct value; the
// store's uniqueness constraint catches anything allocated elsewhere.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::model::ItemId;

#[derive(Debug)]
pub struct IdSequence {
    prefix: String,
    width: usize,
    next: AtomicU64,
}

impl IdSequence {
    /// `last` is the highest sequence already in use; allocation starts
    /// right after it.
    pub fn new(prefix: impl Into<String>, width: usize, last: u64) -> Self {
        Self {
            prefix: prefix.into(),
            width,
            next: AtomicU64::new(last.saturating_add(1)),
        }
    }

    /// Allocate the next identifier.
    pub fn next_id(&self) -> ItemId {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed);
        ItemId::from_sequence(&self.prefix, sequence, self.width)
    }

    /// Move past `id` if it carries our prefix and a sequence at or above
    /// the next one we would hand out.
    pub fn observe(&self, id: &ItemId) {
        if let Some(sequence) = id.sequence(&self.prefix) {
            self.next
                .fetch_max(sequence.saturating_add(1), Ordering::Relaxed);
        }
    }
}
