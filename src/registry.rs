use crate::constants::palette_color;
use crate::models::{Loop, LoopDraft};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// In-memory, append-only list of accepted loops in creation order.
///
/// Ids and colours come from a creation counter that only ever grows, so the
/// Nth loop created gets `LOOP_PALETTE[N % 5]` no matter what the list
/// looks like when it is appended.
#[derive(Default)]
pub struct LoopRegistry {
    loops: Mutex<Vec<Loop>>,
    created: AtomicU64,
}

impl LoopRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next id and colour to `draft` and store it.
    /// Returns the stored record.
    pub fn append(&self, draft: LoopDraft) -> Loop {
        let mut loops = self.lock();
        // Incremented under the list lock so ids follow insertion order.
        let id = self.created.fetch_add(1, Ordering::SeqCst);

        let record = Loop {
            id,
            origin_address: draft.origin_address,
            origin: draft.origin,
            requested_distance_km: draft.requested_distance_km,
            actual_distance_km: draft.path.distance_km,
            color: palette_color(id).to_string(),
            path: draft.path,
        };
        loops.push(record.clone());

        tracing::debug!(
            loop_id = id,
            color = %record.color,
            "Registered loop #{} ({:.2}km)",
            id,
            record.actual_distance_km
        );
        record
    }

    pub fn all(&self) -> Vec<Loop> {
        self.lock().clone()
    }

    /// The last `n` loops, oldest first.
    pub fn recent(&self, n: usize) -> Vec<Loop> {
        let loops = self.lock();
        let start = loops.len().saturating_sub(n);
        loops[start..].to_vec()
    }

    /// Ids are positions in the list.
    pub fn get(&self, id: u64) -> Option<Loop> {
        let index = usize::try_from(id).ok()?;
        self.lock().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Loops ever created; the next loop gets this id.
    pub fn created_count(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Loop>> {
        self.loops.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
