//! Deterministic timers driven by frame time.
//!
//! The runtime has no wall clock. Callers pass the current frame time in
//! milliseconds, and due timers are returned in a stable order:
//! `(due_ms, id)`. Ids are never reused, so a stale [`TimerId`] can be
//! cancelled safely and simply reports `false`.

use tracing::trace;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    id: TimerId,
    due_ms: u64,
    /// `Some` for repeating timers.
    interval_ms: Option<u64>,
    payload: T,
}

#[derive(Debug)]
pub struct Timers<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T: Clone> Timers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot timer firing at `now_ms + delay_ms`.
    pub fn after(&mut self, now_ms: u64, delay_ms: u64, payload: T) -> TimerId {
        self.insert(now_ms.saturating_add(delay_ms), None, payload)
    }

    /// Repeating timer firing every `interval_ms` (at least 1) from `now_ms`.
    pub fn every(&mut self, now_ms: u64, interval_ms: u64, payload: T) -> TimerId {
        let interval_ms = interval_ms.max(1);
        self.insert(now_ms.saturating_add(interval_ms), Some(interval_ms), payload)
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let cancelled = self.entries.len() != before;
        if cancelled {
            trace!(?id, "timer cancelled");
        }
        cancelled
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cancels every pending timer, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    /// Pops every timer due at or before `now_ms`.
    ///
    /// One-shot timers are removed. A repeating timer fires once per call even
    /// if several intervals elapsed, and is rescheduled to its next due time
    /// after `now_ms`.
    pub fn advance(&mut self, now_ms: u64) -> Vec<(TimerId, T)> {
        let mut due: Vec<(u64, TimerId, T)> = Vec::new();
        self.entries.retain_mut(|e| {
            if e.due_ms > now_ms {
                return true;
            }
            due.push((e.due_ms, e.id, e.payload.clone()));
            match e.interval_ms {
                Some(interval) => {
                    let missed = (now_ms - e.due_ms) / interval + 1;
                    e.due_ms = e.due_ms.saturating_add(missed.saturating_mul(interval));
                    true
                }
                None => false,
            }
        });
        due.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        due.into_iter().map(|(_, id, payload)| (id, payload)).collect()
    }

    fn insert(&mut self, due_ms: u64, interval_ms: Option<u64>, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            id,
            due_ms,
            interval_ms,
            payload,
        });
        trace!(?id, due_ms, ?interval_ms, "timer armed");
        id
    }
}
