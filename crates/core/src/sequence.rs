//! Sequence numbers for upsert ordering
//!
//! The Import API resolves conflicting upserts for the same key by sequence
//! number. Values track wall-clock milliseconds when the clock moves forward
//! and fall back to `last + 1` when it stalls or steps backwards.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock milliseconds
pub trait Clock: Send + Sync {
    /// Milliseconds since the UNIX epoch.
    fn now_millis(&self) -> i64;
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|dur| dur.as_millis() as i64)
            .unwrap_or_default()
    }
}

/// Manually driven clock for deterministic tests
///
/// Clones share the same time, so a test can hold one handle while the
/// generator owns another.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    millis: Arc<AtomicI64>,
}

impl MockClock {
    /// Clock frozen at `millis`.
    pub fn new(millis: i64) -> Self {
        Self { millis: Arc::new(AtomicI64::new(millis)) }
    }

    /// Jump to an absolute time, backwards included.
    pub fn set_millis(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    /// Move forward by `delta` milliseconds.
    pub fn advance_millis(&self, delta: i64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Strictly increasing sequence numbers, one generator per client
///
/// Safe to share between tasks: the update is a compare-and-swap loop, so
/// concurrent callers never observe the same or a smaller value.
pub struct SequenceGenerator {
    last: AtomicI64,
    clock: Arc<dyn Clock>,
}

impl SequenceGenerator {
    /// Generator driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Generator driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { last: AtomicI64::new(0), clock }
    }

    /// Next sequence number: `max(last + 1, now_millis)`.
    pub fn next_sequence(&self) -> i64 {
        let now = self.clock.now_millis();
        let candidate = |last: i64| last.saturating_add(1).max(now);

        let previous = match self.last.fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(candidate(last))
        }) {
            Ok(previous) | Err(previous) => previous,
        };

        candidate(previous)
    }

    /// Last value handed out, `0` before the first call.
    pub fn last(&self) -> i64 {
        self.last.load(Ordering::Acquire)
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SequenceGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceGenerator").field("last", &self.last()).finish_non_exhaustive()
    }
}
