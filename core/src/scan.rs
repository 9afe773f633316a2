//! The sequential scanner: one partition, one thread, ascending order.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use ipseek_common::network::range::Ipv4Range;

/// Cooperative stop signal shared between the coordinator and its
/// scanners. Scanners poll it between candidates, never mid-predicate,
/// so cancellation latency is bounded by one predicate evaluation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Shared count of candidates examined so far, across all scanners.
/// Advisory only; progress reporting must never affect the result.
#[derive(Debug, Clone, Default)]
pub struct Progress(Arc<AtomicU64>);

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, examined: u64) {
        self.0.fetch_add(examined, Ordering::Relaxed);
    }

    pub fn examined(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// One partition plus the predicate evaluated over it.
///
/// Owned by exactly one scanner for its lifetime. The predicate is
/// `FnMut` so the owner can keep private scratch state (such as the
/// reusable candidate buffer) without sharing anything across scanners.
pub struct SearchTask<F> {
    range: Ipv4Range,
    predicate: F,
}

impl<F: FnMut(Ipv4Addr) -> bool> SearchTask<F> {
    pub fn new(range: Ipv4Range, predicate: F) -> Self {
        Self { range, predicate }
    }

    pub fn range(&self) -> Ipv4Range {
        self.range
    }
}

/// How a single partition scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The lowest candidate in the partition satisfying the predicate.
    Found(Ipv4Addr),
    /// Every candidate was examined and none matched.
    Exhausted,
    /// The cancel token fired before the partition was finished.
    Cancelled,
}

/// Candidates examined between flushes of the shared progress counter.
const PROGRESS_BATCH: u64 = 4096;

/// Walks the partition in ascending address order, returning on the
/// first match without evaluating any further candidate.
///
/// This is the CPU-bound hot path: per candidate it costs one
/// cancellation load, one predicate call, and a batched counter update.
pub fn scan<F>(mut task: SearchTask<F>, cancel: &CancelToken, progress: &Progress) -> ScanOutcome
where
    F: FnMut(Ipv4Addr) -> bool,
{
    let range = task.range();
    let mut pending = 0u64;

    for candidate in range.iter() {
        if cancel.is_cancelled() {
            progress.add(pending);
            return ScanOutcome::Cancelled;
        }
        pending += 1;
        if (task.predicate)(candidate) {
            progress.add(pending);
            return ScanOutcome::Found(candidate);
        }
        if pending == PROGRESS_BATCH {
            progress.add(pending);
            pending = 0;
        }
    }

    progress.add(pending);
    ScanOutcome::Exhausted
}
