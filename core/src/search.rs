//! The parallel search coordinator.
//!
//! Partitions a range across worker threads and races them to the first
//! match. Partitions are disjoint, so at most one scanner can ever find a
//! match for a given `(name, id)` pair; the first result to arrive wins
//! and the remaining scanners are cancelled best-effort.

use std::any::Any;
use std::net::Ipv4Addr;
use std::thread;

use crossbeam_channel::unbounded;
use tracing::{debug, info, warn};

use ipseek_common::error::SeekError;
use ipseek_common::network::range::Ipv4Range;

use crate::fingerprint::Fingerprint;
use crate::scan::{CancelToken, Progress, ScanOutcome, SearchTask, scan};

/// Final outcome of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The preimage of the target id.
    Found(Ipv4Addr),
    /// Every candidate in every assigned partition was examined.
    Exhausted,
    /// No match was found, but at least one partition was never fully
    /// scanned (a worker failed or the search was cancelled), so the
    /// absence of a match is not proven.
    Indeterminate,
}

/// Races up to `workers` scanners over disjoint partitions of `range`,
/// testing candidates against `fingerprint`.
///
/// See [`race_with`] for the race semantics.
pub fn race(
    range: Ipv4Range,
    fingerprint: &Fingerprint,
    workers: usize,
    progress: &Progress,
    cancel: &CancelToken,
) -> SearchOutcome {
    race_with(
        range,
        || {
            let fingerprint = fingerprint.clone();
            let mut buf = String::with_capacity(64);
            move |candidate| fingerprint.matches_with(&mut buf, candidate)
        },
        workers,
        progress,
        cancel,
    )
}

/// The coordinator behind [`race`], generic over the predicate.
///
/// `make_predicate` is called once per partition on the coordinating
/// thread; each produced predicate is moved into its own scanner, so
/// per-scanner scratch state is never shared.
///
/// Blocks until the first scanner reports a match, then fires the cancel
/// token and adopts that result; losers may run for up to one more
/// predicate evaluation and their results are discarded. With no match
/// the call returns only once every scanner has finished, and reports
/// [`SearchOutcome::Exhausted`] only if all of them completed cleanly:
/// a panicked scanner loses its partition, never its siblings, and turns
/// a would-be miss into [`SearchOutcome::Indeterminate`].
pub fn race_with<M, F>(
    range: Ipv4Range,
    mut make_predicate: M,
    workers: usize,
    progress: &Progress,
    cancel: &CancelToken,
) -> SearchOutcome
where
    M: FnMut() -> F,
    F: FnMut(Ipv4Addr) -> bool + Send + 'static,
{
    let parts = range.split(workers);
    debug!(
        "racing {} scanners over {} ({} addresses)",
        parts.len(),
        range,
        range.len()
    );

    let (tx, rx) = unbounded::<(usize, ScanOutcome)>();
    let mut handles = Vec::with_capacity(parts.len());
    let mut unresolved = 0usize;

    for (index, part) in parts.into_iter().enumerate() {
        let tx = tx.clone();
        let cancel = cancel.clone();
        let progress = progress.clone();
        let predicate = make_predicate();

        let spawned = thread::Builder::new()
            .name(format!("scan-{index}"))
            .spawn(move || {
                let task = SearchTask::new(part, predicate);
                let outcome = scan(task, &cancel, &progress);
                // The coordinator may have stopped listening after a win.
                let _ = tx.send((index, outcome));
            });

        match spawned {
            Ok(handle) => handles.push((index, handle)),
            Err(err) => {
                let failure = SeekError::WorkerFailure {
                    index,
                    reason: err.to_string(),
                };
                warn!("{failure}");
                unresolved += 1;
            }
        }
    }
    drop(tx);

    let spawned = handles.len();
    let mut winner = None;
    let mut clean_exits = 0usize;

    // The only suspension point: waiting on the first of N results.
    while let Ok((index, outcome)) = rx.recv() {
        match outcome {
            ScanOutcome::Found(addr) => {
                debug!("scanner #{index} hit {addr}, cancelling the others");
                winner = Some(addr);
                cancel.cancel();
                break;
            }
            ScanOutcome::Exhausted => clean_exits += 1,
            ScanOutcome::Cancelled => unresolved += 1,
        }
    }

    for (index, handle) in handles {
        if let Err(payload) = handle.join() {
            let failure = SeekError::WorkerFailure {
                index,
                reason: panic_reason(payload.as_ref()),
            };
            warn!("{failure}");
            unresolved += 1;
        }
    }

    if let Some(addr) = winner {
        // Partitions are sub-ranges of `range`, so any winner lies inside it.
        debug_assert!(range.contains(addr));
        return SearchOutcome::Found(addr);
    }
    if unresolved == 0 && clean_exits == spawned {
        SearchOutcome::Exhausted
    } else {
        SearchOutcome::Indeterminate
    }
}

/// Searches a list of ranges sequentially in list order, racing scanners
/// inside each range, and short-circuits on the first match.
///
/// Fan-out is applied within one range at a time: list order encodes
/// priority, and early ranges are ruled out completely before any work is
/// spent on later ones.
pub fn race_list(
    ranges: &[Ipv4Range],
    fingerprint: &Fingerprint,
    workers: usize,
    progress: &Progress,
    cancel: &CancelToken,
) -> SearchOutcome {
    let total: u64 = ranges.iter().map(|r| r.len()).sum();
    let mut incomplete = false;

    for range in ranges {
        if cancel.is_cancelled() {
            incomplete = true;
            break;
        }
        match race(*range, fingerprint, workers, progress, cancel) {
            SearchOutcome::Found(addr) => {
                info!("found in {range}");
                return SearchOutcome::Found(addr);
            }
            SearchOutcome::Exhausted => {
                let examined = progress.examined();
                info!(
                    "not found in {} ({} of {} addresses, {:.2}%)",
                    range,
                    examined,
                    total,
                    examined as f64 * 100.0 / total as f64
                );
            }
            SearchOutcome::Indeterminate => {
                warn!("range {range} was not fully scanned");
                incomplete = true;
            }
        }
    }

    if incomplete {
        SearchOutcome::Indeterminate
    } else {
        SearchOutcome::Exhausted
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panicked".to_string()
    }
}
