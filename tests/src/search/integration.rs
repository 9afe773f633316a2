#![cfg(test)]
use std::io::Write as _;
use std::net::Ipv4Addr;

use ipseek_common::network::range::Ipv4Range;
use ipseek_core::fingerprint::Fingerprint;
use ipseek_core::scan::{CancelToken, Progress};
use ipseek_core::search::{self, SearchOutcome};
use ipseek_core::source::RangeList;

/// md5("alice" + "10.0.0.7")
const ALICE_ID: &str = "91b216eb4dba268bc24e90520f6fbcb6";

fn range(first: &str, last: &str) -> Ipv4Range {
    Ipv4Range::parse_endpoints(first, last).unwrap()
}

/// The documented end-to-end example: searching the /24 that contains the
/// preimage must return it, whatever the concurrency.
#[test]
fn full_mode_finds_the_documented_preimage() {
    let fingerprint = Fingerprint::new("alice", ALICE_ID);
    let searched = range("10.0.0.0", "10.0.0.255");
    let outcome = search::race(
        searched,
        &fingerprint,
        4,
        &Progress::new(),
        &CancelToken::new(),
    );
    let SearchOutcome::Found(addr) = outcome else {
        panic!("expected a match, got {outcome:?}");
    };
    assert_eq!(addr, Ipv4Addr::new(10, 0, 0, 7));
    assert!(searched.contains(addr));
}

/// The sibling /24 without the preimage must come back empty, and only
/// after all 256 candidates were examined.
#[test]
fn full_mode_proves_a_miss_by_exhaustion() {
    let fingerprint = Fingerprint::new("alice", ALICE_ID);
    let progress = Progress::new();
    let outcome = search::race(
        range("10.0.1.0", "10.0.1.255"),
        &fingerprint,
        4,
        &progress,
        &CancelToken::new(),
    );
    assert_eq!(outcome, SearchOutcome::Exhausted);
    assert_eq!(progress.examined(), 256);
}

/// Restricted mode end to end: cache file on disk, header line, ranges
/// processed in order, match found in a later range.
#[test]
fn restricted_mode_searches_the_cached_list() {
    let mut cache = tempfile::NamedTempFile::new().unwrap();
    write!(
        cache,
        "# ranges\n\
         10.0.1.0-10.0.1.255\n\
         10.0.0.0-10.0.0.255\n"
    )
    .unwrap();

    let list = RangeList::new(cache.path(), "http://invalid.invalid/");
    list.ensure(false).unwrap();
    let ranges = list.load().unwrap();

    let fingerprint = Fingerprint::new("alice", ALICE_ID);
    let progress = Progress::new();
    let outcome = search::race_list(
        &ranges,
        &fingerprint,
        2,
        &progress,
        &CancelToken::new(),
    );
    assert_eq!(outcome, SearchOutcome::Found(Ipv4Addr::new(10, 0, 0, 7)));
    // The whole first range plus the winning partition's prefix.
    assert!(progress.examined() >= 256);
}

/// A pre-cancelled search must not claim the space was exhausted.
#[test]
fn cancelled_searches_are_reported_as_inconclusive() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let fingerprint = Fingerprint::new("alice", ALICE_ID);
    let outcome = search::race(
        range("10.0.1.0", "10.0.1.255"),
        &fingerprint,
        4,
        &Progress::new(),
        &cancel,
    );
    assert_eq!(outcome, SearchOutcome::Indeterminate);
}
