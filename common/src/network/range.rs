//! The search-space model: inclusive IPv4 ranges and their partitioning.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::SeekError;
use crate::network::addr;

/// An inclusive, contiguous range of IPv4 addresses.
///
/// The constructor enforces `first <= last`, so a range always holds at
/// least one address and size arithmetic cannot underflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    first: Ipv4Addr,
    last: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(first: Ipv4Addr, last: Ipv4Addr) -> Result<Self, SeekError> {
        if first > last {
            return Err(SeekError::InvalidRange { first, last });
        }
        Ok(Self { first, last })
    }

    /// Parses both endpoints and builds the range.
    pub fn parse_endpoints(first: &str, last: &str) -> Result<Self, SeekError> {
        Self::new(addr::parse(first)?, addr::parse(last)?)
    }

    /// The entire IPv4 address space.
    pub fn full() -> Self {
        Self {
            first: Ipv4Addr::new(0, 0, 0, 0),
            last: Ipv4Addr::new(255, 255, 255, 255),
        }
    }

    pub fn first(&self) -> Ipv4Addr {
        self.first
    }

    pub fn last(&self) -> Ipv4Addr {
        self.last
    }

    /// Number of addresses in the range.
    ///
    /// The full space holds 2^32 addresses, one past `u32::MAX`, so sizes
    /// are carried as `u64`.
    pub fn len(&self) -> u64 {
        u64::from(u32::from(self.last)) - u64::from(u32::from(self.first)) + 1
    }

    pub fn contains(&self, candidate: Ipv4Addr) -> bool {
        self.first <= candidate && candidate <= self.last
    }

    /// Iterates the range in ascending ordinal order.
    pub fn iter(self) -> impl Iterator<Item = Ipv4Addr> {
        let start: u32 = self.first.into();
        let end: u32 = self.last.into();
        (start..=end).map(Ipv4Addr::from)
    }

    /// Splits the range into at most `parts` contiguous sub-ranges in
    /// ascending order, covering it exactly with no gap or overlap.
    ///
    /// The first `parts - 1` sub-ranges hold `len / parts` addresses each
    /// and the final one takes the remainder. `parts` is clamped to the
    /// range size, so a small range may yield fewer sub-ranges than
    /// requested rather than empty ones.
    pub fn split(&self, parts: usize) -> Vec<Ipv4Range> {
        let size = self.len();
        let parts = (parts.max(1) as u64).min(size);
        let chunk = size / parts;
        let base = u64::from(u32::from(self.first));

        let mut out = Vec::with_capacity(parts as usize);
        for index in 0..parts {
            let lo = base + chunk * index;
            let hi = if index + 1 == parts {
                u64::from(u32::from(self.last))
            } else {
                lo + chunk - 1
            };
            out.push(Self {
                first: Ipv4Addr::from(lo as u32),
                last: Ipv4Addr::from(hi as u32),
            });
        }
        out
    }
}

impl fmt::Display for Ipv4Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

impl FromStr for Ipv4Range {
    type Err = SeekError;

    /// Parses the `"<first>-<last>"` form used by the cached range list.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((first, last)) = s.split_once('-') else {
            return Err(SeekError::MalformedAddress(s.to_string()));
        };
        Self::parse_endpoints(first.trim(), last.trim())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    fn range(first: &str, last: &str) -> Ipv4Range {
        Ipv4Range::parse_endpoints(first, last).unwrap()
    }

    #[test]
    fn new_rejects_inverted_endpoints() {
        let first = Ipv4Addr::new(10, 0, 0, 9);
        let last = Ipv4Addr::new(10, 0, 0, 1);
        assert_eq!(
            Ipv4Range::new(first, last),
            Err(SeekError::InvalidRange { first, last })
        );
    }

    #[test]
    fn len_counts_inclusively() {
        assert_eq!(range("10.0.0.7", "10.0.0.7").len(), 1);
        assert_eq!(range("10.0.0.0", "10.0.0.255").len(), 256);
        assert_eq!(Ipv4Range::full().len(), 1 << 32);
    }

    #[test]
    fn contains_is_inclusive_at_both_ends() {
        let r = range("10.0.0.10", "10.0.0.20");
        assert!(r.contains(Ipv4Addr::new(10, 0, 0, 10)));
        assert!(r.contains(Ipv4Addr::new(10, 0, 0, 20)));
        assert!(!r.contains(Ipv4Addr::new(10, 0, 0, 9)));
        assert!(!r.contains(Ipv4Addr::new(10, 0, 0, 21)));
    }

    #[test]
    fn iter_is_ascending_and_inclusive() {
        let collected: Vec<Ipv4Addr> = range("10.0.0.254", "10.0.1.1").iter().collect();
        assert_eq!(
            collected,
            vec![
                Ipv4Addr::new(10, 0, 0, 254),
                Ipv4Addr::new(10, 0, 0, 255),
                Ipv4Addr::new(10, 0, 1, 0),
                Ipv4Addr::new(10, 0, 1, 1),
            ]
        );
    }

    #[test]
    fn split_one_returns_the_range_unchanged() {
        let r = range("10.0.0.0", "10.255.255.255");
        assert_eq!(r.split(1), vec![r]);
    }

    /// The union of the parts must equal the range exactly: contiguous,
    /// disjoint, ascending.
    fn assert_exact_cover(r: Ipv4Range, parts: &[Ipv4Range]) {
        assert_eq!(parts.first().unwrap().first(), r.first());
        assert_eq!(parts.last().unwrap().last(), r.last());
        for pair in parts.windows(2) {
            let boundary = u32::from(pair[0].last()) + 1;
            assert_eq!(u32::from(pair[1].first()), boundary);
        }
        assert_eq!(parts.iter().map(|p| p.len()).sum::<u64>(), r.len());
    }

    #[test]
    fn split_covers_exactly_when_not_divisible() {
        let r = range("10.0.0.0", "10.0.0.9");
        let parts = r.split(3);
        assert_eq!(parts.len(), 3);
        assert_exact_cover(r, &parts);
        // 10 over 3 parts: two of floor(10/3) = 3, remainder 4 at the end.
        assert_eq!(
            parts.iter().map(|p| p.len()).collect::<Vec<u64>>(),
            vec![3, 3, 4]
        );
    }

    #[test]
    fn split_covers_exactly_when_divisible() {
        let r = range("10.0.0.0", "10.0.0.255");
        let parts = r.split(8);
        assert_eq!(parts.len(), 8);
        assert_exact_cover(r, &parts);
        assert!(parts.iter().all(|p| p.len() == 32));
    }

    #[test]
    fn split_clamps_to_small_ranges() {
        let r = range("10.0.0.1", "10.0.0.3");
        let parts = r.split(8);
        assert_eq!(parts.len(), 3);
        assert_exact_cover(r, &parts);
        assert!(parts.iter().all(|p| p.len() == 1));
    }

    #[test]
    fn split_handles_the_full_space() {
        let r = Ipv4Range::full();
        let parts = r.split(7);
        assert_eq!(parts.len(), 7);
        assert_exact_cover(r, &parts);
        let chunk = (1u64 << 32) / 7;
        assert!(parts[..6].iter().all(|p| p.len() == chunk));
        assert_eq!(parts[6].len(), (1u64 << 32) - 6 * chunk);
    }

    #[test]
    fn parses_hyphenated_lines() {
        assert_eq!(
            "1.0.16.0-1.0.16.255".parse::<Ipv4Range>(),
            Ok(range("1.0.16.0", "1.0.16.255"))
        );
        assert!("1.0.16.0".parse::<Ipv4Range>().is_err());
        assert!("1.0.16.0-1.0.16".parse::<Ipv4Range>().is_err());
        assert!("9.0.0.0-8.0.0.0".parse::<Ipv4Range>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let r = range("100.64.0.0", "100.127.255.255");
        assert_eq!(r.to_string().parse::<Ipv4Range>(), Ok(r));
    }
}
