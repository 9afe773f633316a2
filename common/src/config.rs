use crate::network::range::Ipv4Range;

/// Which candidate space a run searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// One contiguous range, partitioned across all scanners at once.
    Full(Ipv4Range),
    /// The cached range list, processed line by line.
    Restricted,
}

/// Validated configuration for one search run.
///
/// Built eagerly from the command line before any scanner starts, so
/// argument problems surface before concurrent work begins.
#[derive(Debug, Clone)]
pub struct Config {
    /// The name the fingerprint was derived from.
    pub name: String,
    /// The target fingerprint, a lowercase hex digest.
    pub id: String,
    pub mode: SearchMode,
    /// Refresh the cached range list before a restricted search.
    pub refresh: bool,
    /// Number of concurrent scanners, at least 1.
    pub workers: usize,
}
