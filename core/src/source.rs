//! The candidate source provider for restricted searches: a cached,
//! line-oriented list of `first-last` ranges fetched from a public
//! country-allocation service.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use ipseek_common::error::SeekError;
use ipseek_common::network::range::Ipv4Range;

/// Where the range list is fetched from (IPv4 ranges allocated to Japan).
pub const DEFAULT_URL: &str = "https://ipvx.info/country/range/jp/p/";
/// Local cache of the fetched list.
pub const DEFAULT_CACHE: &str = "ipv4.txt";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct RangeList {
    path: PathBuf,
    url: String,
}

impl Default for RangeList {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE, DEFAULT_URL)
    }
}

impl RangeList {
    pub fn new(path: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
        }
    }

    /// Makes sure a cache file exists, fetching it when missing or when a
    /// refresh was requested. A refresh overwrites the previous cache and
    /// completes before any scanner reads the file.
    pub fn ensure(&self, refresh: bool) -> Result<(), SeekError> {
        if self.path.exists() && !refresh {
            return Ok(());
        }
        info!("downloading {} to {}", self.url, self.path.display());
        self.download()
    }

    fn download(&self) -> Result<(), SeekError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|err| SeekError::SourceUnavailable(err.to_string()))?;
        let body = client
            .get(&self.url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|err| SeekError::SourceUnavailable(err.to_string()))?;
        fs::write(&self.path, body)
            .map_err(|err| SeekError::SourceUnavailable(err.to_string()))?;
        Ok(())
    }

    /// Reads the cached list in file order.
    ///
    /// The first line is a header and always skipped, even when it parses
    /// as a range. A malformed line loses only itself: it is dropped with
    /// a warning. An unreadable file or an empty result is
    /// [`SeekError::SourceUnavailable`].
    pub fn load(&self) -> Result<Vec<Ipv4Range>, SeekError> {
        let file = fs::File::open(&self.path).map_err(|err| {
            SeekError::SourceUnavailable(format!("{}: {err}", self.path.display()))
        })?;

        let mut ranges = Vec::new();
        for (number, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|err| SeekError::SourceUnavailable(err.to_string()))?;
            if number == 0 {
                continue;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<Ipv4Range>() {
                Ok(range) => ranges.push(range),
                Err(err) => warn!("skipping line #{}: {err}", number + 1),
            }
        }

        if ranges.is_empty() {
            return Err(SeekError::SourceUnavailable(format!(
                "no usable ranges in {}",
                self.path.display()
            )));
        }
        Ok(ranges)
    }
}
