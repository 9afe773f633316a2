use std::net::Ipv4Addr;

use thiserror::Error;

/// Errors shared across the ipseek workspace.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeekError {
    /// The text is not a dotted-quad IPv4 address.
    #[error("malformed IPv4 address: '{0}'")]
    MalformedAddress(String),
    /// Range endpoints are inverted.
    #[error("invalid range: {first} is above {last}")]
    InvalidRange { first: Ipv4Addr, last: Ipv4Addr },
    /// The candidate range list is missing or could not be fetched.
    #[error("candidate list unavailable: {0}")]
    SourceUnavailable(String),
    /// A scanner terminated abnormally, leaving its partition unfinished.
    #[error("scanner #{index} failed: {reason}")]
    WorkerFailure { index: usize, reason: String },
}
