//! Dotted-quad parsing helpers.
//!
//! An address is a 32-bit ordinal; `Ipv4Addr` already carries the exact,
//! total conversion in both directions (`u32::from` / `Ipv4Addr::from`),
//! so this module only adds the error mapping for user-supplied text.

use std::net::Ipv4Addr;

use crate::error::SeekError;

/// Parses a dotted-quad string into an address.
///
/// Accepts exactly four dot-separated decimal octets in `0..=255`;
/// anything else is a [`SeekError::MalformedAddress`].
pub fn parse(text: &str) -> Result<Ipv4Addr, SeekError> {
    text.parse::<Ipv4Addr>()
        .map_err(|_| SeekError::MalformedAddress(text.to_string()))
}
