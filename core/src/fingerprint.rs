//! The candidate test: MD5 over `name + dotted-quad`, compared against
//! the target id as a lowercase hex digest.
//!
//! The predicate is pure and holds no shared mutable state, so any number
//! of scanners can evaluate it concurrently on disjoint partitions.

use std::fmt::Write as _;
use std::net::Ipv4Addr;

const HEX: &[u8; 16] = b"0123456789abcdef";

#[derive(Debug, Clone)]
pub struct Fingerprint {
    name: String,
    id: String,
}

impl Fingerprint {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }

    /// Lowercase hex digest for one candidate address.
    pub fn digest(name: &str, candidate: Ipv4Addr) -> String {
        let mut buf = String::with_capacity(name.len() + 15);
        buf.push_str(name);
        let _ = write!(buf, "{candidate}");
        format!("{:x}", md5::compute(buf.as_bytes()))
    }

    /// Whether the id looks like an MD5 digest this predicate could ever
    /// match: 32 lowercase hex characters.
    pub fn id_is_canonical(&self) -> bool {
        self.id.len() == 32 && self.id.bytes().all(|b| HEX.contains(&b))
    }

    pub fn matches(&self, candidate: Ipv4Addr) -> bool {
        let mut buf = String::new();
        self.matches_with(&mut buf, candidate)
    }

    /// Same check as [`matches`], reusing `buf` as scratch so the scan
    /// loop performs no per-candidate heap allocation.
    pub fn matches_with(&self, buf: &mut String, candidate: Ipv4Addr) -> bool {
        buf.clear();
        buf.push_str(&self.name);
        let _ = write!(buf, "{candidate}");
        digest_eq_hex(md5::compute(buf.as_bytes()), &self.id)
    }
}

/// Exact comparison of a raw digest against a lowercase hex string,
/// without formatting the digest.
fn digest_eq_hex(digest: md5::Digest, id: &str) -> bool {
    let id = id.as_bytes();
    if id.len() != 32 {
        return false;
    }
    digest.0.iter().enumerate().all(|(i, byte)| {
        id[2 * i] == HEX[(byte >> 4) as usize] && id[2 * i + 1] == HEX[(byte & 0x0f) as usize]
    })
}
