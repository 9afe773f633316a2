pub mod fingerprint;
pub mod scan;
pub mod search;
pub mod source;
