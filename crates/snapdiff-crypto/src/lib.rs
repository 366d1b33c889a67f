//! Content hashing for snapdiff.
//!
//! Provides the default record equality: records are canonically encoded as
//! JSON with ordered object keys and hashed with domain-separated BLAKE3.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

mod canonical;
pub mod hasher;

pub use hasher::{ContentHasher, Fingerprinter, HasherError};
