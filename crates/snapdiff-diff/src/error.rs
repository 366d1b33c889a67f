//! Error types for the diff crate.

use std::fmt;

use serde::{Deserialize, Serialize};
use snapdiff_crypto::HasherError;

/// Which snapshot of a comparison a record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Baseline,
    Current,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Baseline => f.write_str("baseline"),
            Side::Current => f.write_str("current"),
        }
    }
}

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// A record could not be canonically encoded for the default equality.
    #[error("fingerprint error: {0}")]
    Fingerprint(#[from] HasherError),

    /// Two records in one snapshot share a key and the engine rejects duplicates.
    #[error("duplicate record key in {side} snapshot at positions {previous} and {position}")]
    DuplicateKey {
        side: Side,
        previous: usize,
        position: usize,
    },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
