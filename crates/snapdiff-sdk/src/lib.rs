//! High-level API for snapdiff.
//!
//! Detects which records of a keyed collection were inserted, changed or
//! deleted between two snapshots, either statelessly with [`compare`] /
//! [`compare_by`] or against a named baseline held by a [`SnapshotCache`].
//!
//! ```
//! use snapdiff_sdk::{compare, SnapshotCache};
//!
//! let before = vec![(1, "a"), (2, "b"), (3, "c")];
//! let after = vec![(1, "a"), (2, "B"), (4, "d")];
//!
//! let result = compare(&before, &after, |r| r.0).unwrap();
//! assert_eq!(result.deleted, vec![&(3, "c")]);
//! assert_eq!(result.changed, vec![(&(2, "b"), &(2, "B"))]);
//! assert_eq!(result.inserted, vec![&(4, "d")]);
//!
//! let cache = SnapshotCache::new();
//! cache.add("poll", &before).unwrap();
//! let cached = cache.get_changes("poll", &after, |r| r.0).unwrap();
//! assert_eq!(cached.summary(), result.summary());
//! ```

pub use snapdiff_cache::{
    get_changes_or_insert, get_changes_or_insert_by, CacheConfig, CacheError, CacheResult,
    FnSink, SnapshotCache,
};
pub use snapdiff_crypto::{ContentHasher, Fingerprinter, HasherError};
pub use snapdiff_diff::{
    compare, compare_by, ChangeSink, ChangeSummary, CompareResult, DiffConfig, DiffEngine,
    DiffError, DiffResult, DuplicateKeyPolicy, Side,
};
pub use snapdiff_types::Fingerprint;

#[cfg(test)]
mod tests;
