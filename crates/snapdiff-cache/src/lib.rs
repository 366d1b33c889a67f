//! Baseline snapshot cache for snapdiff.
//!
//! A [`SnapshotCache`] keeps one baseline snapshot per string key and diffs
//! later snapshots against it on demand, either returning a
//! [`CompareResult`](snapdiff_diff::CompareResult) or replaying it through a
//! [`ChangeSink`](snapdiff_diff::ChangeSink).
//!
//! # Design Rules
//!
//! 1. A stored baseline is an independent copy of the caller's records.
//! 2. Baselines are never advanced by reads; only `replace` rebases.
//! 3. Snapshots of different element types share one cache; the element type
//!    is checked on every read.
//! 4. Validation happens before any mutation or diff work.

pub mod cache;
pub mod combinators;
pub mod config;
pub mod error;
pub mod sink;
mod stored;

pub use cache::SnapshotCache;
pub use combinators::{get_changes_or_insert, get_changes_or_insert_by};
pub use config::CacheConfig;
pub use error::{CacheError, CacheResult};
pub use sink::FnSink;
