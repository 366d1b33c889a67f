use serde::{Deserialize, Serialize};
use snapdiff_diff::DiffConfig;

/// Configuration for a [`SnapshotCache`](crate::SnapshotCache).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Configuration of the engine used for every diff against a baseline.
    pub diff: DiffConfig,
}
