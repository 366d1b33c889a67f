use serde::{Deserialize, Serialize};

/// How the engine treats two records with the same key inside one snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// The later record replaces the earlier one in the key lookup.
    #[default]
    LastWins,
    /// The comparison fails with [`DiffError::DuplicateKey`](crate::DiffError::DuplicateKey).
    Reject,
}

/// Configuration for the diff engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Handling of repeated keys within a single snapshot.
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl DiffConfig {
    /// A configuration that fails on repeated keys instead of collapsing them.
    pub fn strict() -> Self {
        Self {
            duplicate_keys: DuplicateKeyPolicy::Reject,
        }
    }
}
