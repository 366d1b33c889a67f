//! Keyed snapshot comparison.
//!
//! Both snapshots are indexed by key, then the baseline is walked in order and
//! each key is looked up (and consumed) in the current index. Whatever is left
//! in the baseline index afterwards was deleted; whatever is left in the
//! current index was inserted. Time and space are O(n + m).

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;
use snapdiff_crypto::{ContentHasher, Fingerprinter};
use tracing::{debug, trace, warn};

use crate::config::{DiffConfig, DuplicateKeyPolicy};
use crate::error::{DiffError, DiffResult, Side};
use crate::result::CompareResult;

/// Stateless comparison engine.
///
/// Holds only configuration and the fingerprint provider used for the default
/// equality, so a single engine can be shared freely across threads.
#[derive(Clone, Debug, Default)]
pub struct DiffEngine<H = ContentHasher> {
    config: DiffConfig,
    hasher: H,
}

impl DiffEngine {
    /// Create an engine that fingerprints records with [`ContentHasher::RECORD`].
    pub fn new(config: DiffConfig) -> Self {
        Self {
            config,
            hasher: ContentHasher::RECORD,
        }
    }
}

impl<H: Fingerprinter> DiffEngine<H> {
    /// Create an engine with a custom fingerprint provider.
    pub fn with_hasher(config: DiffConfig, hasher: H) -> Self {
        Self { config, hasher }
    }

    /// The engine configuration.
    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Compare two snapshots, treating records as equal when their content
    /// fingerprints match.
    pub fn compare<'a, T, K, F>(
        &self,
        baseline: &'a [T],
        current: &'a [T],
        key_of: F,
    ) -> DiffResult<CompareResult<&'a T>>
    where
        T: Serialize,
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        self.partition(baseline, current, key_of, |old, new| {
            let old_fp = self.hasher.fingerprint(old)?;
            let new_fp = self.hasher.fingerprint(new)?;
            trace!(old = %old_fp.short_hex(), new = %new_fp.short_hex(), "compared fingerprints");
            Ok(old_fp == new_fp)
        })
    }

    /// Compare two snapshots with an explicit equality predicate.
    ///
    /// `equals` is only called for records that share a key and should be
    /// symmetric.
    pub fn compare_by<'a, T, K, F, E>(
        &self,
        baseline: &'a [T],
        current: &'a [T],
        key_of: F,
        equals: E,
    ) -> DiffResult<CompareResult<&'a T>>
    where
        K: Eq + Hash,
        F: Fn(&T) -> K,
        E: Fn(&T, &T) -> bool,
    {
        self.partition(baseline, current, key_of, |old, new| Ok(equals(old, new)))
    }

    fn partition<'a, T, K, F, E>(
        &self,
        baseline: &'a [T],
        current: &'a [T],
        key_of: F,
        mut equals: E,
    ) -> DiffResult<CompareResult<&'a T>>
    where
        K: Eq + Hash,
        F: Fn(&T) -> K,
        E: FnMut(&T, &T) -> DiffResult<bool>,
    {
        let mut unmatched_current = self.index(current, &key_of, Side::Current)?;
        let mut unmatched_baseline = self.index(baseline, &key_of, Side::Baseline)?;
        let mut changed = Vec::new();

        for item in baseline {
            let key = key_of(item);
            if let Some(pos) = unmatched_current.remove(&key) {
                let other = &current[pos];
                if !equals(item, other)? {
                    changed.push((item, other));
                }
                unmatched_baseline.remove(&key);
            }
        }

        let result = CompareResult {
            deleted: in_original_order(baseline, unmatched_baseline),
            changed,
            inserted: in_original_order(current, unmatched_current),
        };

        debug!(
            baseline = baseline.len(),
            current = current.len(),
            deleted = result.deleted.len(),
            changed = result.changed.len(),
            inserted = result.inserted.len(),
            "compared snapshots"
        );
        Ok(result)
    }

    /// Map each key to the position of its record. Later records overwrite
    /// earlier ones unless the policy rejects duplicates.
    fn index<T, K, F>(&self, items: &[T], key_of: &F, side: Side) -> DiffResult<HashMap<K, usize>>
    where
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        let mut index = HashMap::with_capacity(items.len());
        let mut collapsed = 0usize;

        for (position, item) in items.iter().enumerate() {
            if let Some(previous) = index.insert(key_of(item), position) {
                match self.config.duplicate_keys {
                    DuplicateKeyPolicy::Reject => {
                        return Err(DiffError::DuplicateKey {
                            side,
                            previous,
                            position,
                        });
                    }
                    DuplicateKeyPolicy::LastWins => collapsed += 1,
                }
            }
        }

        if collapsed > 0 {
            warn!(%side, collapsed, "duplicate record keys collapsed, last occurrence wins");
        }
        Ok(index)
    }
}

/// The records left in `index`, in the order they appear in `items`.
fn in_original_order<'a, T, K>(items: &'a [T], index: HashMap<K, usize>) -> Vec<&'a T> {
    let mut keep = vec![false; items.len()];
    for position in index.into_values() {
        keep[position] = true;
    }
    items
        .iter()
        .zip(keep)
        .filter_map(|(item, kept)| kept.then_some(item))
        .collect()
}

/// Compare two snapshots with a default-configured engine and fingerprint equality.
pub fn compare<'a, T, K, F>(
    baseline: &'a [T],
    current: &'a [T],
    key_of: F,
) -> DiffResult<CompareResult<&'a T>>
where
    T: Serialize,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    DiffEngine::new(DiffConfig::default()).compare(baseline, current, key_of)
}

/// Compare two snapshots with a default-configured engine and an explicit
/// equality predicate.
pub fn compare_by<'a, T, K, F, E>(
    baseline: &'a [T],
    current: &'a [T],
    key_of: F,
    equals: E,
) -> DiffResult<CompareResult<&'a T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
    E: Fn(&T, &T) -> bool,
{
    DiffEngine::new(DiffConfig::default()).compare_by(baseline, current, key_of, equals)
}
