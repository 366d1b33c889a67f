//! The snapshot cache.
//!
//! [`SnapshotCache`] keeps baselines in a `HashMap` behind a `RwLock`: reads
//! are shared, writes exclusive. Each diff runs on a shared handle to the
//! stored records after the read guard has been released, so a long
//! comparison never blocks other callers.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use snapdiff_diff::{ChangeSink, CompareResult, DiffEngine};
use tracing::debug;

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::stored::StoredSnapshot;

/// Serializes baseline copies across every cache in the process.
///
/// The guard protects no data, so a poisoned lock is simply taken over.
static CLONE_LOCK: Mutex<()> = Mutex::new(());

/// Named baseline snapshots, diffed against later snapshots on demand.
///
/// A baseline is stored once by [`add`](SnapshotCache::add) and compared
/// against by every subsequent read; reads never advance it.
pub struct SnapshotCache {
    entries: RwLock<HashMap<String, StoredSnapshot>>,
    engine: DiffEngine,
}

impl SnapshotCache {
    /// Create an empty cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create an empty cache.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            engine: DiffEngine::new(config.diff),
        }
    }

    // ---------------------------------------------------------------
    // Baseline management
    // ---------------------------------------------------------------

    /// Store an independent copy of `snapshot` under `key`.
    ///
    /// Fails with [`CacheError::DuplicateKey`] if `key` is already present;
    /// the existing baseline is left untouched.
    ///
    /// The copy is made with `Clone`, so the baseline is isolated from the
    /// caller only when `T`'s `Clone` is a deep copy. Fields such as
    /// `Arc<Mutex<_>>` are shared with the caller, and mutations through them
    /// show up in later comparisons.
    pub fn add<T>(&self, key: &str, snapshot: &[T]) -> CacheResult<()>
    where
        T: Clone + Send + Sync + 'static,
    {
        validate_key(key)?;
        if self.contains_key(key)? {
            return Err(CacheError::DuplicateKey {
                key: key.to_string(),
            });
        }

        let stored = StoredSnapshot::new(copy_records(snapshot));

        // Another caller may have added the key while the copy was made.
        let mut entries = self.write()?;
        match entries.entry(key.to_string()) {
            Entry::Occupied(_) => Err(CacheError::DuplicateKey {
                key: key.to_string(),
            }),
            Entry::Vacant(slot) => {
                debug!(key, records = stored.len(), element = stored.type_name(), "stored baseline");
                slot.insert(stored);
                Ok(())
            }
        }
    }

    /// Rebase an existing baseline onto a copy of `snapshot`.
    ///
    /// The element type may differ from the one previously stored. Isolation
    /// follows the same `Clone` rules as [`SnapshotCache::add`].
    pub fn replace<T>(&self, key: &str, snapshot: &[T]) -> CacheResult<()>
    where
        T: Clone + Send + Sync + 'static,
    {
        validate_key(key)?;
        if !self.contains_key(key)? {
            return Err(CacheError::KeyNotFound {
                key: key.to_string(),
            });
        }

        let stored = StoredSnapshot::new(copy_records(snapshot));

        let mut entries = self.write()?;
        let slot = entries.get_mut(key).ok_or_else(|| CacheError::KeyNotFound {
            key: key.to_string(),
        })?;
        debug!(key, records = stored.len(), element = stored.type_name(), "replaced baseline");
        *slot = stored;
        Ok(())
    }

    /// Drop the baseline stored under `key`. Returns `true` if one existed.
    pub fn remove(&self, key: &str) -> CacheResult<bool> {
        validate_key(key)?;
        let removed = self.write()?.remove(key).is_some();
        if removed {
            debug!(key, "removed baseline");
        }
        Ok(removed)
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Whether a baseline is stored under `key`.
    pub fn contains_key(&self, key: &str) -> CacheResult<bool> {
        validate_key(key)?;
        Ok(self.read()?.contains_key(key))
    }

    /// Shared, read-only handle to the baseline stored under `key`.
    pub fn snapshot<T>(&self, key: &str) -> CacheResult<Arc<Vec<T>>>
    where
        T: Send + Sync + 'static,
    {
        self.lookup(key)?.ok_or_else(|| CacheError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Number of stored baselines.
    pub fn len(&self) -> CacheResult<usize> {
        Ok(self.read()?.len())
    }

    /// Returns `true` if no baseline is stored.
    pub fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// All keys, sorted.
    pub fn keys(&self) -> CacheResult<Vec<String>> {
        let mut keys: Vec<String> = self.read()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    // ---------------------------------------------------------------
    // Diffing
    // ---------------------------------------------------------------

    /// Diff `current` against the baseline under `key` using content
    /// fingerprints as equality.
    pub fn get_changes<T, K, F>(
        &self,
        key: &str,
        current: &[T],
        key_of: F,
    ) -> CacheResult<CompareResult<T>>
    where
        T: Serialize + Clone + Send + Sync + 'static,
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        let baseline = self.snapshot::<T>(key)?;
        let result = self.engine.compare(baseline.as_slice(), current, key_of)?;
        Ok(result.cloned())
    }

    /// Diff `current` against the baseline under `key` with an explicit
    /// equality predicate.
    pub fn get_changes_by<T, K, F, E>(
        &self,
        key: &str,
        current: &[T],
        key_of: F,
        equals: E,
    ) -> CacheResult<CompareResult<T>>
    where
        T: Clone + Send + Sync + 'static,
        K: Eq + Hash,
        F: Fn(&T) -> K,
        E: Fn(&T, &T) -> bool,
    {
        let baseline = self.snapshot::<T>(key)?;
        let result = self
            .engine
            .compare_by(baseline.as_slice(), current, key_of, equals)?;
        Ok(result.cloned())
    }

    /// Diff `current` against the baseline under `key` and replay the result
    /// into `sink`: updates, then deletes, then inserts.
    ///
    /// Cache failures are reported before any callback runs. A callback error
    /// stops the replay and is returned as is.
    pub fn apply_changes<T, K, F, S>(
        &self,
        key: &str,
        current: &[T],
        key_of: F,
        sink: &mut S,
    ) -> Result<(), S::Error>
    where
        T: Serialize + Send + Sync + 'static,
        K: Eq + Hash,
        F: Fn(&T) -> K,
        S: ChangeSink<T> + ?Sized,
        S::Error: From<CacheError>,
    {
        let baseline = self.snapshot::<T>(key)?;
        let result = self
            .engine
            .compare(baseline.as_slice(), current, key_of)
            .map_err(CacheError::from)?;
        result.replay(sink)
    }

    /// [`apply_changes`](SnapshotCache::apply_changes) with an explicit
    /// equality predicate.
    pub fn apply_changes_by<T, K, F, E, S>(
        &self,
        key: &str,
        current: &[T],
        key_of: F,
        equals: E,
        sink: &mut S,
    ) -> Result<(), S::Error>
    where
        T: Send + Sync + 'static,
        K: Eq + Hash,
        F: Fn(&T) -> K,
        E: Fn(&T, &T) -> bool,
        S: ChangeSink<T> + ?Sized,
        S::Error: From<CacheError>,
    {
        let baseline = self.snapshot::<T>(key)?;
        let result = self
            .engine
            .compare_by(baseline.as_slice(), current, key_of, equals)
            .map_err(CacheError::from)?;
        result.replay(sink)
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    /// The baseline under `key`, or `None` if absent.
    pub(crate) fn lookup<T>(&self, key: &str) -> CacheResult<Option<Arc<Vec<T>>>>
    where
        T: Send + Sync + 'static,
    {
        validate_key(key)?;
        let entries = self.read()?;
        let records = entries
            .get(key)
            .map(|stored| stored.records::<T>(key))
            .transpose()?;
        Ok(records)
    }

    pub(crate) fn engine(&self) -> &DiffEngine {
        &self.engine
    }

    fn read(&self) -> CacheResult<RwLockReadGuard<'_, HashMap<String, StoredSnapshot>>> {
        self.entries
            .read()
            .map_err(|e| CacheError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> CacheResult<RwLockWriteGuard<'_, HashMap<String, StoredSnapshot>>> {
        self.entries
            .write()
            .map_err(|e| CacheError::LockPoisoned(e.to_string()))
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.entries.read().map(|e| e.len()).ok();
        f.debug_struct("SnapshotCache")
            .field("entry_count", &count)
            .field("engine", &self.engine)
            .finish()
    }
}

fn validate_key(key: &str) -> CacheResult<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidArgument(
            "cache key must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Deep copy of the caller's records, made under [`CLONE_LOCK`].
fn copy_records<T: Clone>(snapshot: &[T]) -> Vec<T> {
    let _guard = CLONE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    snapshot.to_vec()
}
