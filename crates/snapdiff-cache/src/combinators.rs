//! Diff-or-seed helpers on top of [`SnapshotCache`].
//!
//! These treat a missing baseline as an empty one: every record of the
//! current snapshot is reported as inserted. The cache itself is left alone;
//! callers that want later runs to diff against this snapshot must `add` it.

use std::hash::Hash;

use serde::Serialize;
use snapdiff_diff::ChangeSink;
use tracing::debug;

use crate::cache::SnapshotCache;
use crate::error::CacheError;

/// Replay the changes of `current` against the baseline under `key`, or
/// report every record as inserted if no baseline exists.
pub fn get_changes_or_insert<T, K, F, S>(
    cache: &SnapshotCache,
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
    let Some(baseline) = cache.lookup::<T>(key)? else {
        return insert_all(key, current, sink);
    };
    let result = cache
        .engine()
        .compare(baseline.as_slice(), current, key_of)
        .map_err(CacheError::from)?;
    result.replay(sink)
}

/// [`get_changes_or_insert`] with an explicit equality predicate.
pub fn get_changes_or_insert_by<T, K, F, E, S>(
    cache: &SnapshotCache,
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
    let Some(baseline) = cache.lookup::<T>(key)? else {
        return insert_all(key, current, sink);
    };
    let result = cache
        .engine()
        .compare_by(baseline.as_slice(), current, key_of, equals)
        .map_err(CacheError::from)?;
    result.replay(sink)
}

fn insert_all<T, S>(key: &str, current: &[T], sink: &mut S) -> Result<(), S::Error>
where
    S: ChangeSink<T> + ?Sized,
{
    debug!(key, records = current.len(), "no baseline, reporting all records as inserted");
    for item in current {
        sink.on_insert(item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FnSink;

    #[derive(Clone, Debug, PartialEq, Serialize)]
    struct Product {
        id: u32,
        department: String,
    }

    fn catalog(n: u32) -> Vec<Product> {
        (0..n)
            .map(|id| Product {
                id,
                department: "Toys".into(),
            })
            .collect()
    }

    /// Counts callbacks and can be told to fail on the n-th insert.
    #[derive(Default)]
    struct Tally {
        updated: usize,
        inserted: usize,
        deleted: usize,
        fail_on_insert: Option<usize>,
    }

    #[derive(Debug, PartialEq)]
    enum TallyError {
        Cache(CacheError),
        Refused(u32),
    }

    impl From<CacheError> for TallyError {
        fn from(e: CacheError) -> Self {
            TallyError::Cache(e)
        }
    }

    impl ChangeSink<Product> for Tally {
        type Error = TallyError;

        fn on_update(&mut self, _: &Product, _: &Product) -> Result<(), TallyError> {
            self.updated += 1;
            Ok(())
        }

        fn on_insert(&mut self, item: &Product) -> Result<(), TallyError> {
            if self.fail_on_insert == Some(self.inserted) {
                return Err(TallyError::Refused(item.id));
            }
            self.inserted += 1;
            Ok(())
        }

        fn on_delete(&mut self, _: &Product) -> Result<(), TallyError> {
            self.deleted += 1;
            Ok(())
        }
    }

    #[test]
    fn missing_key_reports_everything_inserted() {
        let cache = SnapshotCache::new();
        let list = catalog(10);

        let mut tally = Tally::default();
        get_changes_or_insert(&cache, "K1", &list, |p| p.id, &mut tally).unwrap();

        assert_eq!(tally.deleted, 0);
        assert_eq!(tally.updated, 0);
        assert_eq!(tally.inserted, list.len());
        assert!(!cache.contains_key("K1").unwrap());
    }

    #[test]
    fn present_key_diffs_against_baseline() {
        let cache = SnapshotCache::new();
        cache.add("K1", &catalog(4)).unwrap();
        let mut current = catalog(5);
        current[0].department = "Books".into();
        current.remove(1);

        let mut tally = Tally::default();
        get_changes_or_insert(&cache, "K1", &current, |p| p.id, &mut tally).unwrap();
        assert_eq!(tally.updated, 1);
        assert_eq!(tally.deleted, 1);
        assert_eq!(tally.inserted, 1);
    }

    #[test]
    fn predicate_variant_with_closure_sink() {
        let cache = SnapshotCache::new();
        cache.add("K1", &catalog(3)).unwrap();
        let mut current = catalog(3);
        current[2].department = "Books".into();

        let (mut updated, mut inserted, mut deleted) = (0, 0, 0);
        get_changes_or_insert_by(
            &cache,
            "K1",
            &current,
            |p| p.id,
            |a, b| a.department == b.department,
            &mut FnSink::new(
                |_: &Product, _: &Product| updated += 1,
                |_: &Product| inserted += 1,
                |_: &Product| deleted += 1,
            ),
        )
        .unwrap();
        assert_eq!((updated, inserted, deleted), (1, 0, 0));

        // Same call against an absent key seeds nothing and inserts all.
        let mut inserted_fresh = 0;
        get_changes_or_insert_by(
            &cache,
            "K2",
            &current,
            |p| p.id,
            |a, b| a == b,
            &mut FnSink::new(
                |_: &Product, _: &Product| {},
                |_: &Product| inserted_fresh += 1,
                |_: &Product| {},
            ),
        )
        .unwrap();
        assert_eq!(inserted_fresh, 3);
    }

    #[test]
    fn sink_error_propagates_unchanged() {
        let cache = SnapshotCache::new();
        let mut tally = Tally {
            fail_on_insert: Some(2),
            ..Default::default()
        };
        let err = get_changes_or_insert(&cache, "K1", &catalog(5), |p| p.id, &mut tally).unwrap_err();
        assert_eq!(err, TallyError::Refused(2));
        assert_eq!(tally.inserted, 2);
    }

    #[test]
    fn type_mismatch_is_reported_through_sink_error() {
        let cache = SnapshotCache::new();
        cache.add("K1", &[1u8, 2]).unwrap();

        let mut tally = Tally::default();
        let err = get_changes_or_insert(&cache, "K1", &catalog(1), |p| p.id, &mut tally).unwrap_err();
        assert!(matches!(
            err,
            TallyError::Cache(CacheError::TypeMismatch { .. })
        ));
        assert_eq!(tally.inserted, 0);
    }
}
