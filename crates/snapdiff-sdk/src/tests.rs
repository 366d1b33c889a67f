//! End-to-end scenarios across the diff engine and the snapshot cache.

use serde::Serialize;

use crate::*;

#[derive(Clone, Debug, PartialEq, Serialize)]
struct Product {
    id: u32,
    name: String,
    department: String,
}

/// Deterministic stand-in for generated test data.
struct Catalog {
    next_id: u32,
}

impl Catalog {
    fn new() -> Self {
        Self { next_id: 0 }
    }

    fn generate(&mut self, n: usize) -> Vec<Product> {
        (0..n)
            .map(|_| {
                let id = self.next_id;
                self.next_id += 1;
                Product {
                    id,
                    name: format!("Product {id}"),
                    department: ["Toys", "Books", "Garden", "Tools"][id as usize % 4].to_string(),
                }
            })
            .collect()
    }
}

/// Ten records, then keys 0..=3 modified, 5..=7 removed and two appended.
fn scenario_a() -> (Vec<Product>, Vec<Product>) {
    let mut catalog = Catalog::new();
    let baseline = catalog.generate(10);
    let mut current = baseline.clone();
    for p in current.iter_mut().take(4) {
        p.department = "New Department".into();
    }
    current.retain(|p| !matches!(p.id, 5..=7));
    current.extend(catalog.generate(2));
    (baseline, current)
}

#[derive(Default)]
struct Counts {
    updated: usize,
    inserted: usize,
    deleted: usize,
}

impl ChangeSink<Product> for Counts {
    type Error = CacheError;

    fn on_update(&mut self, _: &Product, _: &Product) -> CacheResult<()> {
        self.updated += 1;
        Ok(())
    }

    fn on_insert(&mut self, _: &Product) -> CacheResult<()> {
        self.inserted += 1;
        Ok(())
    }

    fn on_delete(&mut self, _: &Product) -> CacheResult<()> {
        self.deleted += 1;
        Ok(())
    }
}

#[test]
fn scenario_a_stateless_compare() {
    let (baseline, current) = scenario_a();
    let result = compare(&baseline, &current, |p| p.id).unwrap();
    assert_eq!(
        result.summary(),
        ChangeSummary {
            deleted: 3,
            changed: 4,
            inserted: 2
        }
    );
}

#[test]
fn scenario_b_cache_reads_do_not_advance_baseline() {
    let (baseline, current) = scenario_a();
    let cache = SnapshotCache::new();
    cache.add("K1", &baseline).unwrap();

    let first = cache.get_changes("K1", &current, |p| p.id).unwrap();
    let second = cache.get_changes("K1", &current, |p| p.id).unwrap();

    for result in [&first, &second] {
        assert_eq!(result.deleted_count(), 3);
        assert_eq!(result.changed_count(), 4);
        assert_eq!(result.inserted_count(), 2);
    }
    assert_eq!(first, second);
}

#[test]
fn scenario_c_combinator_on_miss() {
    let cache = SnapshotCache::new();
    let current = Catalog::new().generate(5);

    let mut counts = Counts::default();
    get_changes_or_insert(&cache, "K2", &current, |p| p.id, &mut counts).unwrap();

    assert_eq!(counts.inserted, 5);
    assert_eq!(counts.updated, 0);
    assert_eq!(counts.deleted, 0);
    assert!(!cache.contains_key("K2").unwrap());
}

#[test]
fn scenario_d_duplicate_add_keeps_original() {
    let mut catalog = Catalog::new();
    let x = catalog.generate(3);
    let y = catalog.generate(4);

    let cache = SnapshotCache::new();
    cache.add("K1", &x).unwrap();
    assert_eq!(
        cache.add("K1", &y).unwrap_err(),
        CacheError::DuplicateKey { key: "K1".into() }
    );

    assert!(cache.get_changes("K1", &x, |p| p.id).unwrap().is_empty());
    let against_y = cache.get_changes("K1", &y, |p| p.id).unwrap();
    assert_eq!(against_y.deleted_count(), 3);
    assert_eq!(against_y.inserted_count(), 4);
}

#[test]
fn baseline_is_isolated_from_caller_mutation() {
    let (baseline, current) = scenario_a();
    let mut owned = baseline.clone();

    let cache = SnapshotCache::new();
    cache.add("K1", &owned).unwrap();
    let before = cache.get_changes("K1", &current, |p| p.id).unwrap();

    for p in &mut owned {
        p.name = "scribbled".into();
    }
    owned.truncate(1);

    let after = cache.get_changes("K1", &current, |p| p.id).unwrap();
    assert_eq!(before, after);
    assert_eq!(*cache.snapshot::<Product>("K1").unwrap(), baseline);
}

#[test]
fn callback_form_matches_result_form() {
    let (baseline, current) = scenario_a();
    let cache = SnapshotCache::new();
    cache.add("K1", &baseline).unwrap();

    let mut counts = Counts::default();
    cache
        .apply_changes("K1", &current, |p| p.id, &mut counts)
        .unwrap();
    let summary = cache.get_changes("K1", &current, |p| p.id).unwrap().summary();

    assert_eq!(counts.updated, summary.changed);
    assert_eq!(counts.deleted, summary.deleted);
    assert_eq!(counts.inserted, summary.inserted);

    let mut via_combinator = Counts::default();
    get_changes_or_insert(&cache, "K1", &current, |p| p.id, &mut via_combinator).unwrap();
    assert_eq!(via_combinator.updated, counts.updated);
    assert_eq!(via_combinator.deleted, counts.deleted);
    assert_eq!(via_combinator.inserted, counts.inserted);
}

#[test]
fn owned_result_replays_through_closures() {
    let (baseline, current) = scenario_a();
    let owned = compare(&baseline, &current, |p| p.id).unwrap().cloned();

    let mut deleted_ids = Vec::new();
    owned
        .borrowed()
        .replay(&mut FnSink::new(
            |_: &Product, _: &Product| {},
            |_: &Product| {},
            |p: &Product| deleted_ids.push(p.id),
        ))
        .unwrap();
    assert_eq!(deleted_ids, vec![5, 6, 7]);
}

#[test]
fn fingerprint_matches_content_hasher() {
    let record = Catalog::new().generate(1).remove(0);
    let fp: Fingerprint = ContentHasher::RECORD.fingerprint(&record).unwrap();
    let same = serde_json::to_value(&record).unwrap();
    assert_eq!(fp, ContentHasher::RECORD.hash_canonical(&same).unwrap());
}
