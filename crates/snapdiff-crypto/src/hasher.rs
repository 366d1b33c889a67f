use serde::Serialize;
use snapdiff_types::Fingerprint;

use crate::canonical::Canonical;

/// A source of content fingerprints for records.
///
/// Implementations must be deterministic: structurally equal canonical
/// encodings always yield the same fingerprint.
pub trait Fingerprinter: Send + Sync {
    /// Fingerprint a serializable record.
    fn fingerprint<T: Serialize + ?Sized>(&self, value: &T) -> Result<Fingerprint, HasherError>;
}

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so fingerprints produced for different purposes never
/// collide even when the encoded bytes are identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for snapshot records. Used by the diff engine by default.
    pub const RECORD: Self = Self {
        domain: "snapdiff-record-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> Fingerprint {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        Fingerprint::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value through its canonical encoding.
    ///
    /// The value is first lowered to a `serde_json::Value`, whose object maps
    /// keep their keys sorted, and then written out as compact JSON. Map-typed
    /// fields with unordered iteration (e.g. `HashMap`) therefore encode the
    /// same way on every call.
    ///
    /// Sorted keys rely on `serde_json` being built without its
    /// `preserve_order` feature. Cargo unifies features across the build, so a
    /// dependency that enables it makes `HashMap` fields order-sensitive.
    ///
    /// Non-finite floats encode as the strings `"NaN"`, `"Infinity"` and
    /// `"-Infinity"`, so they stay distinct from each other and from `None`.
    /// A string field holding one of those labels encodes the same as the
    /// matching float.
    pub fn hash_canonical<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<Fingerprint, HasherError> {
        let data = canonical_bytes(value)?;
        Ok(self.hash(&data))
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::RECORD
    }
}

impl Fingerprinter for ContentHasher {
    fn fingerprint<T: Serialize + ?Sized>(&self, value: &T) -> Result<Fingerprint, HasherError> {
        self.hash_canonical(value)
    }
}

/// Canonical encoding: JSON with sorted object keys, no whitespace, labelled
/// non-finite floats.
fn canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HasherError> {
    let value = serde_json::to_value(Canonical(value)).map_err(|e| HasherError::Serialization(e.to_string()))?;
    serde_json::to_vec(&value).map_err(|e| HasherError::Serialization(e.to_string()))
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Serialize)]
    struct Product {
        id: u32,
        name: String,
        department: String,
    }

    #[test]
    fn hash_is_deterministic() {
        let a = ContentHasher::RECORD.hash(b"hello world");
        let b = ContentHasher::RECORD.hash(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn different_domains_produce_different_hashes() {
        let data = b"same content";
        let custom = ContentHasher::new("my-custom-domain-v1");
        assert_ne!(ContentHasher::RECORD.hash(data), custom.hash(data));
    }

    #[test]
    fn default_is_record_domain() {
        assert_eq!(ContentHasher::default().domain(), "snapdiff-record-v1");
    }

    #[test]
    fn structurally_equal_records_share_a_fingerprint() {
        let a = Product {
            id: 1,
            name: "Chair".into(),
            department: "Home".into(),
        };
        let b = Product {
            id: 1,
            name: "Chair".into(),
            department: "Home".into(),
        };
        assert_eq!(
            ContentHasher::RECORD.fingerprint(&a).unwrap(),
            ContentHasher::RECORD.fingerprint(&b).unwrap()
        );
    }

    #[test]
    fn field_change_alters_fingerprint() {
        let a = Product {
            id: 1,
            name: "Chair".into(),
            department: "Home".into(),
        };
        let b = Product {
            id: 1,
            name: "Chair".into(),
            department: "Garden".into(),
        };
        assert_ne!(
            ContentHasher::RECORD.fingerprint(&a).unwrap(),
            ContentHasher::RECORD.fingerprint(&b).unwrap()
        );
    }

    #[test]
    fn map_insertion_order_does_not_matter() {
        let mut first = HashMap::new();
        let mut second = HashMap::new();
        for i in 0..64 {
            first.insert(format!("k{i}"), i);
        }
        for i in (0..64).rev() {
            second.insert(format!("k{i}"), i);
        }
        let ordered: BTreeMap<_, _> = first.clone().into_iter().collect();

        let h = ContentHasher::RECORD;
        let fp = h.hash_canonical(&first).unwrap();
        assert_eq!(fp, h.hash_canonical(&second).unwrap());
        assert_eq!(fp, h.hash_canonical(&ordered).unwrap());
    }

    #[test]
    fn non_string_map_keys_are_rejected() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple key");
        let err = ContentHasher::RECORD.hash_canonical(&map).unwrap_err();
        assert!(matches!(err, HasherError::Serialization(_)));
    }

    #[derive(Serialize)]
    struct Reading {
        id: u32,
        value: Option<f64>,
    }

    #[test]
    fn non_finite_floats_have_distinct_fingerprints() {
        let h = ContentHasher::RECORD;
        let fps: Vec<_> = [
            Some(f64::NAN),
            Some(f64::INFINITY),
            Some(f64::NEG_INFINITY),
            None,
            Some(0.0),
        ]
        .into_iter()
        .map(|value| h.fingerprint(&Reading { id: 1, value }).unwrap())
        .collect();

        for (i, a) in fps.iter().enumerate() {
            for b in &fps[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn nan_fingerprint_is_stable() {
        let h = ContentHasher::RECORD;
        let a = h.fingerprint(&Reading { id: 1, value: Some(f64::NAN) }).unwrap();
        let b = h.fingerprint(&Reading { id: 1, value: Some(-f64::NAN) }).unwrap();
        assert_eq!(a, b);
    }
}
