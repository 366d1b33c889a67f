//! The three-way change classification produced by a comparison.

use serde::{Deserialize, Serialize};

use crate::sink::ChangeSink;

/// The result of comparing a baseline snapshot with a current snapshot.
///
/// `changed` and `deleted` follow baseline order; `inserted` follows current
/// order. The stateless engine returns `CompareResult<&T>` borrowing from its
/// inputs; [`cloned`](CompareResult::cloned) produces an owned copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareResult<T> {
    /// Records present in the baseline whose key is absent from the current snapshot.
    pub deleted: Vec<T>,
    /// `(baseline, current)` pairs sharing a key but judged unequal.
    pub changed: Vec<(T, T)>,
    /// Records present in the current snapshot whose key is absent from the baseline.
    pub inserted: Vec<T>,
}

impl<T> CompareResult<T> {
    /// An empty classification.
    pub fn new() -> Self {
        Self {
            deleted: Vec::new(),
            changed: Vec::new(),
            inserted: Vec::new(),
        }
    }

    /// Returns `true` if the two snapshots were equivalent.
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.changed.is_empty() && self.inserted.is_empty()
    }

    /// Total number of classified records (a changed pair counts once).
    pub fn len(&self) -> usize {
        self.deleted.len() + self.changed.len() + self.inserted.len()
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    pub fn changed_count(&self) -> usize {
        self.changed.len()
    }

    pub fn inserted_count(&self) -> usize {
        self.inserted.len()
    }

    /// Record counts, suitable for logging or reporting.
    pub fn summary(&self) -> ChangeSummary {
        ChangeSummary {
            deleted: self.deleted.len(),
            changed: self.changed.len(),
            inserted: self.inserted.len(),
        }
    }

    /// Borrow every record, e.g. to [`replay`](CompareResult::replay) an owned result.
    pub fn borrowed(&self) -> CompareResult<&T> {
        CompareResult {
            deleted: self.deleted.iter().collect(),
            changed: self.changed.iter().map(|(old, new)| (old, new)).collect(),
            inserted: self.inserted.iter().collect(),
        }
    }
}

impl<T> Default for CompareResult<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompareResult<&'a T> {
    /// Clone every borrowed record into an owned result.
    pub fn cloned(&self) -> CompareResult<T>
    where
        T: Clone,
    {
        CompareResult {
            deleted: self.deleted.iter().map(|item| (*item).clone()).collect(),
            changed: self
                .changed
                .iter()
                .map(|(old, new)| ((*old).clone(), (*new).clone()))
                .collect(),
            inserted: self.inserted.iter().map(|item| (*item).clone()).collect(),
        }
    }

    /// Deliver every record to `sink`: changed pairs, then deleted, then inserted.
    ///
    /// Stops at the first callback error and returns it unchanged.
    pub fn replay<S>(&self, sink: &mut S) -> Result<(), S::Error>
    where
        S: ChangeSink<T> + ?Sized,
    {
        for (old, new) in &self.changed {
            sink.on_update(old, new)?;
        }
        for item in &self.deleted {
            sink.on_delete(item)?;
        }
        for item in &self.inserted {
            sink.on_insert(item)?;
        }
        Ok(())
    }
}

/// Counts of a [`CompareResult`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub deleted: usize,
    pub changed: usize,
    pub inserted: usize,
}

impl ChangeSummary {
    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.deleted == 0 && self.changed == 0 && self.inserted == 0
    }
}
