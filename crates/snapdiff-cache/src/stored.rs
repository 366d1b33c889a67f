//! Type-erased baseline storage.

use std::any::{self, Any, TypeId};
use std::sync::Arc;

use crate::error::{CacheError, CacheResult};

/// A baseline snapshot with its element type erased.
///
/// The element `TypeId` is kept next to the records so that a read with the
/// wrong type fails with [`CacheError::TypeMismatch`] instead of a bad cast.
pub(crate) struct StoredSnapshot {
    records: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
    len: usize,
}

impl StoredSnapshot {
    pub(crate) fn new<T: Send + Sync + 'static>(records: Vec<T>) -> Self {
        Self {
            len: records.len(),
            records: Arc::new(records),
            type_id: TypeId::of::<T>(),
            type_name: any::type_name::<T>(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Shared handle to the records, if they are of type `T`.
    pub(crate) fn records<T: Send + Sync + 'static>(&self, key: &str) -> CacheResult<Arc<Vec<T>>> {
        let mismatch = || CacheError::TypeMismatch {
            key: key.to_string(),
            stored: self.type_name,
            requested: any::type_name::<T>(),
        };
        if self.type_id != TypeId::of::<T>() {
            return Err(mismatch());
        }
        Arc::clone(&self.records)
            .downcast::<Vec<T>>()
            .map_err(|_| mismatch())
    }
}
