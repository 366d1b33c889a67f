use snapdiff_diff::ChangeSink;

use crate::error::CacheError;

/// A [`ChangeSink`] built from three closures.
///
/// The closures cannot fail; the sink's error type is [`CacheError`] so that
/// cache lookups and the replay share one error channel.
pub struct FnSink<U, I, D> {
    on_update: U,
    on_insert: I,
    on_delete: D,
}

impl<U, I, D> FnSink<U, I, D> {
    pub fn new<T>(on_update: U, on_insert: I, on_delete: D) -> Self
    where
        U: FnMut(&T, &T),
        I: FnMut(&T),
        D: FnMut(&T),
    {
        Self {
            on_update,
            on_insert,
            on_delete,
        }
    }
}

impl<T, U, I, D> ChangeSink<T> for FnSink<U, I, D>
where
    U: FnMut(&T, &T),
    I: FnMut(&T),
    D: FnMut(&T),
{
    type Error = CacheError;

    fn on_update(&mut self, baseline: &T, current: &T) -> Result<(), CacheError> {
        (self.on_update)(baseline, current);
        Ok(())
    }

    fn on_insert(&mut self, item: &T) -> Result<(), CacheError> {
        (self.on_insert)(item);
        Ok(())
    }

    fn on_delete(&mut self, item: &T) -> Result<(), CacheError> {
        (self.on_delete)(item);
        Ok(())
    }
}
