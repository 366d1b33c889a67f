//! Callback seam for replaying a change classification.

/// Receives the records of a [`CompareResult`](crate::CompareResult) one by one.
///
/// Replay order is fixed: every changed pair in baseline order, then every
/// deleted record, then every inserted record. An error returned from any
/// callback stops the replay and is handed back to the caller as is; records
/// already delivered are not rolled back.
pub trait ChangeSink<T> {
    /// Error type produced by the callbacks.
    type Error;

    /// A record present in both snapshots whose content differs.
    fn on_update(&mut self, baseline: &T, current: &T) -> Result<(), Self::Error>;

    /// A record present only in the current snapshot.
    fn on_insert(&mut self, item: &T) -> Result<(), Self::Error>;

    /// A record present only in the baseline snapshot.
    fn on_delete(&mut self, item: &T) -> Result<(), Self::Error>;
}
