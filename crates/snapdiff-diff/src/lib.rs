//! Diff engine for snapdiff.
//!
//! Partitions a baseline snapshot and a current snapshot of a keyed
//! collection into deleted, changed and inserted records.
//!
//! # Key Types
//!
//! - [`DiffEngine`] -- stateless, reentrant partition algorithm
//! - [`CompareResult`] -- the three-way change classification
//! - [`ChangeSink`] -- callback seam used to replay a classification
//! - [`DiffConfig`] / [`DuplicateKeyPolicy`] -- engine configuration
//!
//! The free functions [`compare`] and [`compare_by`] run a default-configured
//! engine.

pub mod config;
pub mod engine;
pub mod error;
pub mod result;
pub mod sink;

pub use config::{DiffConfig, DuplicateKeyPolicy};
pub use engine::{compare, compare_by, DiffEngine};
pub use error::{DiffError, DiffResult, Side};
pub use result::{ChangeSummary, CompareResult};
pub use sink::ChangeSink;
