//! Foundation types for snapdiff.
//!
//! Every other snapdiff crate depends on `snapdiff-types`.
//!
//! # Key Types
//!
//! - [`Fingerprint`]: 32-byte content digest used as the default record equality

pub mod fingerprint;

pub use fingerprint::Fingerprint;
