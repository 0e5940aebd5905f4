//! # flatseq-core
//!
//! Data model shared by every flatseq crate: the location algebra describing
//! where a feature sits on a sequence, the entry/feature/reference/sequence
//! aggregates a flat-file record is parsed into, and the structured
//! validation messages reported along the way.
//!
//! ```rust
//! use flatseq_core::location::{CompoundLocation, Location};
//!
//! let cds = CompoundLocation::from(vec![Location::range(1, 35), Location::range(101, 135)]);
//! assert_eq!(cds.length(), 70);
//! assert_eq!(cds.relative_position(101), Some(36));
//! ```
pub mod errors;
pub mod location;
pub mod models;
pub mod utils;
pub mod validation;

pub use errors::{LocationError, LocationResult};
pub use validation::{Origin, Severity, ValidationMessage, ValidationResult};
