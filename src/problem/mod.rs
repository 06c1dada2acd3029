//! Problem input: cities and the distance matrix derived from them.
//!
//! Both types are immutable once built. Construction validates the
//! input shape so that downstream components can index without checks:
//! coordinate counts must match the configured city count and every
//! coordinate must be finite.

mod distance;
mod types;

pub use distance::DistanceMatrix;
pub use types::City;
