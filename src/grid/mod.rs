//! The N×N binary assignment grid and read-only tour queries over it.
//!
//! Unit `(position, city)` is active when the tour visits `city` at
//! `position`. The grid is stored flat; [`GridLayout`] owns the mapping
//! between `(position, city)` pairs and linear unit indices, and no other
//! module computes those indices itself.
//!
//! - [`UnitGrid`]: the mutable binary state and per-unit local activation.
//! - [`TourValidator`]: one-hot row/column check.
//! - [`TourEvaluator`]: path extraction and tour length.

mod evaluator;
mod layout;
mod unit_grid;
mod validator;

pub use evaluator::TourEvaluator;
pub use layout::{GridLayout, Unit};
pub use unit_grid::UnitGrid;
pub use validator::{TourValidator, Validity};
