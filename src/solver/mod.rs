//! End-to-end pipeline: coordinates to a reported tour.
//!
//! [`Solver`] validates the input, builds the [`DistanceMatrix`] and the
//! [`EnergyModel`], runs the [`AnnealingScheduler`] and turns its outcome
//! into a [`TspReport`]. A run that ends without a valid tour is returned
//! as [`TspError::NonConvergence`]; callers may retry with another seed
//! or relaxed parameters.
//!
//! [`DistanceMatrix`]: crate::problem::DistanceMatrix
//! [`EnergyModel`]: crate::energy::EnergyModel
//! [`AnnealingScheduler`]: crate::anneal::AnnealingScheduler
//! [`TspError::NonConvergence`]: crate::error::TspError::NonConvergence

mod config;
mod runner;
mod types;

pub use config::SolverConfig;
pub use runner::Solver;
pub use types::TspReport;
