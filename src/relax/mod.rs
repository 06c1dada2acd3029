//! Equilibrium-seeking relaxation of the unit grid at a fixed temperature.
//!
//! Each sweep visits every unit and resamples it from the Gibbs
//! conditional of the Boltzmann machine: the unit becomes active with
//! probability `1 / (1 + exp(-a / T))`, where `a` is its local activation.
//! Relaxation stops once a sweep flips fewer than `ε·N²` units
//! (equilibrium) or after `max_sweeps` sweeps. Non-convergence is reported
//! in the outcome, never as an error.
//!
//! # References
//!
//! - Ackley, Hinton & Sejnowski (1985), "A Learning Algorithm for
//!   Boltzmann Machines"
//! - Geman & Geman (1984), "Stochastic Relaxation, Gibbs Distributions,
//!   and the Bayesian Restoration of Images"

mod config;
mod field;
mod runner;

pub use config::{RelaxConfig, UpdateMode};
pub use runner::{firing_probability, RelaxOutcome, RelaxationEngine};
