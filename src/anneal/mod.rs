//! Annealing schedule driving the relaxation toward a valid tour.
//!
//! The scheduler is a small state machine. It starts in
//! [`AnnealState::Cooling`] at the initial temperature; every step relaxes
//! the grid once and checks it with the tour validator. A valid grid ends
//! the run in [`AnnealState::Done`]; otherwise the temperature is
//! multiplied by the cooling factor. Running out of iterations ends the run
//! in [`AnnealState::Failed`]; so do the optional temperature floor and
//! cancellation flag.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Aarts & Korst (1989), *Simulated Annealing and Boltzmann Machines*, ch. 9

mod config;
mod runner;
mod types;

pub use config::{AnnealConfig, InitialGrid};
pub use runner::AnnealingScheduler;
pub use types::{AnnealOutcome, AnnealState, FailureReason};
