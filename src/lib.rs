//! Boltzmann-machine relaxation solver for the Travelling Salesman Problem.
//!
//! An N-city tour is encoded as an N×N grid of binary units, one per
//! (position, city) pair. Inhibitory weights penalize two cities at one
//! position and one city at two positions; weights between adjacent
//! positions carry the negated leg lengths. Stochastic relaxation at a
//! geometrically falling temperature settles the grid into a permutation
//! matrix, which is read back as a tour.
//!
//! - **Problem**: cities and the symmetric [`DistanceMatrix`](problem::DistanceMatrix).
//! - **Energy**: the immutable weight matrix and thresholds.
//! - **Grid**: unit states, tour validation and evaluation.
//! - **Relax**: Gibbs sweeps at a fixed temperature until equilibrium.
//! - **Anneal**: the cooling schedule as an explicit state machine.
//! - **Solver**: the end-to-end pipeline from coordinates to a report.
//!
//! # Architecture
//!
//! The weight matrix is built once per instance and shared read-only; only
//! the grid is mutated, by one relaxation at a time. Every random draw comes
//! from one seedable RNG per run, so a fixed seed reproduces the whole
//! trajectory. Parallelism (feature `parallel`) is limited to weight
//! construction and synchronous updates.

pub mod anneal;
pub mod energy;
pub mod error;
pub mod grid;
pub mod problem;
pub mod relax;
pub mod solver;

pub use error::TspError;
pub use solver::{Solver, SolverConfig, TspReport};
