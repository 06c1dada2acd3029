//! Energy model of the Boltzmann machine.
//!
//! Encodes the tour constraints and the travel cost as pairwise weights
//! between grid units plus a per-unit firing threshold:
//!
//! - two units sharing a city or a position inhibit each other with
//!   weight `-penalty`;
//! - units at cyclically adjacent positions are coupled by the negated
//!   distance between their cities;
//! - every unit has threshold `-0.5 * penalty`.
//!
//! The network energy of a state `s ∈ {0,1}^{N²}` is
//! `E(s) = -½ Σᵢⱼ wᵢⱼ sᵢ sⱼ + Σᵢ θᵢ sᵢ`. For a valid tour of length `L`
//! over N ≥ 3 cities this is `L - ½·N·penalty`.
//!
//! # References
//!
//! - Hopfield & Tank (1985), "Neural computation of decisions in
//!   optimization problems"
//! - Aarts & Korst (1989), *Simulated Annealing and Boltzmann Machines*

mod model;

pub use model::EnergyModel;
