//! Solver result record.

/// Result of a successful solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TspReport {
    /// Temperature at which the valid tour appeared.
    pub final_temperature: f64,

    /// City visited at each position.
    pub path: Vec<usize>,

    /// Length of the closed tour.
    pub tour_length: f64,

    /// Whether the final relaxation reached equilibrium before its sweep cap.
    pub converged: bool,

    /// Annealing rounds performed.
    pub iterations: usize,
}
