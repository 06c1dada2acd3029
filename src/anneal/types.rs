//! Scheduler states and terminal outcomes.

use crate::grid::UnitGrid;

/// State of the annealing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnnealState {
    /// Still relaxing and cooling.
    Cooling,
    /// A valid tour was found.
    Done,
    /// Stopped without a valid tour.
    Failed,
}

impl AnnealState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AnnealState::Cooling)
    }
}

/// Why a run ended in [`AnnealState::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailureReason {
    /// `max_iterations` relaxations without a valid tour.
    IterationBudget,
    /// Cooling went below the configured minimum temperature.
    TemperatureFloor,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Terminal result of an annealing run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnnealOutcome {
    Done {
        /// The valid grid.
        grid: UnitGrid,
        /// Temperature of the relaxation that produced the tour.
        temperature: f64,
        /// City visited at each position.
        path: Vec<usize>,
        /// Relaxations performed, including the successful one.
        iterations: usize,
        /// Whether the final relaxation reached equilibrium.
        converged: bool,
    },
    Failed {
        /// Grid after the last relaxation.
        grid: UnitGrid,
        /// Temperature when the run stopped.
        temperature: f64,
        /// Relaxations performed.
        iterations: usize,
        reason: FailureReason,
    },
}

impl AnnealOutcome {
    pub fn state(&self) -> AnnealState {
        match self {
            AnnealOutcome::Done { .. } => AnnealState::Done,
            AnnealOutcome::Failed { .. } => AnnealState::Failed,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, AnnealOutcome::Done { .. })
    }

    pub fn grid(&self) -> &UnitGrid {
        match self {
            AnnealOutcome::Done { grid, .. } | AnnealOutcome::Failed { grid, .. } => grid,
        }
    }

    pub fn iterations(&self) -> usize {
        match self {
            AnnealOutcome::Done { iterations, .. } | AnnealOutcome::Failed { iterations, .. } => {
                *iterations
            }
        }
    }

    pub fn temperature(&self) -> f64 {
        match self {
            AnnealOutcome::Done { temperature, .. }
            | AnnealOutcome::Failed { temperature, .. } => *temperature,
        }
    }
}
