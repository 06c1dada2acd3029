//! Annealing state machine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument, warn};

use super::config::{AnnealConfig, InitialGrid};
use super::types::{AnnealOutcome, AnnealState, FailureReason};
use crate::energy::EnergyModel;
use crate::error::TspError;
use crate::grid::{TourEvaluator, TourValidator, UnitGrid};
use crate::relax::{RelaxOutcome, RelaxationEngine};

/// Cools a [`UnitGrid`] until it encodes a valid tour or a budget runs out.
///
/// # Examples
///
/// ```
/// use u_boltzmann::anneal::{AnnealConfig, AnnealingScheduler};
/// use u_boltzmann::energy::EnergyModel;
/// use u_boltzmann::problem::DistanceMatrix;
///
/// let d = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (0.5, 1.0)], 3).unwrap();
/// let model = EnergyModel::new(&d, 10.0).unwrap();
/// let config = AnnealConfig::default().with_seed(7);
///
/// let outcome = AnnealingScheduler::new(&model, config).unwrap().run().unwrap();
/// assert!(outcome.is_done());
/// ```
pub struct AnnealingScheduler<'a> {
    engine: RelaxationEngine<'a>,
    config: AnnealConfig,
    rng: StdRng,
    grid: UnitGrid,
    temperature: f64,
    iterations: usize,
    state: AnnealState,
    last_relax: Option<RelaxOutcome>,
    failure: Option<FailureReason>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> AnnealingScheduler<'a> {
    /// Creates a scheduler whose initial grid follows
    /// [`AnnealConfig::initial_grid`].
    pub fn new(model: &'a EnergyModel, config: AnnealConfig) -> Result<Self, TspError> {
        let mut rng = seeded_rng(config.seed);
        let grid = match config.initial_grid {
            InitialGrid::Random => UnitGrid::random(model.city_count(), &mut rng),
            InitialGrid::Inactive => UnitGrid::new(model.city_count()),
        };
        Self::build(model, config, rng, grid)
    }

    /// Creates a scheduler starting from a caller-supplied grid.
    pub fn with_grid(
        model: &'a EnergyModel,
        config: AnnealConfig,
        grid: UnitGrid,
    ) -> Result<Self, TspError> {
        if grid.city_count() != model.city_count() {
            return Err(TspError::InputSizeMismatch {
                expected: model.city_count(),
                actual: grid.city_count(),
            });
        }
        let rng = seeded_rng(config.seed);
        Self::build(model, config, rng, grid)
    }

    fn build(
        model: &'a EnergyModel,
        config: AnnealConfig,
        rng: StdRng,
        grid: UnitGrid,
    ) -> Result<Self, TspError> {
        config.validate()?;
        let engine = RelaxationEngine::new(model, config.relax.clone())?;
        Ok(Self {
            engine,
            temperature: config.initial_temperature,
            config,
            rng,
            grid,
            iterations: 0,
            state: AnnealState::Cooling,
            last_relax: None,
            failure: None,
            cancel: None,
        })
    }

    /// Installs a cancellation flag, checked before every relaxation.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn state(&self) -> AnnealState {
        self.state
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Relaxations performed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn grid(&self) -> &UnitGrid {
        &self.grid
    }

    /// Outcome of the most recent relaxation, if any.
    pub fn last_relax(&self) -> Option<&RelaxOutcome> {
        self.last_relax.as_ref()
    }

    /// Advances the state machine by one round and returns the new state.
    ///
    /// Calling `step` in a terminal state is a no-op.
    pub fn step(&mut self) -> Result<AnnealState, TspError> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }

        if self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            return Ok(self.fail(FailureReason::Cancelled));
        }

        if self.iterations >= self.config.max_iterations {
            warn!(
                iterations = self.iterations,
                temperature = self.temperature,
                "iteration budget exhausted without a valid tour"
            );
            return Ok(self.fail(FailureReason::IterationBudget));
        }

        let outcome = self
            .engine
            .relax(&mut self.grid, self.temperature, &mut self.rng)?;
        self.iterations += 1;
        self.last_relax = Some(outcome);

        debug!(
            iteration = self.iterations,
            temperature = self.temperature,
            sweeps = outcome.sweeps,
            flips = outcome.total_flips,
            converged = outcome.converged,
            path = %self.grid,
            "annealing round"
        );

        if TourValidator::is_valid(&self.grid) {
            self.state = AnnealState::Done;
            return Ok(self.state);
        }

        self.temperature *= self.config.cooling_factor;
        if let Some(floor) = self.config.min_temperature {
            if self.temperature < floor {
                warn!(
                    temperature = self.temperature,
                    floor, "temperature floor reached without a valid tour"
                );
                return Ok(self.fail(FailureReason::TemperatureFloor));
            }
        }
        Ok(self.state)
    }

    /// Steps until a terminal state and returns the outcome.
    #[instrument(skip_all, name = "anneal")]
    pub fn run(mut self) -> Result<AnnealOutcome, TspError> {
        while !self.step()?.is_terminal() {}
        let outcome = self.into_outcome();
        info!(
            state = ?outcome.state(),
            iterations = outcome.iterations(),
            temperature = outcome.temperature(),
            "annealing finished"
        );
        Ok(outcome)
    }

    /// Converts the scheduler into its outcome.
    ///
    /// A scheduler that is still cooling reports itself as failed on its
    /// iteration budget.
    pub fn into_outcome(self) -> AnnealOutcome {
        match self.state {
            AnnealState::Done => AnnealOutcome::Done {
                path: TourEvaluator::path(&self.grid),
                grid: self.grid,
                temperature: self.temperature,
                iterations: self.iterations,
                converged: self.last_relax.is_some_and(|r| r.converged),
            },
            AnnealState::Cooling | AnnealState::Failed => AnnealOutcome::Failed {
                grid: self.grid,
                temperature: self.temperature,
                iterations: self.iterations,
                reason: self.failure.unwrap_or(FailureReason::IterationBudget),
            },
        }
    }

    fn fail(&mut self, reason: FailureReason) -> AnnealState {
        self.failure = Some(reason);
        self.state = AnnealState::Failed;
        self.state
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(rand::random);
    debug!(seed, "seeding annealing rng");
    StdRng::seed_from_u64(seed)
}
