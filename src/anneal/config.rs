//! Annealing configuration.

use crate::error::TspError;
use crate::relax::RelaxConfig;

/// Starting state of the grid when the caller does not supply one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitialGrid {
    /// Every unit active with probability ½, drawn from the run's RNG.
    #[default]
    Random,
    /// Every unit inactive.
    Inactive,
}

/// Configuration for the annealing schedule.
///
/// # Examples
///
/// ```
/// use u_boltzmann::anneal::AnnealConfig;
/// use u_boltzmann::relax::RelaxConfig;
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(2.0)
///     .with_cooling_factor(0.99)
///     .with_max_iterations(1000)
///     .with_relax(RelaxConfig::default().with_max_sweeps(200))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Temperature of the first relaxation.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1): `T_{k+1} = cooling_factor * T_k`.
    pub cooling_factor: f64,

    /// Maximum number of relaxations. 0 fails immediately.
    pub max_iterations: usize,

    /// Optional floor. The run fails once cooling goes below it.
    pub min_temperature: Option<f64>,

    /// Random seed for reproducibility. `None` draws one from entropy.
    pub seed: Option<u64>,

    /// Grid used by [`AnnealingScheduler::new`](super::AnnealingScheduler::new).
    pub initial_grid: InitialGrid,

    /// Per-temperature relaxation settings.
    pub relax: RelaxConfig,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 2.0,
            cooling_factor: 0.99,
            max_iterations: 1000,
            min_temperature: None,
            seed: None,
            initial_grid: InitialGrid::default(),
            relax: RelaxConfig::default(),
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_factor(mut self, factor: f64) -> Self {
        self.cooling_factor = factor;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = Some(t);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_initial_grid(mut self, initial: InitialGrid) -> Self {
        self.initial_grid = initial;
        self
    }

    pub fn with_relax(mut self, relax: RelaxConfig) -> Self {
        self.relax = relax;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), TspError> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(TspError::InvalidConfig(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            )));
        }
        if !(self.cooling_factor > 0.0 && self.cooling_factor < 1.0) {
            return Err(TspError::InvalidConfig(format!(
                "cooling_factor must be in (0, 1), got {}",
                self.cooling_factor
            )));
        }
        if let Some(floor) = self.min_temperature {
            if !floor.is_finite() || floor <= 0.0 {
                return Err(TspError::InvalidConfig(format!(
                    "min_temperature must be positive and finite, got {floor}"
                )));
            }
            if floor >= self.initial_temperature {
                return Err(TspError::InvalidConfig(
                    "min_temperature must be less than initial_temperature".into(),
                ));
            }
        }
        self.relax.validate()
    }
}
