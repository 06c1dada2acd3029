//! Solver configuration.

use crate::anneal::AnnealConfig;
use crate::error::TspError;

/// Everything a solve needs besides the city coordinates.
///
/// # Examples
///
/// ```
/// use u_boltzmann::anneal::AnnealConfig;
/// use u_boltzmann::solver::SolverConfig;
///
/// let config = SolverConfig::new(10)
///     .with_penalty(1.0)
///     .with_anneal(AnnealConfig::default().with_seed(42));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Expected number of cities; inputs of any other length are rejected.
    pub city_count: usize,

    /// Inhibition weight between units sharing a city or a position.
    ///
    /// Should exceed twice the largest sum of two legs meeting at a city, or
    /// valid tours are not stable at low temperature.
    pub penalty: f64,

    /// Temperature schedule and relaxation settings.
    pub anneal: AnnealConfig,
}

impl SolverConfig {
    /// Defaults for `city_count` cities: penalty 1.0 and the default
    /// [`AnnealConfig`].
    pub fn new(city_count: usize) -> Self {
        Self {
            city_count,
            penalty: 1.0,
            anneal: AnnealConfig::default(),
        }
    }

    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn with_anneal(mut self, anneal: AnnealConfig) -> Self {
        self.anneal = anneal;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.anneal.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), TspError> {
        if self.city_count == 0 {
            return Err(TspError::InvalidConfig(
                "city_count must be at least 1".into(),
            ));
        }
        if !self.penalty.is_finite() || self.penalty <= 0.0 {
            return Err(TspError::InvalidConfig(format!(
                "penalty must be positive and finite, got {}",
                self.penalty
            )));
        }
        self.anneal.validate()
    }
}
