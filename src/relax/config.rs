//! Relaxation configuration.

use crate::error::TspError;

/// Order in which units are resampled within a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateMode {
    /// Units are visited one at a time in a freshly shuffled order; each
    /// update sees every earlier update of the same sweep.
    #[default]
    Sequential,

    /// Every unit is resampled from the state at the start of the sweep.
    ///
    /// This changes the dynamics (neighbouring units can flip together and
    /// oscillate) but the per-unit decisions are independent, so they are
    /// computed with rayon when the `parallel` feature is enabled.
    Synchronous,
}

/// Configuration for a single relaxation at fixed temperature.
///
/// # Examples
///
/// ```
/// use u_boltzmann::relax::{RelaxConfig, UpdateMode};
///
/// let config = RelaxConfig::default()
///     .with_max_sweeps(250)
///     .with_convergence_epsilon(0.0)
///     .with_update_mode(UpdateMode::Sequential);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelaxConfig {
    /// Hard cap on sweeps per relaxation. Must be at least 1.
    pub max_sweeps: usize,

    /// Equilibrium is declared when a sweep flips fewer than
    /// `convergence_epsilon * N²` units. With 0 equilibrium is never
    /// declared and every relaxation runs `max_sweeps` sweeps.
    pub convergence_epsilon: f64,

    /// Unit visiting order.
    pub update_mode: UpdateMode,
}

impl Default for RelaxConfig {
    fn default() -> Self {
        Self {
            max_sweeps: 100,
            convergence_epsilon: 0.01,
            update_mode: UpdateMode::default(),
        }
    }
}

impl RelaxConfig {
    pub fn with_max_sweeps(mut self, n: usize) -> Self {
        self.max_sweeps = n;
        self
    }

    pub fn with_convergence_epsilon(mut self, epsilon: f64) -> Self {
        self.convergence_epsilon = epsilon;
        self
    }

    pub fn with_update_mode(mut self, mode: UpdateMode) -> Self {
        self.update_mode = mode;
        self
    }

    /// Flip count below which a sweep of `unit_count` units counts as
    /// settled.
    pub fn flip_tolerance(&self, unit_count: usize) -> f64 {
        self.convergence_epsilon * unit_count as f64
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), TspError> {
        if self.max_sweeps == 0 {
            return Err(TspError::InvalidConfig(
                "max_sweeps must be at least 1".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.convergence_epsilon) {
            return Err(TspError::InvalidConfig(format!(
                "convergence_epsilon must be in [0, 1), got {}",
                self.convergence_epsilon
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RelaxConfig::default();
        assert_eq!(config.max_sweeps, 100);
        assert!((config.convergence_epsilon - 0.01).abs() < 1e-15);
        assert_eq!(config.update_mode, UpdateMode::Sequential);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flip_tolerance() {
        let config = RelaxConfig::default().with_convergence_epsilon(0.05);
        assert!((config.flip_tolerance(100) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_zero_sweeps() {
        assert!(RelaxConfig::default().with_max_sweeps(0).validate().is_err());
    }

    #[test]
    fn test_validate_bad_epsilon() {
        assert!(RelaxConfig::default()
            .with_convergence_epsilon(1.0)
            .validate()
            .is_err());
        assert!(RelaxConfig::default()
            .with_convergence_epsilon(-0.1)
            .validate()
            .is_err());
        assert!(RelaxConfig::default()
            .with_convergence_epsilon(f64::NAN)
            .validate()
            .is_err());
    }
}
