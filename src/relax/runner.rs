//! Sweep loop.

use rand::seq::SliceRandom;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

use super::config::{RelaxConfig, UpdateMode};
use super::field::LocalField;
use crate::energy::EnergyModel;
use crate::error::TspError;
use crate::grid::UnitGrid;

/// Result of one relaxation at fixed temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelaxOutcome {
    /// Whether a sweep settled below the flip tolerance.
    pub converged: bool,

    /// Number of sweeps performed.
    pub sweeps: usize,

    /// Flips during the last sweep.
    pub flips_last_sweep: usize,

    /// Flips over all sweeps.
    pub total_flips: usize,
}

/// Probability that a unit with local activation `activation` fires at
/// `temperature`: `1 / (1 + exp(-activation / temperature))`.
///
/// Evaluated without overflow for any ratio. As the temperature goes to
/// zero this tends to 1 for positive and 0 for negative activation.
///
/// # Examples
///
/// ```
/// use u_boltzmann::relax::firing_probability;
///
/// assert_eq!(firing_probability(0.0, 1.0), 0.5);
/// assert!(firing_probability(1.0, 1e-9) > 0.999_999);
/// assert!(firing_probability(-1.0, 1e-9) < 1e-6);
/// ```
pub fn firing_probability(activation: f64, temperature: f64) -> f64 {
    let x = activation / temperature;
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Draws the next state of a unit from its firing probability.
#[inline]
pub(crate) fn sample_unit<R: Rng>(activation: f64, temperature: f64, rng: &mut R) -> bool {
    rng.random::<f64>() < firing_probability(activation, temperature)
}

/// Stochastic relaxation of a [`UnitGrid`] against an [`EnergyModel`].
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_boltzmann::energy::EnergyModel;
/// use u_boltzmann::grid::UnitGrid;
/// use u_boltzmann::problem::DistanceMatrix;
/// use u_boltzmann::relax::{RelaxConfig, RelaxationEngine};
///
/// let d = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], 3).unwrap();
/// let model = EnergyModel::new(&d, 10.0).unwrap();
/// let engine = RelaxationEngine::new(&model, RelaxConfig::default()).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let mut grid = UnitGrid::random(3, &mut rng);
/// let outcome = engine.relax(&mut grid, 0.5, &mut rng).unwrap();
/// assert!(outcome.sweeps >= 1);
/// ```
pub struct RelaxationEngine<'a> {
    model: &'a EnergyModel,
    config: RelaxConfig,
}

impl<'a> RelaxationEngine<'a> {
    pub fn new(model: &'a EnergyModel, config: RelaxConfig) -> Result<Self, TspError> {
        config.validate()?;
        Ok(Self { model, config })
    }

    pub fn config(&self) -> &RelaxConfig {
        &self.config
    }

    pub fn model(&self) -> &EnergyModel {
        self.model
    }

    /// Sweeps `grid` at `temperature` until equilibrium or the sweep cap.
    ///
    /// Fails only on invalid input: a non-positive or non-finite
    /// temperature, or a grid sized for a different city count.
    pub fn relax<R: Rng>(
        &self,
        grid: &mut UnitGrid,
        temperature: f64,
        rng: &mut R,
    ) -> Result<RelaxOutcome, TspError> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(TspError::InvalidConfig(format!(
                "temperature must be positive and finite, got {temperature}"
            )));
        }
        if grid.city_count() != self.model.city_count() {
            return Err(TspError::InputSizeMismatch {
                expected: self.model.city_count(),
                actual: grid.city_count(),
            });
        }

        let tolerance = self.config.flip_tolerance(grid.unit_count());
        let mut field = LocalField::new(grid, self.model);
        let mut order: Vec<usize> = (0..grid.unit_count()).collect();

        let mut outcome = RelaxOutcome {
            converged: false,
            sweeps: 0,
            flips_last_sweep: 0,
            total_flips: 0,
        };

        while outcome.sweeps < self.config.max_sweeps {
            let flips = match self.config.update_mode {
                UpdateMode::Sequential => {
                    self.sequential_sweep(grid, &mut field, &mut order, temperature, rng)
                }
                UpdateMode::Synchronous => {
                    self.synchronous_sweep(grid, &mut field, temperature, rng)
                }
            };

            outcome.sweeps += 1;
            outcome.flips_last_sweep = flips;
            outcome.total_flips += flips;
            trace!(sweep = outcome.sweeps, flips, temperature, "relaxation sweep");

            if (flips as f64) < tolerance {
                outcome.converged = true;
                break;
            }
        }

        Ok(outcome)
    }

    fn sequential_sweep<R: Rng>(
        &self,
        grid: &mut UnitGrid,
        field: &mut LocalField,
        order: &mut [usize],
        temperature: f64,
        rng: &mut R,
    ) -> usize {
        order.shuffle(rng);
        let mut flips = 0;
        for &index in order.iter() {
            let active = sample_unit(field.activation(index, self.model), temperature, rng);
            if grid.write(index, active) {
                field.apply_flip(index, active, self.model);
                flips += 1;
            }
        }
        flips
    }

    fn synchronous_sweep<R: Rng>(
        &self,
        grid: &mut UnitGrid,
        field: &mut LocalField,
        temperature: f64,
        rng: &mut R,
    ) -> usize {
        // Draws are taken in index order so the trajectory does not depend
        // on whether decisions are computed in parallel.
        let draws: Vec<f64> = (0..grid.unit_count()).map(|_| rng.random::<f64>()).collect();
        let frozen = &*field;
        let model = self.model;
        let decide = |(index, &u): (usize, &f64)| {
            u < firing_probability(frozen.activation(index, model), temperature)
        };

        #[cfg(feature = "parallel")]
        let next: Vec<bool> = draws.par_iter().enumerate().map(decide).collect();
        #[cfg(not(feature = "parallel"))]
        let next: Vec<bool> = draws.iter().enumerate().map(decide).collect();

        let mut flips = 0;
        for (index, active) in next.into_iter().enumerate() {
            if grid.write(index, active) {
                field.apply_flip(index, active, self.model);
                flips += 1;
            }
        }
        flips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TourValidator;
    use crate::problem::DistanceMatrix;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square_model(penalty: f64) -> EnergyModel {
        let d = DistanceMatrix::from_coordinates(
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            4,
        )
        .unwrap();
        EnergyModel::new(&d, penalty).unwrap()
    }

    #[test]
    fn test_firing_probability_midpoint_and_bounds() {
        assert_eq!(firing_probability(0.0, 2.0), 0.5);
        for &a in &[-1e6, -3.0, -0.1, 0.1, 3.0, 1e6] {
            for &t in &[1e-300, 1e-6, 0.5, 2.0, 1e6] {
                let p = firing_probability(a, t);
                assert!((0.0..=1.0).contains(&p), "p({a}, {t}) = {p}");
            }
        }
    }

    #[test]
    fn test_firing_probability_symmetry() {
        for &a in &[0.3, 1.0, 4.0] {
            let sum = firing_probability(a, 1.5) + firing_probability(-a, 1.5);
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_firing_probability_monotone_in_temperature() {
        // Cooling sharpens the decision for positive activation.
        let hot = firing_probability(1.0, 10.0);
        let warm = firing_probability(1.0, 1.0);
        let cold = firing_probability(1.0, 0.1);
        assert!(hot < warm && warm < cold);
    }

    #[test]
    fn test_zero_temperature_limit_matches_sign() {
        let mut rng = StdRng::seed_from_u64(99);
        let activations = [-2.0, -0.25, -0.01, 0.01, 0.25, 2.0];
        for &a in &activations {
            let agreements = (0..2_000)
                .filter(|_| sample_unit(a, 1e-6, &mut rng) == (a > 0.0))
                .count();
            assert_eq!(agreements, 2_000, "activation {a}");
        }

        // At high temperature outcomes are close to a fair coin.
        let fired = (0..4_000)
            .filter(|_| sample_unit(0.25, 1e3, &mut rng))
            .count();
        assert!((1_800..2_200).contains(&fired), "fired {fired} of 4000");
    }

    #[test]
    fn test_rejects_bad_temperature() {
        let model = square_model(10.0);
        let engine = RelaxationEngine::new(&model, RelaxConfig::default()).unwrap();
        let mut grid = UnitGrid::new(4);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(engine.relax(&mut grid, 0.0, &mut rng).is_err());
        assert!(engine.relax(&mut grid, -1.0, &mut rng).is_err());
        assert!(engine.relax(&mut grid, f64::INFINITY, &mut rng).is_err());
    }

    #[test]
    fn test_rejects_grid_size_mismatch() {
        let model = square_model(10.0);
        let engine = RelaxationEngine::new(&model, RelaxConfig::default()).unwrap();
        let mut grid = UnitGrid::new(3);
        let mut rng = StdRng::seed_from_u64(0);
        let err = engine.relax(&mut grid, 1.0, &mut rng).unwrap_err();
        assert_eq!(
            err,
            TspError::InputSizeMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_rejects_invalid_config() {
        let model = square_model(10.0);
        let config = RelaxConfig::default().with_max_sweeps(0);
        assert!(RelaxationEngine::new(&model, config).is_err());
    }

    #[test]
    fn test_respects_sweep_cap() {
        let model = square_model(10.0);
        // epsilon 0 never declares equilibrium.
        let config = RelaxConfig::default()
            .with_max_sweeps(7)
            .with_convergence_epsilon(0.0);
        let engine = RelaxationEngine::new(&model, config).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut grid = UnitGrid::random(4, &mut rng);
        let outcome = engine.relax(&mut grid, 50.0, &mut rng).unwrap();
        assert_eq!(outcome.sweeps, 7);
        assert!(!outcome.converged);
    }

    #[test]
    fn test_cold_relaxation_settles_on_a_tour() {
        // With a large penalty every permutation is a strict local minimum
        // and no other state is; a near-zero temperature descends to one.
        let model = square_model(10.0);
        let config = RelaxConfig::default().with_max_sweeps(50);
        let engine = RelaxationEngine::new(&model, config).unwrap();

        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid = UnitGrid::random(4, &mut rng);
            let outcome = engine.relax(&mut grid, 1e-3, &mut rng).unwrap();
            assert!(outcome.converged, "seed {seed}: {outcome:?}");
            assert_eq!(outcome.flips_last_sweep, 0);
            assert!(TourValidator::is_valid(&grid), "seed {seed}: {grid}");
        }
    }

    #[test]
    fn test_valid_tour_is_stable_when_cold() {
        let model = square_model(10.0);
        let engine = RelaxationEngine::new(&model, RelaxConfig::default()).unwrap();
        let mut grid = UnitGrid::from_path(&[2, 3, 0, 1]).unwrap();
        let before = grid.clone();
        let mut rng = StdRng::seed_from_u64(8);
        let outcome = engine.relax(&mut grid, 1e-3, &mut rng).unwrap();
        assert!(outcome.converged);
        assert_eq!(outcome.sweeps, 1);
        assert_eq!(outcome.total_flips, 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let model = square_model(4.5);
        let engine = RelaxationEngine::new(&model, RelaxConfig::default()).unwrap();

        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid = UnitGrid::random(4, &mut rng);
            let outcome = engine.relax(&mut grid, 0.7, &mut rng).unwrap();
            (grid, outcome)
        };
        assert_eq!(run(21), run(21));
    }

    #[test]
    fn test_synchronous_sweep_decides_from_prior_state() {
        let model = square_model(4.5);
        let config = RelaxConfig::default().with_update_mode(UpdateMode::Synchronous);
        let engine = RelaxationEngine::new(&model, config).unwrap();
        let temperature = 0.8;

        let mut rng = StdRng::seed_from_u64(13);
        let mut grid = UnitGrid::random(4, &mut rng);
        let start = grid.clone();
        let mut field = LocalField::new(&grid, &model);
        let activations: Vec<f64> = (0..grid.unit_count())
            .map(|i| field.activation(i, &model))
            .collect();
        let mut replay = rng.clone();
        let draws: Vec<f64> = (0..grid.unit_count())
            .map(|_| replay.random::<f64>())
            .collect();

        let flips = engine.synchronous_sweep(&mut grid, &mut field, temperature, &mut rng);

        let mut expected_flips = 0;
        for (i, (&u, &a)) in draws.iter().zip(&activations).enumerate() {
            let expected = u < firing_probability(a, temperature);
            assert_eq!(grid.is_active(i), expected, "unit {i}");
            if expected != start.is_active(i) {
                expected_flips += 1;
            }
        }
        assert_eq!(flips, expected_flips);
        for i in 0..grid.unit_count() {
            assert!((field.activation(i, &model) - grid.activation_at(i, &model)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_synchronous_sweep_flips_whole_empty_grid() {
        // Every unit of the empty grid sees only its bias, so all of them
        // fire together; the full grid then switches off in one sweep.
        let model = square_model(10.0);
        let config = RelaxConfig::default().with_update_mode(UpdateMode::Synchronous);
        let engine = RelaxationEngine::new(&model, config).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let mut grid = UnitGrid::new(4);
        let mut field = LocalField::new(&grid, &model);

        let flips = engine.synchronous_sweep(&mut grid, &mut field, 1e-3, &mut rng);
        assert_eq!(flips, 16);
        assert_eq!(grid.active_count(), 16);

        let flips = engine.synchronous_sweep(&mut grid, &mut field, 1e-3, &mut rng);
        assert_eq!(flips, 16);
        assert_eq!(grid.active_count(), 0);
    }

    #[test]
    fn test_synchronous_mode_runs() {
        let model = square_model(10.0);
        let config = RelaxConfig::default()
            .with_update_mode(UpdateMode::Synchronous)
            .with_max_sweeps(20);
        let engine = RelaxationEngine::new(&model, config).unwrap();

        let mut grid = UnitGrid::from_path(&[0, 1, 2, 3]).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        // A valid tour is a fixed point of the cold synchronous update too.
        let outcome = engine.relax(&mut grid, 1e-3, &mut rng).unwrap();
        assert!(outcome.converged);
        assert!(TourValidator::is_valid(&grid));

        let mut rng = StdRng::seed_from_u64(2);
        let mut hot = UnitGrid::random(4, &mut rng);
        let outcome = engine.relax(&mut hot, 5.0, &mut rng).unwrap();
        assert!(outcome.sweeps <= 20);
    }
}
