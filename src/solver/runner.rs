//! End-to-end solve.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::{info, instrument};

use super::config::SolverConfig;
use super::types::TspReport;
use crate::anneal::{AnnealOutcome, AnnealingScheduler, FailureReason};
use crate::energy::EnergyModel;
use crate::error::TspError;
use crate::grid::TourEvaluator;
use crate::problem::{City, DistanceMatrix};

/// Solves TSP instances with Boltzmann-machine annealing.
///
/// # Examples
///
/// ```
/// use u_boltzmann::solver::{Solver, SolverConfig};
///
/// let square = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
/// let config = SolverConfig::new(4).with_penalty(10.0).with_seed(42);
///
/// let report = Solver::new(config).unwrap().solve_coordinates(&square).unwrap();
/// let mut visited = report.path.clone();
/// visited.sort_unstable();
/// assert_eq!(visited, vec![0, 1, 2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct Solver {
    config: SolverConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Result<Self, TspError> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: None,
        })
    }

    /// Installs a cancellation flag handed to every annealing run.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves for a list of cities.
    #[instrument(skip_all, fields(cities = cities.len()))]
    pub fn solve(&self, cities: &[City]) -> Result<TspReport, TspError> {
        let distances = DistanceMatrix::from_cities(cities, self.config.city_count)?;
        self.solve_distances(distances)
    }

    /// Solves for raw `(x, y)` pairs; city `i` is the `i`-th pair.
    #[instrument(skip_all, fields(cities = coordinates.len()))]
    pub fn solve_coordinates(&self, coordinates: &[(f64, f64)]) -> Result<TspReport, TspError> {
        let distances = DistanceMatrix::from_coordinates(coordinates, self.config.city_count)?;
        self.solve_distances(distances)
    }

    /// Solves for a finished distance matrix.
    #[instrument(skip_all, fields(cities = distances.len()))]
    pub fn solve_distances(&self, distances: DistanceMatrix) -> Result<TspReport, TspError> {
        info!(
            cities = distances.len(),
            penalty = self.config.penalty,
            initial_temperature = self.config.anneal.initial_temperature,
            cooling_factor = self.config.anneal.cooling_factor,
            "starting boltzmann solve"
        );

        match self.anneal(&distances)? {
            AnnealOutcome::Done {
                grid,
                temperature,
                path,
                iterations,
                converged,
            } => {
                let tour_length = TourEvaluator::tour_length_strict(&grid, &distances)?;
                info!(
                    tour_length,
                    iterations,
                    temperature,
                    path = %grid,
                    "valid tour found"
                );
                Ok(TspReport {
                    final_temperature: temperature,
                    path,
                    tour_length,
                    converged,
                    iterations,
                })
            }
            AnnealOutcome::Failed {
                iterations,
                reason: FailureReason::Cancelled,
                ..
            } => Err(TspError::Cancelled { iterations }),
            AnnealOutcome::Failed {
                temperature,
                iterations,
                ..
            } => Err(TspError::NonConvergence {
                iterations,
                final_temperature: temperature,
            }),
        }
    }

    /// Runs the annealing schedule and returns its raw outcome, including
    /// the last grid of a failed run.
    pub fn anneal(&self, distances: &DistanceMatrix) -> Result<AnnealOutcome, TspError> {
        if distances.len() != self.config.city_count {
            return Err(TspError::InputSizeMismatch {
                expected: self.config.city_count,
                actual: distances.len(),
            });
        }
        let model = EnergyModel::new(distances, self.config.penalty)?;
        let mut scheduler = AnnealingScheduler::new(&model, self.config.anneal.clone())?;
        if let Some(flag) = &self.cancel {
            scheduler = scheduler.with_cancel(Arc::clone(flag));
        }
        scheduler.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anneal::AnnealConfig;
    use std::sync::atomic::Ordering;

    const SQUARE: [(f64, f64); 4] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

    fn square_solver(seed: u64) -> Solver {
        Solver::new(SolverConfig::new(4).with_penalty(10.0).with_seed(seed)).unwrap()
    }

    fn assert_permutation(path: &[usize], n: usize) {
        let mut sorted = path.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn test_square_yields_valid_tour() {
        let report = square_solver(42).solve_coordinates(&SQUARE).unwrap();
        assert_permutation(&report.path, 4);

        let crossing = 2.0 + 2.0 * 2f64.sqrt();
        assert!(
            (report.tour_length - 4.0).abs() < 1e-9 || (report.tour_length - crossing).abs() < 1e-9,
            "unexpected length {}",
            report.tour_length
        );
        assert!(report.iterations >= 1);
        assert!(report.final_temperature > 0.0);
        assert!(report.final_temperature <= 2.0);
    }

    #[test]
    fn test_reported_length_matches_path() {
        let report = square_solver(5).solve_coordinates(&SQUARE).unwrap();
        let d = DistanceMatrix::from_coordinates(&SQUARE, 4).unwrap();
        let length = TourEvaluator::path_length(&report.path, &d);
        assert!((report.tour_length - length).abs() < 1e-12);
    }

    #[test]
    fn test_solve_cities_matches_coordinates() {
        let cities = City::from_coordinates(&SQUARE).unwrap();
        let a = square_solver(8).solve(&cities).unwrap();
        let b = square_solver(8).solve_coordinates(&SQUARE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_size_mismatch_fails_fast() {
        let err = square_solver(0)
            .solve_coordinates(&SQUARE[..3])
            .unwrap_err();
        assert_eq!(
            err,
            TspError::InputSizeMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_degenerate_coordinate_fails_fast() {
        let mut coords = SQUARE;
        coords[2] = (f64::NAN, 1.0);
        let err = square_solver(0).solve_coordinates(&coords).unwrap_err();
        assert!(matches!(err, TspError::DegenerateCoordinate { index: 2, .. }));
    }

    #[test]
    fn test_distance_matrix_size_checked() {
        let d = DistanceMatrix::from_coordinates(&SQUARE[..3], 3).unwrap();
        let err = square_solver(0).solve_distances(d).unwrap_err();
        assert!(matches!(err, TspError::InputSizeMismatch { .. }));
    }

    #[test]
    fn test_zero_iterations_is_non_convergence() {
        let config = SolverConfig::new(4)
            .with_penalty(10.0)
            .with_anneal(AnnealConfig::default().with_max_iterations(0).with_seed(1));
        let err = Solver::new(config)
            .unwrap()
            .solve_coordinates(&SQUARE)
            .unwrap_err();
        assert_eq!(
            err,
            TspError::NonConvergence {
                iterations: 0,
                final_temperature: 2.0
            }
        );
    }

    #[test]
    fn test_cancel_before_start() {
        let flag = Arc::new(AtomicBool::new(false));
        flag.store(true, Ordering::Relaxed);
        let solver = square_solver(3).with_cancel(flag);
        let err = solver.solve_coordinates(&SQUARE).unwrap_err();
        assert_eq!(err, TspError::Cancelled { iterations: 0 });
    }

    #[test]
    fn test_single_city() {
        let solver = Solver::new(SolverConfig::new(1).with_seed(0)).unwrap();
        let report = solver.solve_coordinates(&[(3.0, 4.0)]).unwrap();
        assert_eq!(report.path, vec![0]);
        assert_eq!(report.tour_length, 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Solver::new(SolverConfig::new(0)).is_err());
    }

    #[test]
    fn test_anneal_exposes_failed_grid() {
        let config = SolverConfig::new(4)
            .with_penalty(10.0)
            .with_anneal(AnnealConfig::default().with_max_iterations(0).with_seed(1));
        let d = DistanceMatrix::from_coordinates(&SQUARE, 4).unwrap();
        let outcome = Solver::new(config).unwrap().anneal(&d).unwrap();
        assert!(!outcome.is_done());
        assert_eq!(outcome.grid().city_count(), 4);
    }
}
