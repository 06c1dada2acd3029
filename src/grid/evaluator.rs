//! Path extraction and tour length.

use super::unit_grid::UnitGrid;
use super::validator::TourValidator;
use crate::error::TspError;
use crate::problem::DistanceMatrix;

/// Read-only tour queries over a [`UnitGrid`].
///
/// Path extraction is best-effort: each position takes the first active
/// city in its row, or city 0 when the row is empty. On a valid grid this
/// is exactly the encoded tour. Use [`TourEvaluator::tour_length_strict`]
/// to refuse grids that do not encode a tour.
pub struct TourEvaluator;

impl TourEvaluator {
    /// City chosen at each position under the first-match rule.
    pub fn path(grid: &UnitGrid) -> Vec<usize> {
        (0..grid.city_count())
            .map(|position| grid.active_cities(position).next().unwrap_or(0))
            .collect()
    }

    /// Length of the closed tour visiting `path` in order.
    ///
    /// # Panics
    ///
    /// Panics if a city in `path` is out of range for `distances`.
    pub fn path_length(path: &[usize], distances: &DistanceMatrix) -> f64 {
        let n = path.len();
        (0..n)
            .map(|k| distances.get(path[k], path[(k + 1) % n]))
            .sum()
    }

    /// Tour length of the grid under the first-match rule.
    pub fn tour_length(grid: &UnitGrid, distances: &DistanceMatrix) -> f64 {
        Self::path_length(&Self::path(grid), distances)
    }

    /// Tour length, or [`TspError::DegenerateQuery`] if the grid is not a
    /// permutation.
    pub fn tour_length_strict(
        grid: &UnitGrid,
        distances: &DistanceMatrix,
    ) -> Result<f64, TspError> {
        let validity = TourValidator::check(grid);
        if !validity.is_valid() {
            return Err(TspError::DegenerateQuery {
                invalid_rows: validity.invalid_rows,
                invalid_columns: validity.invalid_columns,
            });
        }
        Ok(Self::tour_length(grid, distances))
    }
}
