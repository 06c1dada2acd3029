//! One-hot tour validity check.

use super::unit_grid::UnitGrid;

/// Row/column diagnostics for a grid.
///
/// A grid encodes a tour iff every position row and every city column
/// holds exactly one active unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validity {
    /// Positions whose row does not hold exactly one active city.
    pub invalid_rows: Vec<usize>,
    /// Cities whose column does not hold exactly one active position.
    pub invalid_columns: Vec<usize>,
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        self.invalid_rows.is_empty() && self.invalid_columns.is_empty()
    }
}

/// Read-only validity queries over a [`UnitGrid`].
pub struct TourValidator;

impl TourValidator {
    /// Whether the grid is a permutation matrix.
    ///
    /// Stops at the first offending row or column.
    pub fn is_valid(grid: &UnitGrid) -> bool {
        let n = grid.city_count();
        (0..n).all(|k| grid.row_count(k) == 1 && grid.column_count(k) == 1)
    }

    /// Full report of every row and column that is not one-hot.
    pub fn check(grid: &UnitGrid) -> Validity {
        let n = grid.city_count();
        Validity {
            invalid_rows: (0..n).filter(|&p| grid.row_count(p) != 1).collect(),
            invalid_columns: (0..n).filter(|&c| grid.column_count(c) != 1).collect(),
        }
    }
}
