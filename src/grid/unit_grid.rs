//! Binary unit state.

use std::fmt;

use rand::Rng;

use super::layout::{GridLayout, Unit};
use crate::energy::EnergyModel;
use crate::error::TspError;

/// N² binary units addressed by `(position, city)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitGrid {
    layout: GridLayout,
    state: Vec<bool>,
}

impl UnitGrid {
    /// Creates an all-inactive grid for `n` cities.
    pub fn new(n: usize) -> Self {
        let layout = GridLayout::new(n);
        Self {
            layout,
            state: vec![false; layout.unit_count()],
        }
    }

    /// Creates a grid where every unit is active with probability ½.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let layout = GridLayout::new(n);
        let state = (0..layout.unit_count()).map(|_| rng.random_bool(0.5)).collect();
        Self { layout, state }
    }

    /// Creates a grid with exactly one active unit per position, visiting
    /// `path[p]` at position `p`.
    ///
    /// `path` need not be a permutation: repeated cities produce a grid
    /// that [`TourValidator`](super::TourValidator) rejects.
    pub fn from_path(path: &[usize]) -> Result<Self, TspError> {
        let n = path.len();
        let mut grid = Self::new(n);
        for (position, &city) in path.iter().enumerate() {
            if city >= n {
                return Err(TspError::InvalidConfig(format!(
                    "city {city} at position {position} is out of range for {n} cities"
                )));
            }
            grid.set(position, city, true);
        }
        Ok(grid)
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Number of cities (and positions).
    pub fn city_count(&self) -> usize {
        self.layout.city_count()
    }

    /// Number of units, N².
    pub fn unit_count(&self) -> usize {
        self.state.len()
    }

    /// Whether `city` is visited at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` or `city` is not below the city count.
    #[inline]
    pub fn get(&self, position: usize, city: usize) -> bool {
        self.state[self.layout.index(Unit::new(position, city))]
    }

    /// Activates or clears unit `(position, city)`.
    ///
    /// # Panics
    ///
    /// Panics if `position` or `city` is not below the city count.
    #[inline]
    pub fn set(&mut self, position: usize, city: usize, active: bool) {
        let index = self.layout.index(Unit::new(position, city));
        self.state[index] = active;
    }

    /// State by linear unit index, as handed out by [`GridLayout`].
    #[cfg(test)]
    pub(crate) fn is_active(&self, index: usize) -> bool {
        self.state[index]
    }

    /// Writes a unit by linear index and reports whether it changed.
    #[inline]
    pub(crate) fn write(&mut self, index: usize, active: bool) -> bool {
        let changed = self.state[index] != active;
        self.state[index] = active;
        changed
    }

    pub(crate) fn states(&self) -> &[bool] {
        &self.state
    }

    /// Total number of active units.
    pub fn active_count(&self) -> usize {
        self.state.iter().filter(|&&s| s).count()
    }

    /// Number of active cities at `position`.
    pub fn row_count(&self, position: usize) -> usize {
        self.layout.row(position).filter(|&i| self.state[i]).count()
    }

    /// Number of positions at which `city` is active.
    pub fn column_count(&self, city: usize) -> usize {
        self.layout.column(city).filter(|&i| self.state[i]).count()
    }

    /// Active cities at `position`, in ascending order.
    pub fn active_cities(&self, position: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.city_count()).filter(move |&city| self.get(position, city))
    }

    /// Active units in index order.
    pub fn active_units(&self) -> impl Iterator<Item = Unit> + '_ {
        self.state
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s)
            .map(|(i, _)| self.layout.unit(i))
    }

    /// Net input of unit `(position, city)` minus its firing threshold:
    /// `Σⱼ w[i][j]·s[j] − θ[i]`, with inactive units contributing 0.
    ///
    /// The diagonal weight is zero, so the unit's own state never
    /// contributes.
    pub fn local_activation(&self, position: usize, city: usize, model: &EnergyModel) -> f64 {
        self.activation_at(self.layout.index(Unit::new(position, city)), model)
    }

    pub(crate) fn activation_at(&self, index: usize, model: &EnergyModel) -> f64 {
        let mut net = 0.0;
        for (w, &active) in model.weights_row(index).iter().zip(&self.state) {
            if active {
                net += w;
            }
        }
        net - model.threshold_at(index)
    }
}

/// Renders one bracketed list of active cities per position, joined by
/// `=>`; for example `[0]=>[2]=>[1, 3]=>[]`.
impl fmt::Display for UnitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.city_count();
        for position in 0..n {
            f.write_str("[")?;
            for (k, city) in self.active_cities(position).enumerate() {
                if k > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{city}")?;
            }
            f.write_str("]")?;
            if position + 1 != n {
                f.write_str("=>")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::DistanceMatrix;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_is_inactive() {
        let grid = UnitGrid::new(3);
        assert_eq!(grid.unit_count(), 9);
        assert_eq!(grid.active_count(), 0);
    }

    #[test]
    fn test_set_get() {
        let mut grid = UnitGrid::new(4);
        grid.set(2, 1, true);
        assert!(grid.get(2, 1));
        assert!(!grid.get(1, 2));
        assert_eq!(grid.row_count(2), 1);
        assert_eq!(grid.column_count(1), 1);
        assert_eq!(grid.active_count(), 1);
        grid.set(2, 1, false);
        assert_eq!(grid.active_count(), 0);
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_range_panics() {
        UnitGrid::new(3).get(0, 3);
    }

    #[test]
    fn test_from_path() {
        let grid = UnitGrid::from_path(&[2, 0, 1]).unwrap();
        assert!(grid.get(0, 2));
        assert!(grid.get(1, 0));
        assert!(grid.get(2, 1));
        assert_eq!(grid.active_count(), 3);
    }

    #[test]
    fn test_from_path_out_of_range() {
        assert!(UnitGrid::from_path(&[0, 3, 1]).is_err());
    }

    #[test]
    fn test_random_is_seeded() {
        let a = UnitGrid::random(6, &mut StdRng::seed_from_u64(7));
        let b = UnitGrid::random(6, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_display() {
        let mut grid = UnitGrid::from_path(&[0, 2, 1, 3]).unwrap();
        grid.set(2, 3, true);
        grid.set(3, 3, false);
        assert_eq!(grid.to_string(), "[0]=>[2]=>[1, 3]=>[]");
    }

    #[test]
    fn test_local_activation_matches_definition() {
        let coords = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let d = DistanceMatrix::from_coordinates(&coords, 4).unwrap();
        let model = EnergyModel::new(&d, 10.0).unwrap();
        let grid = UnitGrid::from_path(&[0, 1, 2, 3]).unwrap();

        // Active unit on the perimeter tour: two unit-length legs.
        assert!((grid.local_activation(1, 1, &model) - (5.0 - 2.0)).abs() < 1e-12);

        // Inactive unit (0, 1): conflicts with (0, 0) and (1, 1), plus the
        // diagonal leg to city 3 at the preceding position.
        let expected = -10.0 - 10.0 - 2f64.sqrt() + 5.0;
        assert!((grid.local_activation(0, 1, &model) - expected).abs() < 1e-12);
    }
}
