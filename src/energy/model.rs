//! Weight matrix and thresholds.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::TspError;
use crate::grid::{GridLayout, Unit, UnitGrid};
use crate::problem::DistanceMatrix;

/// Immutable weights and thresholds for an N-city instance.
///
/// # Examples
///
/// ```
/// use u_boltzmann::energy::EnergyModel;
/// use u_boltzmann::grid::Unit;
/// use u_boltzmann::problem::DistanceMatrix;
///
/// let d = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (3.0, 4.0), (6.0, 0.0)], 3).unwrap();
/// let model = EnergyModel::new(&d, 20.0).unwrap();
///
/// // Same city at two positions: inhibited.
/// assert_eq!(model.weight(Unit::new(0, 1), Unit::new(2, 1)), -20.0);
/// // Adjacent positions: negated leg length.
/// assert_eq!(model.weight(Unit::new(0, 0), Unit::new(1, 1)), -5.0);
/// assert_eq!(model.threshold(Unit::new(1, 2)), -10.0);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyModel {
    layout: GridLayout,
    penalty: f64,
    /// Row-major N²×N² weights.
    weights: Vec<f64>,
    thresholds: Vec<f64>,
}

impl EnergyModel {
    /// Builds the model from a distance matrix and a penalty constant.
    ///
    /// `penalty` must be positive and finite. For valid tours to be stable
    /// it should exceed twice the largest sum of two legs meeting at a city; this
    /// is a tuning contract and is not checked.
    pub fn new(distances: &DistanceMatrix, penalty: f64) -> Result<Self, TspError> {
        if !penalty.is_finite() || penalty <= 0.0 {
            return Err(TspError::InvalidConfig(format!(
                "penalty must be positive and finite, got {penalty}"
            )));
        }

        let layout = GridLayout::new(distances.len());
        let units = layout.unit_count();
        let mut weights = vec![0.0; units * units];

        let fill_row = |from: usize, row: &mut [f64]| {
            let from = layout.unit(from);
            for (to, w) in row.iter_mut().enumerate() {
                *w = pair_weight(&layout, distances, penalty, from, layout.unit(to));
            }
        };

        if units > 0 {
            #[cfg(feature = "parallel")]
            weights
                .par_chunks_mut(units)
                .enumerate()
                .for_each(|(from, row)| fill_row(from, row));

            #[cfg(not(feature = "parallel"))]
            weights
                .chunks_mut(units)
                .enumerate()
                .for_each(|(from, row)| fill_row(from, row));
        }

        Ok(Self {
            layout,
            penalty,
            weights,
            thresholds: vec![-0.5 * penalty; units],
        })
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn city_count(&self) -> usize {
        self.layout.city_count()
    }

    pub fn unit_count(&self) -> usize {
        self.layout.unit_count()
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// Interaction weight between two units.
    pub fn weight(&self, from: Unit, to: Unit) -> f64 {
        let units = self.unit_count();
        self.weights[self.layout.index(from) * units + self.layout.index(to)]
    }

    /// Firing threshold of a unit.
    pub fn threshold(&self, unit: Unit) -> f64 {
        self.thresholds[self.layout.index(unit)]
    }

    /// All thresholds in layout order.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    #[inline]
    pub(crate) fn threshold_at(&self, index: usize) -> f64 {
        self.thresholds[index]
    }

    /// Weights from the unit at `index` to every unit, in layout order.
    #[inline]
    pub(crate) fn weights_row(&self, index: usize) -> &[f64] {
        let units = self.unit_count();
        &self.weights[index * units..(index + 1) * units]
    }

    /// Whether `w[i][j] == w[j][i]` (within `tolerance`) and `w[i][i] == 0`
    /// for every pair.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let units = self.unit_count();
        (0..units).all(|i| {
            self.weights[i * units + i] == 0.0
                && ((i + 1)..units).all(|j| {
                    (self.weights[i * units + j] - self.weights[j * units + i]).abs() <= tolerance
                })
        })
    }

    /// Network energy `-½ Σᵢⱼ wᵢⱼ sᵢ sⱼ + Σᵢ θᵢ sᵢ` of a grid state.
    ///
    /// For a valid tour of length `L` over N ≥ 3 cities this equals
    /// `L - ½·N·penalty`.
    pub fn energy(&self, grid: &UnitGrid) -> f64 {
        let states = grid.states();
        let mut pair_sum = 0.0;
        let mut bias_sum = 0.0;
        for (i, _) in states.iter().enumerate().filter(|&(_, &s)| s) {
            let row = self.weights_row(i);
            pair_sum += states
                .iter()
                .zip(row)
                .filter(|&(&s, _)| s)
                .map(|(_, w)| w)
                .sum::<f64>();
            bias_sum += self.thresholds[i];
        }
        -0.5 * pair_sum + bias_sum
    }
}

/// Weight between two units.
///
/// Constraint inhibition takes precedence over the distance coupling, so a
/// unit pair sharing a city is never also treated as a leg.
fn pair_weight(
    layout: &GridLayout,
    distances: &DistanceMatrix,
    penalty: f64,
    from: Unit,
    to: Unit,
) -> f64 {
    if from == to {
        0.0
    } else if from.conflicts_with(&to) {
        -penalty
    } else if layout.adjacent(from.position, to.position) {
        -distances.get(from.city, to.city)
    } else {
        0.0
    }
}
