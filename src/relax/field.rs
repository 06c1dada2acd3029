//! Cached net inputs.

use crate::energy::EnergyModel;
use crate::grid::UnitGrid;

/// Net input `hᵢ = Σⱼ wᵢⱼ sⱼ` of every unit, kept in step with the grid.
///
/// A flip of unit `j` shifts every `hᵢ` by `±wᵢⱼ`, so maintaining the cache
/// costs O(N²) per flip instead of O(N²) per visited unit.
#[derive(Debug, Clone)]
pub(crate) struct LocalField {
    net: Vec<f64>,
}

impl LocalField {
    pub(crate) fn new(grid: &UnitGrid, model: &EnergyModel) -> Self {
        let mut net = vec![0.0; model.unit_count()];
        for (j, _) in grid.states().iter().enumerate().filter(|&(_, &s)| s) {
            for (h, w) in net.iter_mut().zip(model.weights_row(j)) {
                *h += w;
            }
        }
        Self { net }
    }

    /// Local activation `hᵢ − θᵢ`.
    #[inline]
    pub(crate) fn activation(&self, index: usize, model: &EnergyModel) -> f64 {
        self.net[index] - model.threshold_at(index)
    }

    /// Records that unit `index` has just become `active`.
    pub(crate) fn apply_flip(&mut self, index: usize, active: bool, model: &EnergyModel) {
        let delta = if active { 1.0 } else { -1.0 };
        // Symmetric weights: column `index` equals row `index`.
        for (h, w) in self.net.iter_mut().zip(model.weights_row(index)) {
            *h += delta * w;
        }
    }
}
