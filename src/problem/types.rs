//! City coordinates.

use crate::error::TspError;

/// A city on the plane, identified by its index in the input sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    /// Position in the input sequence, in `[0, N)`.
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

impl City {
    /// Creates a city, rejecting non-finite coordinates.
    pub fn new(index: usize, x: f64, y: f64) -> Result<Self, TspError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(TspError::DegenerateCoordinate { index, x, y });
        }
        Ok(Self { index, x, y })
    }

    /// Euclidean distance to another city.
    pub fn distance_to(&self, other: &City) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Builds an indexed city list from raw coordinate pairs.
    pub fn from_coordinates(coordinates: &[(f64, f64)]) -> Result<Vec<City>, TspError> {
        coordinates
            .iter()
            .enumerate()
            .map(|(index, &(x, y))| City::new(index, x, y))
            .collect()
    }
}
