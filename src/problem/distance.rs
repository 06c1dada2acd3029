//! Pairwise Euclidean distances.

use super::types::City;
use crate::error::TspError;

const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Symmetric N×N distance matrix with a zero diagonal.
///
/// Stored row-major in a single buffer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Computes Euclidean distances between `cities`.
    ///
    /// `expected` is the configured city count; a mismatching input length
    /// fails with [`TspError::InputSizeMismatch`] before any distance is
    /// computed. A non-finite coordinate, or a pair so far apart that its
    /// distance overflows, fails with [`TspError::DegenerateCoordinate`].
    pub fn from_cities(cities: &[City], expected: usize) -> Result<Self, TspError> {
        if cities.len() != expected {
            return Err(TspError::InputSizeMismatch {
                expected,
                actual: cities.len(),
            });
        }
        for city in cities {
            if !city.x.is_finite() || !city.y.is_finite() {
                return Err(TspError::DegenerateCoordinate {
                    index: city.index,
                    x: city.x,
                    y: city.y,
                });
            }
        }

        let n = cities.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = cities[i].distance_to(&cities[j]);
                if !d.is_finite() {
                    let far = &cities[j];
                    return Err(TspError::DegenerateCoordinate {
                        index: far.index,
                        x: far.x,
                        y: far.y,
                    });
                }
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Ok(Self { n, data })
    }

    /// Convenience wrapper over [`City::from_coordinates`] and
    /// [`DistanceMatrix::from_cities`].
    pub fn from_coordinates(coordinates: &[(f64, f64)], expected: usize) -> Result<Self, TspError> {
        if coordinates.len() != expected {
            return Err(TspError::InputSizeMismatch {
                expected,
                actual: coordinates.len(),
            });
        }
        let cities = City::from_coordinates(coordinates)?;
        Self::from_cities(&cities, expected)
    }

    /// Wraps a precomputed matrix after checking that it is square, finite,
    /// non-negative, symmetric and has a zero diagonal.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, TspError> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(TspError::InvalidDistanceMatrix(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            data.extend(row);
        }

        for i in 0..n {
            if data[i * n + i] != 0.0 {
                return Err(TspError::InvalidDistanceMatrix(format!(
                    "diagonal entry {i} is {}, expected 0",
                    data[i * n + i]
                )));
            }
            for j in 0..n {
                let d = data[i * n + j];
                if !d.is_finite() || d < 0.0 {
                    return Err(TspError::InvalidDistanceMatrix(format!(
                        "entry ({i}, {j}) = {d} is not a finite non-negative distance"
                    )));
                }
                if (d - data[j * n + i]).abs() > SYMMETRY_TOLERANCE {
                    return Err(TspError::InvalidDistanceMatrix(format!(
                        "entries ({i}, {j}) and ({j}, {i}) differ"
                    )));
                }
            }
        }
        Ok(Self { n, data })
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between cities `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn get(&self, a: usize, b: usize) -> f64 {
        self.data[a * self.n + b]
    }

    /// Distances from city `a` to every city.
    pub fn row(&self, a: usize) -> &[f64] {
        &self.data[a * self.n..(a + 1) * self.n]
    }

    /// Largest pairwise distance, 0 for fewer than two cities.
    pub fn max_distance(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }
}
