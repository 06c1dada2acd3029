//! Addressing of units in the flattened grid.

/// A single unit of the grid: "city `city` is visited at `position`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Unit {
    pub position: usize,
    pub city: usize,
}

impl Unit {
    pub fn new(position: usize, city: usize) -> Self {
        Self { position, city }
    }

    /// Whether two distinct units compete for the same city or position.
    pub fn conflicts_with(&self, other: &Unit) -> bool {
        self != other && (self.city == other.city || self.position == other.position)
    }
}

/// Row-major layout of an N×N grid: `index = position * N + city`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    n: usize,
}

impl GridLayout {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Number of cities (and positions).
    #[inline]
    pub fn city_count(&self) -> usize {
        self.n
    }

    /// Number of units, N².
    #[inline]
    pub fn unit_count(&self) -> usize {
        self.n * self.n
    }

    /// # Panics
    ///
    /// Panics if the unit lies outside the grid.
    #[inline]
    pub fn index(&self, unit: Unit) -> usize {
        assert!(
            unit.position < self.n && unit.city < self.n,
            "unit {unit:?} outside a {0}x{0} grid",
            self.n
        );
        unit.position * self.n + unit.city
    }

    #[inline]
    pub fn unit(&self, index: usize) -> Unit {
        debug_assert!(index < self.unit_count());
        Unit {
            position: index / self.n,
            city: index % self.n,
        }
    }

    /// Position visited before `position` on the cyclic tour.
    #[inline]
    pub fn predecessor(&self, position: usize) -> usize {
        if position == 0 {
            self.n - 1
        } else {
            position - 1
        }
    }

    /// Position visited after `position` on the cyclic tour.
    #[inline]
    pub fn successor(&self, position: usize) -> usize {
        if position + 1 == self.n {
            0
        } else {
            position + 1
        }
    }

    /// Whether `a` and `b` are consecutive positions on the cyclic tour.
    #[inline]
    pub fn adjacent(&self, a: usize, b: usize) -> bool {
        a == self.predecessor(b) || a == self.successor(b)
    }

    /// All units in index order.
    pub fn units(&self) -> impl Iterator<Item = Unit> {
        let layout = *self;
        (0..self.unit_count()).map(move |i| layout.unit(i))
    }

    /// Linear indices of the units in row `position`.
    pub fn row(&self, position: usize) -> impl Iterator<Item = usize> {
        let start = position * self.n;
        start..start + self.n
    }

    /// Linear indices of the units in column `city`.
    pub fn column(&self, city: usize) -> impl Iterator<Item = usize> {
        let n = self.n;
        (0..n).map(move |position| position * n + city)
    }
}
