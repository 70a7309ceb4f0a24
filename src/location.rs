use std::fmt::{Display, Formatter};
use std::num::NonZero;

use ndarray::Ix;
use serde::{Deserialize, Serialize};

pub(crate) type Coord = usize;
/// Side length of a square grid.
pub type Dimension = NonZero<Coord>;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug, Serialize, Deserialize)]
/// A location `(row, column)` on a grid. The top left corner is `Location(0, 0)`.
///
/// Ordering is row-major, so the derived [`Ord`] agrees with the layout of the backing array.
pub struct Location(pub Coord, pub Coord);

impl Location {
    /// The row of this location.
    pub fn row(&self) -> Coord {
        self.0
    }

    /// The column of this location.
    pub fn column(&self) -> Coord {
        self.1
    }

    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.0, self.1)
    }

    // off-grid steps wrap around to huge coordinates, which no grid contains
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }

    pub(crate) fn is_within(&self, size: Dimension) -> bool {
        self.0 < size.get() && self.1 < size.get()
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.0, value.1)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}
