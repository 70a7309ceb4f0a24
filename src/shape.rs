use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::location::Location;

/// The four axis-aligned steps between units of a square grid.
///
/// Variants are declared clockwise from the top, matching the bit order of [`Borders`].
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub enum SquareStep {
    /// Toward decreasing rows.
    Up,
    /// Toward increasing columns.
    Right,
    /// Toward increasing rows.
    Down,
    /// Toward decreasing columns.
    Left,
}

impl SquareStep {
    /// Directions which, upon stepping from one location to another, lead to a location ordered higher than the origin.
    pub const FORWARD_VARIANTS: &'static [Self] = &[Self::Right, Self::Down];

    /// Attempt the step from `location` in the direction specified by `self` and return the resultant [`Location`].
    ///
    /// The result is not bounds-checked; stepping off the top or left edge yields a location no grid contains.
    pub fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((-1, 0)),
            Self::Right => location.offset_by((0, 1)),
            Self::Down => location.offset_by((1, 0)),
            Self::Left => location.offset_by((0, -1)),
        }
    }

    /// Invert the direction specified by `self`.
    pub fn invert(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// Convert this step to a forward direction, if it is not already one.
    ///
    /// See [`Self::FORWARD_VARIANTS`].
    pub fn ensure_forward(&self) -> Self {
        match Self::FORWARD_VARIANTS.contains(self) {
            true => *self,
            false => self.invert(),
        }
    }

    /// All theoretical neighbours of `location`, paired with the step leading to each.
    pub fn neighbors_of(location: Location) -> impl Iterator<Item = (Self, Location)> {
        Self::VARIANTS.iter().map(move |dir| (*dir, dir.attempt_from(location)))
    }

    /// Determine the direction from `a` to `b`, or [`None`] if the two are not adjacent.
    pub fn direction_to(a: Location, b: Location) -> Option<Self> {
        Self::VARIANTS.iter().find(|dir| dir.attempt_from(a) == b).copied()
    }

    const fn bit(&self) -> u8 {
        match self {
            Self::Up => 0b0001,
            Self::Right => 0b0010,
            Self::Down => 0b0100,
            Self::Left => 0b1000,
        }
    }

    /// Dump the specified [`Array2`] one row per line.
    pub(crate) fn print(board: Array2<char>) -> String {
        let mut out = String::with_capacity(board.nrows() * (board.ncols() + 1));

        for row in board.rows() {
            for col in row {
                out.push(*col);
            }
            out.push('\n');
        }

        out
    }
}

/// Which sides of a unit face outside its district.
///
/// Unassigned units carry [`Borders::NONE`]. So does an assigned unit whose four neighbours all share its district,
/// so ownership must never be inferred from this value alone.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Borders(u8);

impl Borders {
    /// No borders at all; the value carried by unassigned units.
    pub const NONE: Self = Self(0);
    /// Every side bordered, as for a lone unit.
    pub const ALL: Self = Self(0b1111);

    /// Whether the side facing `step` is bordered.
    pub fn contains(&self, step: SquareStep) -> bool {
        self.0 & step.bit() != 0
    }

    /// Mark the side facing `step` as bordered.
    pub fn insert(&mut self, step: SquareStep) {
        self.0 |= step.bit();
    }

    /// Clear the side facing `step`.
    pub fn remove(&mut self, step: SquareStep) {
        self.0 &= !step.bit();
    }

    /// Whether no side is bordered.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The bordered sides, clockwise from the top.
    pub fn sides(&self) -> impl Iterator<Item = SquareStep> + '_ {
        SquareStep::VARIANTS.iter().copied().filter(|step| self.contains(*step))
    }

    /// The raw bitmask; bit 0 is the top, then right, bottom, left.
    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl FromIterator<SquareStep> for Borders {
    fn from_iter<T: IntoIterator<Item = SquareStep>>(iter: T) -> Self {
        let mut borders = Self::NONE;
        iter.into_iter().for_each(|step| borders.insert(step));
        borders
    }
}

impl std::fmt::Debug for Borders {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Borders({})", self)
    }
}

impl Display for Borders {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        write!(f, "{}", self.sides().map(|step| format!("{step:?}")).join("|"))
    }
}
