use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::location::Location;
use crate::shape::Borders;
use crate::tribe::Tribe;

/// Non-owning handle to a [`District`](crate::District), resolved through the owning [`Game`](crate::Game).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct DistrictId(pub(crate) usize);

impl DistrictId {
    /// Position of the district in [`Game::all_districts`](crate::Game::all_districts).
    pub fn index(&self) -> usize {
        self.0
    }

    // 1-9, then a-z, then give up
    pub(crate) fn symbol(&self) -> char {
        char::from_digit(self.0 as u32 + 1, 36).unwrap_or('#')
    }
}

impl Display for DistrictId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "District {}", self.0 + 1)
    }
}

/// One grid unit as seen by collaborators.
///
/// `tribe` and `address` never change. `borders` and `district` are outputs of the engine,
/// rewritten only while a [`Game`](crate::Game) applies the border updates of a toggle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Constituent {
    pub(crate) tribe: Tribe,
    pub(crate) address: Location,
    pub(crate) borders: Borders,
    pub(crate) district: Option<DistrictId>,
}

impl Constituent {
    pub(crate) fn new(tribe: Tribe, address: Location) -> Self {
        Self {
            tribe,
            address,
            borders: Borders::NONE,
            district: None,
        }
    }

    /// The faction of this unit.
    pub fn tribe(&self) -> Tribe {
        self.tribe
    }

    /// The grid address of this unit.
    pub fn address(&self) -> Location {
        self.address
    }

    /// Sides of this unit on the boundary of its district; [`Borders::NONE`] when unassigned.
    pub fn borders(&self) -> Borders {
        self.borders
    }

    /// The district currently owning this unit, if any.
    pub fn district(&self) -> Option<DistrictId> {
        self.district
    }
}
