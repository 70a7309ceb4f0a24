use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::{BuildError, GameBuilder};
use crate::constituent::{Constituent, DistrictId};
use crate::district::{Change, District, DistrictResult, DistrictState};
use crate::location::{Dimension, Location};
use crate::shape::SquareStep;
use crate::tribe::Tribe;

/// Commands accepted by [`Game::dispatch`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Add the unit at `coordinates` to the current district, or remove it if already there.
    ToggleUnit {
        /// Address of the unit.
        coordinates: Location,
    },
    /// Make the district at `index` current, or the next one (wrapping around) if no index is given.
    SwitchDistrict {
        /// Position in [`Game::all_districts`].
        index: Option<usize>,
    },
}

/// Why a command left the game untouched.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Rejection {
    /// The toggled address is not on the grid.
    #[error("{address} is not on the grid")]
    OutOfBounds {
        /// The requested address.
        address: Location,
    },
    /// The toggled unit is committed to a district other than the current one.
    #[error("{address} already belongs to {owner}")]
    OwnedByOtherDistrict {
        /// The requested address.
        address: Location,
        /// The district holding it.
        owner: DistrictId,
    },
    /// The current district already holds as many units as it can.
    #[error("{district} is already full")]
    DistrictFull {
        /// The current district.
        district: DistrictId,
    },
    /// No district sits at the requested index.
    #[error("there is no district at index {index}")]
    NoSuchDistrict {
        /// The requested index.
        index: usize,
    },
}

/// A square grid of units split into equally sized districts, one of which is current.
///
/// The grid owns every [`District`] and [`Constituent`]. All mutation goes through [`Self::dispatch`],
/// which either applies a command completely or rejects it without touching anything.
#[derive(Clone, Debug)]
pub struct Game {
    pub(crate) size: Dimension,
    pub(crate) constituents: Array2<Constituent>,
    pub(crate) districts: Vec<District>,
    pub(crate) current: DistrictId,
}

impl Game {
    /// Build a game from rows of distribution characters and the number of units per district.
    ///
    /// Fails if the distribution is not square or its units do not split evenly into districts.
    pub fn new<S: AsRef<str>>(distribution: &[S], district_size: usize) -> Result<Self, BuildError> {
        GameBuilder::from_distribution(distribution)
            .district_size(district_size)
            .build()
    }

    /// Apply `action`.
    pub fn dispatch(&mut self, action: Action) -> Result<(), Rejection> {
        let outcome = match action {
            Action::ToggleUnit { coordinates } => self.toggle_unit(coordinates),
            Action::SwitchDistrict { index } => self.switch_district(index),
        };

        if let Err(rejection) = &outcome {
            tracing::debug!(?action, %rejection, "rejected command");
        }
        outcome
    }

    fn toggle_unit(&mut self, address: Location) -> Result<(), Rejection> {
        let current = self.current;
        let Some(constituent) = self.constituents.get(address.as_index()) else {
            return Err(Rejection::OutOfBounds { address });
        };
        if let Some(owner) = constituent.district.filter(|owner| *owner != current) {
            return Err(Rejection::OwnedByOtherDistrict { address, owner });
        }

        let outcome = self.districts[current.0].toggle(constituent);
        if outcome.change == Change::Rejected {
            return Err(Rejection::DistrictFull { district: current });
        }

        // ownership comes from the district itself; a fully enclosed unit has no borders but is still assigned
        let district = &self.districts[current.0];
        for update in &outcome.border_updates {
            if let Some(target) = self.constituents.get_mut(update.address.as_index()) {
                target.borders = update.borders;
                target.district = district.contains(update.address).then_some(current);
                tracing::trace!(address = %update.address, borders = %update.borders, "applied border update");
            }
        }

        tracing::debug!(
            %address,
            district = current.0,
            change = ?outcome.change,
            state = %outcome.state,
            updates = outcome.border_updates.len(),
            "toggled unit"
        );
        Ok(())
    }

    fn switch_district(&mut self, index: Option<usize>) -> Result<(), Rejection> {
        let next = match index {
            Some(index) if index < self.districts.len() => index,
            Some(index) => return Err(Rejection::NoSuchDistrict { index }),
            None => (self.current.0 + 1) % self.districts.len(),
        };

        self.current = DistrictId(next);
        tracing::debug!(district = next, "switched district");
        Ok(())
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size.get()
    }

    /// Every unit, in row-major order.
    pub fn all_constituents(&self) -> impl Iterator<Item = &Constituent> {
        self.constituents.iter()
    }

    /// The unit at `address`, if it is on the grid.
    pub fn constituent(&self, address: Location) -> Option<&Constituent> {
        self.constituents.get(address.as_index())
    }

    /// Every district, in index order.
    pub fn all_districts(&self) -> &[District] {
        &self.districts
    }

    /// Resolve a [`DistrictId`] handle.
    pub fn district(&self, id: DistrictId) -> Option<&District> {
        self.districts.get(id.0)
    }

    /// Handles to every district, in index order.
    pub fn district_ids(&self) -> impl Iterator<Item = DistrictId> {
        (0..self.districts.len()).map(DistrictId)
    }

    /// The district receiving toggles.
    pub fn current_district(&self) -> &District {
        &self.districts[self.current.0]
    }

    /// Handle to the district receiving toggles.
    pub fn current_district_id(&self) -> DistrictId {
        self.current
    }

    /// Number of units per tribe across the whole grid.
    pub fn popular_vote(&self) -> HashMap<Tribe, usize> {
        self.constituents.iter().map(Constituent::tribe).counts()
    }

    /// Whether every district is complete.
    pub fn is_settled(&self) -> bool {
        self.districts.iter().all(|district| district.state() == DistrictState::Complete)
    }

    /// A serialisable copy of everything collaborators may read.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            size: self.size.get(),
            current_district: self.current,
            districts: self.districts.iter()
                .map(|district| DistrictSnapshot {
                    state: district.state(),
                    result: district.result(),
                    members: district.assigned_constituents().iter().map(|unit| unit.address()).collect_vec(),
                })
                .collect_vec(),
            constituents: self.constituents.iter().copied().collect_vec(),
        }
    }
}

/// Serialisable read model of a [`Game`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GameSnapshot {
    /// Side length of the grid.
    pub size: usize,
    /// The district receiving toggles.
    pub current_district: DistrictId,
    /// Every district, in index order.
    pub districts: Vec<DistrictSnapshot>,
    /// Every unit, in row-major order.
    pub constituents: Vec<Constituent>,
}

/// Serialisable read model of a [`District`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DistrictSnapshot {
    /// Lifecycle state.
    pub state: DistrictState,
    /// Electoral result.
    pub result: DistrictResult,
    /// Assigned addresses, in row-major order.
    pub members: Vec<Location>,
}

impl Display for Game {
    /// One character per unit: the symbol of its district if assigned, otherwise its tribe in upper case.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", SquareStep::print(self.constituents.map(|constituent| match constituent.district {
            Some(id) => id.symbol(),
            None => constituent.tribe.display(),
        })))
    }
}
