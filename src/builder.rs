//! Validated construction of a [`Game`] from a distribution or a blank grid.

use std::num::NonZero;
use std::ops::IndexMut;

use itertools::Itertools;
use ndarray::{Array2, AssignElem};
use thiserror::Error;

use crate::constituent::{Constituent, DistrictId};
use crate::district::District;
use crate::game::Game;
use crate::location::{Dimension, Location};
use crate::tribe::Tribe;

/// Reasons a builder may become invalid while building.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum InvalidReason {
    /// The distribution had no rows at all.
    #[error("the distribution has no rows")]
    EmptyDistribution,
    /// A row of the distribution is not as long as the distribution is tall.
    #[error("row {row} holds {len} units but the distribution has {rows} rows")]
    NotSquare {
        /// Index of the offending row.
        row: usize,
        /// Number of units in that row.
        len: usize,
        /// Number of rows in the distribution.
        rows: usize,
    },
    /// Districts must hold at least one unit.
    #[error("districts must hold at least one unit")]
    ZeroDistrictSize,
    /// The units of the grid cannot be split into districts of the requested size.
    #[error("{units} units cannot be split evenly into districts of {district_size}")]
    Indivisible {
        /// Units on the grid.
        units: usize,
        /// Requested district size.
        district_size: usize,
    },
    /// A unit was addressed outside the grid.
    #[error("{location} lies outside a grid of side {size}")]
    OutOfBounds {
        /// The offending address.
        location: Location,
        /// Side length of the grid.
        size: usize,
    },
}

/// Every reason a [`GameBuilder`] refused to build.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("invalid game configuration: {}", .reasons.iter().join("; "))]
pub struct BuildError {
    /// Reasons in the order they were found.
    pub reasons: Vec<InvalidReason>,
}

/// Builds a [`Game`] from a grid of tribes and a district size.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Problems are collected as [`InvalidReason`]s and reported together by [`Self::build`].
#[derive(Clone, Debug)]
pub struct GameBuilder {
    // None when the distribution was unusable
    size: Option<Dimension>,
    tribes: Array2<Tribe>,
    district_size: usize,
    invalid_reasons: Vec<InvalidReason>,
}

impl GameBuilder {
    /// Construct a builder for a `size` by `size` grid of Red units.
    pub fn with_size(size: Dimension) -> Self {
        Self {
            size: Some(size),
            tribes: Array2::from_elem((size.get(), size.get()), Tribe::Red),
            district_size: 0,
            invalid_reasons: Default::default(),
        }
    }

    /// Construct a builder from rows of distribution characters; see [`Tribe`] for how characters are read.
    ///
    /// The distribution must be square, i.e. each row must be as long as there are rows.
    pub fn from_distribution<S: AsRef<str>>(distribution: &[S]) -> Self {
        let rows = distribution.iter()
            .map(|row| row.as_ref().chars().collect_vec())
            .collect_vec();

        let mut invalid_reasons = Vec::new();
        if rows.is_empty() {
            invalid_reasons.push(InvalidReason::EmptyDistribution);
        }
        invalid_reasons.extend(rows.iter()
            .enumerate()
            .filter(|(_, row)| row.len() != rows.len())
            .map(|(index, row)| InvalidReason::NotSquare { row: index, len: row.len(), rows: rows.len() }));

        let size = match invalid_reasons.is_empty() {
            true => NonZero::new(rows.len()),
            false => None,
        };
        let tribes = match size {
            Some(size) => Array2::from_shape_fn((size.get(), size.get()), |(row, col)| Tribe::from(rows[row][col])),
            None => Array2::from_elem((0, 0), Tribe::Red),
        };

        Self {
            size,
            tribes,
            district_size: 0,
            invalid_reasons,
        }
    }

    /// Set the number of units every district must hold.
    pub fn district_size(&mut self, district_size: usize) -> &mut Self {
        self.district_size = district_size;
        self
    }

    /// Assign `tribe` to the unit at `location`.
    ///
    /// May cause the builder to enter an [`OutOfBounds`](InvalidReason::OutOfBounds) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn set_tribe(&mut self, location: Location, tribe: Tribe) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        let Some(size) = self.size else {
            return self;
        };
        if !location.is_within(size) {
            self.invalid_reasons.push(InvalidReason::OutOfBounds { location, size: size.get() });
            return self;
        }

        self.tribes.index_mut(location.as_index()).assign_elem(tribe);
        self
    }

    /// Check the validity of this builder so far.
    ///
    /// Returns `None` if no problem has been found yet. The district size is only checked by [`Self::build`].
    pub fn is_valid(&self) -> Option<&Vec<InvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Game`] with every district empty and the first one current.
    pub fn build(&self) -> Result<Game, BuildError> {
        let mut reasons = self.invalid_reasons.clone();

        let district_size = NonZero::new(self.district_size);
        if district_size.is_none() {
            reasons.push(InvalidReason::ZeroDistrictSize);
        }

        let (Some(size), Some(district_size), true) = (self.size, district_size, reasons.is_empty()) else {
            return Err(BuildError { reasons });
        };

        let units = size.get() * size.get();
        if units % district_size.get() != 0 {
            reasons.push(InvalidReason::Indivisible { units, district_size: district_size.get() });
            return Err(BuildError { reasons });
        }

        let constituents = Array2::from_shape_fn(self.tribes.raw_dim(), |ind| {
            Constituent::new(self.tribes[ind], Location::from(ind))
        });
        let districts = (0..units / district_size.get())
            .map(|_| District::new(district_size))
            .collect_vec();

        tracing::debug!(size = size.get(), district_size = district_size.get(), districts = districts.len(), "built game");

        Ok(Game {
            size,
            constituents,
            districts,
            current: DistrictId(0),
        })
    }
}
