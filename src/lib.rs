#![warn(missing_docs)]

//! # `gerrymander`
//!
//! The district-assignment engine of a districting puzzle: a square grid of units, each belonging to one of two
//! [`Tribe`]s, must be split into equally sized contiguous districts so that the player's tribe wins a majority of
//! districts despite losing the popular vote.
//!
//! Begin by building a [`Game`], either with [`Game::new`] from rows of distribution characters or with a
//! [`GameBuilder`], or pick a ready-made [`Puzzle`](puzzle::Puzzle) from a [`Catalog`](puzzle::Catalog).
//! Then feed it [`Action`]s through [`Game::dispatch`] and read back the projected state:
//! every [`Constituent`] knows its [`Borders`] and owning [`DistrictId`], every [`District`] its
//! [`DistrictState`] and [`DistrictResult`].
//!
//! # Internals
//! Each district keeps its units keyed by [`Location`] together with an undirected graph of the edges they share.
//! Toggling a unit touches at most the unit and its four neighbours, so border changes are computed incrementally
//! and returned as a batch which the game applies to its grid in one go.
//! Contiguity is a depth-first walk over the shared-edge graph from an arbitrary unit: the district is contiguous
//! if and only if the walk reaches every unit.
//!
//! A unit may belong to at most one district. The game enforces this before a toggle reaches a district,
//! and a district enforces its own size limit before inserting, so a rejected command never leaves partial changes.

pub use assigned::{AssignedConstituent, BorderUpdate, BorderUpdateBatch};
pub use builder::{BuildError, GameBuilder, InvalidReason};
pub use constituent::{Constituent, DistrictId};
pub use district::{Change, District, DistrictResult, DistrictState, ToggleOutcome};
pub use game::{Action, DistrictSnapshot, Game, GameSnapshot, Rejection};
pub use location::{Dimension, Location};
pub use shape::{Borders, SquareStep};
pub use tribe::Tribe;

pub(crate) mod assigned;
pub mod builder;
pub(crate) mod constituent;
pub(crate) mod district;
pub(crate) mod game;
pub(crate) mod location;
pub mod puzzle;
pub(crate) mod shape;
pub(crate) mod tribe;
