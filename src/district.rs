use std::fmt::{Display, Formatter};
use std::num::NonZero;

use itertools::Itertools;
use serde::Serialize;
use strum::VariantArray;

use crate::assigned::{AssignedConstituent, BorderUpdateBatch, UnitMap};
use crate::constituent::Constituent;
use crate::location::Location;
use crate::shape::SquareStep;
use crate::tribe::Tribe;

/// Lifecycle of a district, derived after every toggle.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, VariantArray, strum::Display, strum::EnumString, Serialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistrictState {
    /// No units.
    #[default]
    Empty,
    /// Fewer units than the district size, all contiguous.
    Incomplete,
    /// Units that do not form one contiguous group.
    Invalid,
    /// Exactly as many units as the district size, all contiguous.
    Complete,
}

/// Electoral result of a district; settled only while the district is [`Complete`](DistrictState::Complete).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, VariantArray, strum::Display, strum::EnumString, Serialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistrictResult {
    /// The district is not complete.
    #[default]
    NotSettled,
    /// Red holds the majority.
    Red,
    /// Blue holds the majority.
    Blue,
    /// Both tribes have the same number of units.
    Draw,
}

impl DistrictResult {
    /// The tribe that won, if any did.
    pub fn winner(&self) -> Option<Tribe> {
        match self {
            Self::Red => Some(Tribe::Red),
            Self::Blue => Some(Tribe::Blue),
            Self::NotSettled | Self::Draw => None,
        }
    }
}

impl From<Tribe> for DistrictResult {
    fn from(value: Tribe) -> Self {
        match value {
            Tribe::Red => Self::Red,
            Tribe::Blue => Self::Blue,
        }
    }
}

/// What a toggle did to the district's membership.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Change {
    /// The unit joined the district.
    Added,
    /// The unit left the district.
    Removed,
    /// The district was full; nothing changed.
    Rejected,
}

/// Outcome of [`District::toggle`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ToggleOutcome {
    /// State of the district after the toggle.
    pub state: DistrictState,
    /// Borders of every unit the toggle touched. Callers must apply the whole batch.
    pub border_updates: BorderUpdateBatch,
    /// How membership changed.
    pub change: Change,
}

/// A size-bounded group of units, valid once contiguous and full.
///
/// The only mutation is [`Self::toggle`]; state and result are derived from the assigned units after each one.
#[derive(Clone, Debug)]
pub struct District {
    district_size: NonZero<usize>,
    units: UnitMap,
    state: DistrictState,
    result: DistrictResult,
}

impl District {
    /// An empty district that completes at `district_size` units.
    pub fn new(district_size: NonZero<usize>) -> Self {
        Self {
            district_size,
            units: UnitMap::with_capacity(district_size.get()),
            state: DistrictState::Empty,
            result: DistrictResult::NotSettled,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DistrictState {
        self.state
    }

    /// Current result; [`DistrictResult::NotSettled`] unless [`Complete`](DistrictState::Complete).
    pub fn result(&self) -> DistrictResult {
        self.result
    }

    /// The number of units this district holds when complete.
    pub fn district_size(&self) -> usize {
        self.district_size.get()
    }

    /// The number of units currently assigned.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether no unit is assigned.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Whether the unit at `address` is assigned to this district.
    pub fn contains(&self, address: Location) -> bool {
        self.units.contains(&address)
    }

    /// The assigned unit at `address`, if any.
    pub fn get(&self, address: Location) -> Option<&AssignedConstituent> {
        self.units.get(&address)
    }

    /// All assigned units, in row-major order.
    pub fn assigned_constituents(&self) -> Vec<&AssignedConstituent> {
        self.units.values().sorted_by_key(|unit| unit.address()).collect_vec()
    }

    /// Every edge shared by two assigned units, as `(lower, higher, forward direction from lower)`.
    pub fn shared_edges(&self) -> impl Iterator<Item = (Location, Location, SquareStep)> + '_ {
        self.units.links()
    }

    /// Add `constituent` if absent, remove it if present.
    ///
    /// Adding to a full district is rejected: the state is returned unchanged along with an empty batch.
    pub fn toggle(&mut self, constituent: &Constituent) -> ToggleOutcome {
        let address = constituent.address();

        if self.units.contains(&address) {
            self.handle_removal(address)
        } else {
            self.handle_addition(AssignedConstituent::new(constituent))
        }
    }

    fn handle_addition(&mut self, unit: AssignedConstituent) -> ToggleOutcome {
        // a lone unit is contiguous, and only complete in districts of one
        if self.units.is_empty() {
            let border_updates = self.units.insert(unit);
            let state = match self.is_full() {
                true => DistrictState::Complete,
                false => DistrictState::Incomplete,
            };
            return self.settle(state, border_updates, Change::Added);
        }

        if self.is_full() {
            return ToggleOutcome {
                state: self.state,
                border_updates: Vec::new(),
                change: Change::Rejected,
            };
        }

        let border_updates = self.units.insert(unit);

        let state = if !self.units.is_contiguous() {
            DistrictState::Invalid
        } else if self.is_full() {
            DistrictState::Complete
        } else {
            DistrictState::Incomplete
        };

        self.settle(state, border_updates, Change::Added)
    }

    fn handle_removal(&mut self, address: Location) -> ToggleOutcome {
        let border_updates = self.units.remove(address).unwrap_or_default();

        let state = if self.units.is_empty() {
            DistrictState::Empty
        } else if !self.units.is_contiguous() {
            DistrictState::Invalid
        } else {
            DistrictState::Incomplete
        };

        self.settle(state, border_updates, Change::Removed)
    }

    fn settle(&mut self, state: DistrictState, border_updates: BorderUpdateBatch, change: Change) -> ToggleOutcome {
        self.result = match state {
            DistrictState::Complete => self.majority(),
            _ => DistrictResult::NotSettled,
        };
        if state != self.state {
            tracing::trace!(from = %self.state, to = %state, result = %self.result, "district state changed");
        }
        self.state = state;

        ToggleOutcome { state, border_updates, change }
    }

    fn is_full(&self) -> bool {
        self.units.len() >= self.district_size.get()
    }

    fn majority(&self) -> DistrictResult {
        let counts = self.units.values().map(AssignedConstituent::tribe).counts();
        let reds = counts.get(&Tribe::Red).copied().unwrap_or(0);
        let blues = counts.get(&Tribe::Blue).copied().unwrap_or(0);

        match reds.cmp(&blues) {
            std::cmp::Ordering::Greater => DistrictResult::Red,
            std::cmp::Ordering::Less => DistrictResult::Blue,
            std::cmp::Ordering::Equal => DistrictResult::Draw,
        }
    }
}

impl Display for District {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} {}", self.units.len(), self.district_size, self.state)?;
        if self.state == DistrictState::Complete {
            write!(f, " {}", self.result)?;
        }
        Ok(())
    }
}
