use std::collections::{HashMap, HashSet};

use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Dfs;
use serde::Serialize;
use strum::VariantArray;

use crate::constituent::Constituent;
use crate::location::Location;
use crate::shape::{Borders, SquareStep};
use crate::tribe::Tribe;

/// The new borders of one unit, produced by inserting into or removing from a district.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct BorderUpdate {
    /// The unit whose borders changed.
    pub address: Location,
    /// Its borders after the change; [`Borders::NONE`] for a unit that just left the district.
    pub borders: Borders,
}

/// Every unit touched by a single toggle, the toggled unit included.
pub type BorderUpdateBatch = Vec<BorderUpdate>;

/// A unit as held by the district it is assigned to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct AssignedConstituent {
    address: Location,
    tribe: Tribe,
    borders: Borders,
}

impl AssignedConstituent {
    pub(crate) fn new(constituent: &Constituent) -> Self {
        Self {
            address: constituent.address(),
            tribe: constituent.tribe(),
            borders: Borders::NONE,
        }
    }

    /// The grid address of this unit.
    pub fn address(&self) -> Location {
        self.address
    }

    /// The faction of this unit.
    pub fn tribe(&self) -> Tribe {
        self.tribe
    }

    /// Sides of this unit not shared with another unit of the same district.
    pub fn borders(&self) -> Borders {
        self.borders
    }

    /// Depth-first walk over units of the same district reachable from `self`, recording each in `visited`.
    pub(crate) fn visit_all_neighbours(&self, siblings: &UnitMap, visited: &mut HashSet<Location>) {
        let mut dfs = Dfs::new(&siblings.links, self.address);
        while let Some(address) = dfs.next(&siblings.links) {
            visited.insert(address);
        }
    }
}

/// The units of one district, keyed by address, along with the edges they share.
#[derive(Clone, Debug, Default)]
pub(crate) struct UnitMap {
    units: HashMap<Location, AssignedConstituent>,
    // one edge per pair of adjacent units, weighted with the direction from the lower-ordered unit
    links: UnGraphMap<Location, SquareStep>,
}

impl UnitMap {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            units: HashMap::with_capacity(capacity),
            // a compact district shares at most two edges per unit
            links: UnGraphMap::with_capacity(capacity, 2 * capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.units.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub(crate) fn contains(&self, address: &Location) -> bool {
        self.units.contains_key(address)
    }

    pub(crate) fn get(&self, address: &Location) -> Option<&AssignedConstituent> {
        self.units.get(address)
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &AssignedConstituent> {
        self.units.values()
    }

    pub(crate) fn links(&self) -> impl Iterator<Item = (Location, Location, SquareStep)> + '_ {
        self.links.all_edges().map(|(a, b, direction)| (a, b, *direction))
    }

    /// Add `unit` and rework the borders around it.
    pub(crate) fn insert(&mut self, unit: AssignedConstituent) -> BorderUpdateBatch {
        let address = unit.address;
        self.units.insert(address, unit);
        self.links.add_node(address);
        self.update_borders_after_insertion(address)
    }

    /// Drop the unit at `address` and expose the sides its neighbours shared with it.
    ///
    /// Returns [`None`] if no such unit is present.
    pub(crate) fn remove(&mut self, address: Location) -> Option<BorderUpdateBatch> {
        self.units.remove(&address)?;
        let updates = self.update_borders_after_removal(address);
        self.links.remove_node(address);
        Some(updates)
    }

    /// Whether every unit is reachable from every other through shared edges.
    ///
    /// An empty map is trivially contiguous.
    pub(crate) fn is_contiguous(&self) -> bool {
        let Some(first) = self.units.values().next() else {
            return true;
        };

        let mut visited = HashSet::with_capacity(self.units.len());
        first.visit_all_neighbours(self, &mut visited);
        tracing::trace!(reached = visited.len(), total = self.units.len(), "checked contiguity");

        visited.len() == self.units.len()
    }

    fn update_borders_after_insertion(&mut self, address: Location) -> BorderUpdateBatch {
        let mut updates = Vec::with_capacity(SquareStep::VARIANTS.len() + 1);
        let mut own = Borders::ALL;

        for (step, neighbour) in SquareStep::neighbors_of(address) {
            let Some(sibling) = self.units.get_mut(&neighbour) else {
                continue;
            };

            own.remove(step);
            sibling.borders.remove(step.invert());
            updates.push(BorderUpdate { address: neighbour, borders: sibling.borders });
            self.links.add_edge(address, neighbour, step.ensure_forward());
        }

        if let Some(unit) = self.units.get_mut(&address) {
            unit.borders = own;
        }
        updates.push(BorderUpdate { address, borders: own });

        updates
    }

    // expects the unit at `address` to be gone from `units` already
    fn update_borders_after_removal(&mut self, address: Location) -> BorderUpdateBatch {
        let mut updates = Vec::with_capacity(SquareStep::VARIANTS.len() + 1);
        updates.push(BorderUpdate { address, borders: Borders::NONE });

        for (step, neighbour) in SquareStep::neighbors_of(address) {
            if let Some(sibling) = self.units.get_mut(&neighbour) {
                sibling.borders.insert(step.invert());
                updates.push(BorderUpdate { address: neighbour, borders: sibling.borders });
            }
        }

        updates
    }
}
