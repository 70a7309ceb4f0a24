//! Puzzle catalogs loaded from TOML, and evaluation of a game against a puzzle's win condition.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::BuildError;
use crate::district::DistrictResult;
use crate::game::Game;
use crate::tribe::Tribe;

const BUILTIN_CATALOG: &str = include_str!("../puzzles.toml");

/// Reasons a catalog could not be loaded.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// The document is not a valid TOML catalog.
    #[error("failed to parse puzzle catalog: {0}")]
    Parse(#[from] toml::de::Error),
    /// A puzzle describes a grid no game can be built from.
    #[error("puzzle {title:?} is invalid: {source}")]
    InvalidPuzzle {
        /// Title of the puzzle.
        title: String,
        /// Why the game could not be built.
        #[source]
        source: BuildError,
    },
    /// A puzzle asks for more district wins than it has districts.
    #[error("puzzle {title:?} needs {at_least} districts but only has {districts}")]
    Unwinnable {
        /// Title of the puzzle.
        title: String,
        /// Wins required.
        at_least: usize,
        /// Districts available.
        districts: usize,
    },
}

/// What the player must achieve: `tribe` winning at least `at_least` districts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WinCondition {
    /// The tribe the player plays for.
    pub tribe: Tribe,
    /// Districts that tribe must win.
    pub at_least: usize,
}

/// Tally of a game against a [`WinCondition`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Verdict {
    /// The tribe the player plays for.
    pub tribe: Tribe,
    /// Districts that tribe must win.
    pub needed: usize,
    /// Complete districts won by the tribe.
    pub won_districts: usize,
    /// Complete districts won by the other tribe.
    pub lost_districts: usize,
    /// Complete districts without a majority.
    pub draws: usize,
    /// Whether every district is complete.
    pub settled: bool,
    /// Whether the puzzle is solved: all districts complete and enough of them won.
    pub won: bool,
}

impl WinCondition {
    /// Evaluate the districts of `game`.
    pub fn evaluate(&self, game: &Game) -> Verdict {
        let target = DistrictResult::from(self.tribe);
        let results = game.all_districts().iter().map(|district| district.result());

        let (mut won_districts, mut lost_districts, mut draws) = (0, 0, 0);
        for result in results {
            match result {
                DistrictResult::NotSettled => {}
                DistrictResult::Draw => draws += 1,
                result if result == target => won_districts += 1,
                _ => lost_districts += 1,
            }
        }

        let settled = game.is_settled();
        Verdict {
            tribe: self.tribe,
            needed: self.at_least,
            won_districts,
            lost_districts,
            draws,
            settled,
            won: settled && won_districts >= self.at_least,
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} wins {} of {} needed ({} lost, {} drawn)", self.tribe, self.won_districts, self.needed, self.lost_districts, self.draws)?;
        match (self.settled, self.won) {
            (true, true) => write!(f, ": solved"),
            (true, false) => write!(f, ": all districts complete, target missed"),
            (false, _) => Ok(()),
        }
    }
}

/// One playable map.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    /// Short name.
    pub title: String,
    /// Flavour text shown to the player.
    pub description: String,
    /// Rows of distribution characters; see [`Tribe`].
    pub distribution: Vec<String>,
    /// Units per district.
    pub district_size: usize,
    /// What counts as solving the puzzle.
    pub win: WinCondition,
}

impl Puzzle {
    /// A fresh game on this puzzle's grid.
    pub fn new_game(&self) -> Result<Game, BuildError> {
        Game::new(&self.distribution, self.district_size)
    }
}

/// An ordered collection of [`Puzzle`]s, read from TOML with one `[[puzzle]]` table per puzzle.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "puzzle", default)]
    puzzles: Vec<Puzzle>,
}

impl Catalog {
    /// The puzzles shipped with the crate.
    pub fn builtin() -> Result<Self, PuzzleError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parse a catalog and check that every puzzle in it can be played.
    pub fn from_toml_str(document: &str) -> Result<Self, PuzzleError> {
        let catalog: Self = toml::from_str(document)?;

        for puzzle in &catalog.puzzles {
            let game = puzzle.new_game().map_err(|source| PuzzleError::InvalidPuzzle {
                title: puzzle.title.clone(),
                source,
            })?;

            let districts = game.all_districts().len();
            if puzzle.win.at_least > districts {
                return Err(PuzzleError::Unwinnable {
                    title: puzzle.title.clone(),
                    at_least: puzzle.win.at_least,
                    districts,
                });
            }
        }

        tracing::debug!(puzzles = catalog.puzzles.len(), "loaded puzzle catalog");
        Ok(catalog)
    }

    /// Every puzzle, in catalog order.
    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }

    /// The puzzle at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Puzzle> {
        self.puzzles.get(index)
    }

    /// Number of puzzles.
    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    /// Whether the catalog holds no puzzle.
    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }
}
