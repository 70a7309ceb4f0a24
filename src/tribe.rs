use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantArray};

/// One of the two factions every unit belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tribe {
    /// Written as any character but `'1'` in distributions.
    Red,
    /// Written as `'1'` in distributions.
    Blue,
}

impl Tribe {
    /// The canonical character for this tribe in distribution strings.
    pub fn distribution_char(&self) -> char {
        match self {
            Self::Red => '0',
            Self::Blue => '1',
        }
    }

    // upper case, so never confused with a district symbol
    pub(crate) fn display(&self) -> char {
        match self {
            Self::Red => 'R',
            Self::Blue => 'B',
        }
    }
}

impl From<char> for Tribe {
    /// `'1'` marks a Blue unit; every other character is Red.
    fn from(value: char) -> Self {
        match value {
            '1' => Self::Blue,
            _ => Self::Red,
        }
    }
}
