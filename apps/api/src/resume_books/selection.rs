//! Ranked "top three companies" picker.
//!
//! Three ranks draw from the same pool of sponsor companies. Choosing a
//! company for one rank evicts it from any other rank that already holds it,
//! so no company can ever be ranked twice.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rank {
    First,
    Second,
    Third,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("rank must be 1, 2 or 3 (got {0})")]
pub struct InvalidRank(pub u8);

impl Rank {
    pub const ALL: [Rank; 3] = [Rank::First, Rank::Second, Rank::Third];

    fn index(self) -> usize {
        match self {
            Rank::First => 0,
            Rank::Second => 1,
            Rank::Third => 2,
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = InvalidRank;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Rank::First),
            2 => Ok(Rank::Second),
            3 => Ok(Rank::Third),
            other => Err(InvalidRank(other)),
        }
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank.index() as u8 + 1
    }
}

/// Three ranked company slots. An empty slot is `None`; empty strings are
/// normalized to `None` on the way in. Every constructor goes through
/// `choose`, so no company is ever held by two ranks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SelectionWire", into = "SelectionWire")]
pub struct RankedSelection {
    slots: [Option<String>; 3],
}

impl RankedSelection {
    /// Seeds the picker from a prior submission's preferred companies.
    /// Ranks are applied in order through `choose`, so a repeated company
    /// ends up in the last rank that named it.
    pub fn from_preferences(
        first: Option<&str>,
        second: Option<&str>,
        third: Option<&str>,
    ) -> Self {
        Rank::ALL
            .into_iter()
            .zip([first, second, third])
            .fold(Self::default(), |selection, (rank, value)| {
                choose(&selection, rank, value.unwrap_or_default())
            })
    }

    pub fn get(&self, rank: Rank) -> Option<&str> {
        self.slots[rank.index()].as_deref()
    }
}

fn normalize(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Sets `rank` to `value`, clearing any other rank that held the same
/// non-empty value. An empty `value` clears `rank` and nothing else.
pub fn choose(state: &RankedSelection, rank: Rank, value: &str) -> RankedSelection {
    let mut next = state.clone();

    if !value.is_empty() {
        for other in Rank::ALL.into_iter().filter(|other| *other != rank) {
            if next.get(other) == Some(value) {
                next.slots[other.index()] = None;
            }
        }
    }

    next.slots[rank.index()] = normalize(value);
    next
}

#[derive(Serialize, Deserialize)]
struct SelectionWire {
    #[serde(rename = "1", default)]
    first: String,
    #[serde(rename = "2", default)]
    second: String,
    #[serde(rename = "3", default)]
    third: String,
}

impl From<SelectionWire> for RankedSelection {
    fn from(wire: SelectionWire) -> Self {
        Self::from_preferences(Some(&wire.first), Some(&wire.second), Some(&wire.third))
    }
}

impl From<RankedSelection> for SelectionWire {
    fn from(selection: RankedSelection) -> Self {
        let [first, second, third] = selection.slots;
        Self {
            first: first.unwrap_or_default(),
            second: second.unwrap_or_default(),
            third: third.unwrap_or_default(),
        }
    }
}
