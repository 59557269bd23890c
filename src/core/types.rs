use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Error for unrecognized keyword arguments (vendors, sort keys, directions)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseKeyError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Catalog identifier of a combo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComboId(pub u64);

impl ComboId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ComboId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Price source for card and combo prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    #[default]
    CardKingdom,
    TcgPlayer,
}

impl Vendor {
    pub const ALL: [Vendor; 2] = [Vendor::CardKingdom, Vendor::TcgPlayer];

    /// Short key used in snapshot and card data price objects
    #[must_use]
    pub const fn snapshot_key(self) -> &'static str {
        match self {
            Self::CardKingdom => "c",
            Self::TcgPlayer => "t",
        }
    }

    #[must_use]
    pub fn from_snapshot_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.snapshot_key() == key)
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CardKingdom => write!(f, "Card Kingdom"),
            Self::TcgPlayer => write!(f, "TCGplayer"),
        }
    }
}

impl FromStr for Vendor {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "cardkingdom" | "ck" | "c" => Ok(Self::CardKingdom),
            "tcgplayer" | "tcg" | "t" => Ok(Self::TcgPlayer),
            _ => Err(ParseKeyError {
                kind: "vendor",
                value: s.to_string(),
                expected: "cardkingdom, tcgplayer",
            }),
        }
    }
}

/// Classification of one combo against one deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Every requirement is satisfied by the deck
    Exact,
    /// Some requirements are missing, within the configured tolerance
    Potential,
    /// Too many requirements missing to be surfaced
    NoMatch,
}
