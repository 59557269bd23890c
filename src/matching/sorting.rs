//! Ordering of combo lists for display.
//!
//! Every [`SortKey`] expands to a fixed cascade of [`Criterion`]s. Two combos
//! are compared criterion by criterion until one reports a difference, so a
//! price tie falls through to color rank, and a color tie to card count.
//!
//! Sorting is always ascending and stable; [`SortDirection::Descending`]
//! reverses the sorted list afterwards instead of inverting the comparison,
//! which flips the relative order of tied combos too.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::core::combo::ComboRecord;
use crate::core::types::{ParseKeyError, Vendor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Id,
    Cards,
    Prerequisites,
    Steps,
    Results,
    #[default]
    Colors,
    Price,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Id,
        SortKey::Cards,
        SortKey::Prerequisites,
        SortKey::Steps,
        SortKey::Results,
        SortKey::Colors,
        SortKey::Price,
    ];

    /// Criteria compared in order for this key
    #[must_use]
    pub fn cascade(self, vendor: Vendor) -> Vec<Criterion> {
        match self {
            Self::Id => vec![Criterion::Id],
            Self::Cards => vec![Criterion::Count(ListField::Cards)],
            Self::Prerequisites => vec![Criterion::Count(ListField::Prerequisites)],
            Self::Steps => vec![Criterion::Count(ListField::Steps)],
            Self::Results => vec![Criterion::Count(ListField::Results)],
            Self::Colors => vec![Criterion::ColorRank, Criterion::Count(ListField::Cards)],
            Self::Price => vec![
                Criterion::Price(vendor),
                Criterion::ColorRank,
                Criterion::Count(ListField::Cards),
            ],
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Cards => "cards",
            Self::Prerequisites => "prerequisites",
            Self::Steps => "steps",
            Self::Results => "results",
            Self::Colors => "colors",
            Self::Price => "price",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| ParseKeyError {
                kind: "sort key",
                value: s.to_string(),
                expected: "id, cards, prerequisites, steps, results, colors, price",
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(ParseKeyError {
                kind: "sort order",
                value: s.to_string(),
                expected: "asc, desc",
            }),
        }
    }
}

/// A list on the combo whose length can be compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Cards,
    Prerequisites,
    Steps,
    Results,
}

impl ListField {
    fn len(self, combo: &ComboRecord) -> usize {
        match self {
            Self::Cards => combo.cards.len(),
            Self::Prerequisites => combo.prerequisites.len(),
            Self::Steps => combo.steps.len(),
            Self::Results => combo.results.len(),
        }
    }
}

/// One comparison in a sort cascade; lower values sort first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Id,
    Count(ListField),
    /// Position of the combo's identity in the canonical color order
    ColorRank,
    Price(Vendor),
}

impl Criterion {
    #[must_use]
    pub fn compare(self, a: &ComboRecord, b: &ComboRecord) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Count(field) => field.len(a).cmp(&field.len(b)),
            Self::ColorRank => a
                .color_identity
                .canonical_rank()
                .cmp(&b.color_identity.canonical_rank()),
            // NaN sorts after every number
            Self::Price(vendor) => a.price(vendor).total_cmp(&b.price(vendor)),
        }
    }
}

/// Walk `cascade` until a criterion tells the combos apart
#[must_use]
pub fn compare_cascade(cascade: &[Criterion], a: &ComboRecord, b: &ComboRecord) -> Ordering {
    cascade
        .iter()
        .map(|criterion| criterion.compare(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// How a combo list should be ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortOptions {
    pub key: SortKey,
    pub direction: SortDirection,
    /// Vendor whose prices drive [`SortKey::Price`]
    pub vendor: Vendor,
}

impl SortOptions {
    #[must_use]
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key,
            direction,
            vendor: Vendor::default(),
        }
    }

    #[must_use]
    pub fn with_vendor(mut self, vendor: Vendor) -> Self {
        self.vendor = vendor;
        self
    }
}

/// Sort combos in place
pub fn sort_combos<T: AsRef<ComboRecord>>(items: &mut [T], options: &SortOptions) {
    let cascade = options.key.cascade(options.vendor);
    items.sort_by(|a, b| compare_cascade(&cascade, a.as_ref(), b.as_ref()));

    if options.direction == SortDirection::Descending {
        items.reverse();
    }
}
