use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::color::ColorIdentity;
use crate::core::requirement::{CardGrouping, SpellbookList};
use crate::core::types::{ComboId, Vendor};

/// Base URL for combo permalinks
pub const PERMALINK_BASE: &str = "https://commanderspellbook.com/combo";

/// Per-vendor price figures
pub type Prices = BTreeMap<Vendor, f64>;

/// One decoded catalog combo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboRecord {
    pub id: ComboId,

    /// Required cards and templates, in catalog order
    pub cards: CardGrouping,

    pub color_identity: ColorIdentity,

    #[serde(default)]
    pub prerequisites: SpellbookList,

    #[serde(default)]
    pub steps: SpellbookList,

    #[serde(default)]
    pub results: SpellbookList,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub prices: Prices,

    #[serde(default)]
    pub has_banned_card: bool,

    /// Contains a card from a set that is not released yet
    #[serde(default)]
    pub has_spoiled_card: bool,
}

impl ComboRecord {
    pub fn new(id: u64, cards: CardGrouping, color_identity: ColorIdentity) -> Self {
        Self {
            id: ComboId::new(id),
            cards,
            color_identity,
            prerequisites: SpellbookList::default(),
            steps: SpellbookList::default(),
            results: SpellbookList::default(),
            prices: Prices::new(),
            has_banned_card: false,
            has_spoiled_card: false,
        }
    }

    #[must_use]
    pub fn with_prerequisites(mut self, list: SpellbookList) -> Self {
        self.prerequisites = list;
        self
    }

    #[must_use]
    pub fn with_steps(mut self, list: SpellbookList) -> Self {
        self.steps = list;
        self
    }

    #[must_use]
    pub fn with_results(mut self, list: SpellbookList) -> Self {
        self.results = list;
        self
    }

    #[must_use]
    pub fn with_price(mut self, vendor: Vendor, price: f64) -> Self {
        self.prices.insert(vendor, price);
        self
    }

    /// Price at the given vendor; 0 when the catalog has no figure
    #[must_use]
    pub fn price(&self, vendor: Vendor) -> f64 {
        self.prices.get(&vendor).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn permalink(&self) -> String {
        format!("{PERMALINK_BASE}/{}/", self.id)
    }
}

impl AsRef<ComboRecord> for ComboRecord {
    fn as_ref(&self) -> &ComboRecord {
        self
    }
}
