use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::catalog::snapshot::inflate_if_gzip;
use crate::catalog::store::CatalogError;
use crate::core::card::Card;
use crate::core::color::ColorIdentity;
use crate::core::deck::ColorIdentityLookup;
use crate::core::requirement::CardPrices;
use crate::core::types::Vendor;
use crate::utils::validation::is_valid_price;

/// Raw per-card record: `{ "i": "wu", "p": { "c": 1.5, "t": 1.2 } }`
#[derive(Debug, Clone, Default, Deserialize)]
struct CardDataEntry {
    #[serde(default)]
    i: Option<ColorIdentity>,
    #[serde(default)]
    p: BTreeMap<String, f64>,
}

/// Known attributes of a card: its color identity and vendor prices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardInfo {
    pub color_identity: ColorIdentity,
    pub prices: BTreeMap<Vendor, f64>,
}

/// Card metadata keyed by normalized card name
#[derive(Debug, Clone, Default)]
pub struct CardDataStore {
    cards: HashMap<Card, CardInfo>,
}

impl CardDataStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load card data from a JSON file, gzip-compressed or plain
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Read` if the file cannot be read or inflated and
    /// `CatalogError::CardData` if it is not valid card data JSON.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let bytes = std::fs::read(path)?;
        let json = inflate_if_gzip(&bytes)?;
        Self::from_json(&String::from_utf8_lossy(&json))
    }

    /// Parse card data from a JSON object keyed by card name.
    ///
    /// Unknown vendor keys and invalid prices are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CardData` on malformed JSON or invalid color letters.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: HashMap<String, CardDataEntry> =
            serde_json::from_str(json).map_err(CatalogError::CardData)?;

        let mut store = Self::new();
        for (name, entry) in raw {
            let prices = entry
                .p
                .iter()
                .filter(|(_, price)| is_valid_price(**price))
                .filter_map(|(key, price)| Vendor::from_snapshot_key(key).map(|v| (v, *price)))
                .collect();
            store.insert(
                Card::new(name),
                CardInfo {
                    color_identity: entry.i.unwrap_or_default(),
                    prices,
                },
            );
        }
        Ok(store)
    }

    pub fn insert(&mut self, card: Card, info: CardInfo) {
        self.cards.insert(card, info);
    }

    #[must_use]
    pub fn get(&self, card: &Card) -> Option<&CardInfo> {
        self.cards.get(card)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl ColorIdentityLookup for CardDataStore {
    /// Unknown cards are treated as colorless
    fn color_identity(&self, card: &Card) -> ColorIdentity {
        self.get(card)
            .map(|info| info.color_identity)
            .unwrap_or_default()
    }
}

impl CardPrices for CardDataStore {
    fn unit_price(&self, card: &Card, vendor: Vendor) -> Option<f64> {
        self.get(card)?.prices.get(&vendor).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Sol Ring": { "i": "c", "p": { "c": 1.99, "t": 1.5 } },
        "Swords to Plowshares": { "i": "w", "p": { "c": 2.49, "x": 9.0 } },
        "Dramatic Reversal": { "i": "u" },
        "Isochron Scepter": { "p": { "t": -3.0 } }
    }"#;

    #[test]
    fn test_from_json() {
        let store = CardDataStore::from_json(SAMPLE).unwrap();
        assert_eq!(store.len(), 4);

        let swords = store.get(&Card::new("swords to plowshares")).unwrap();
        assert_eq!(swords.color_identity, "w".parse().unwrap());
        assert_eq!(swords.prices.len(), 1, "unknown vendor key is dropped");
    }

    #[test]
    fn test_color_identity_lookup_defaults_to_colorless() {
        let store = CardDataStore::from_json(SAMPLE).unwrap();
        assert_eq!(
            store.color_identity(&Card::new("Dramatic Reversal")),
            "u".parse().unwrap()
        );
        assert!(store.color_identity(&Card::new("Not A Card")).is_colorless());
        assert!(store.color_identity(&Card::new("Isochron Scepter")).is_colorless());
    }

    #[test]
    fn test_unit_price_skips_invalid_figures() {
        let store = CardDataStore::from_json(SAMPLE).unwrap();
        assert_eq!(
            store.unit_price(&Card::new("Sol Ring"), Vendor::TcgPlayer),
            Some(1.5)
        );
        assert_eq!(
            store.unit_price(&Card::new("Isochron Scepter"), Vendor::TcgPlayer),
            None
        );
    }

    #[test]
    fn test_invalid_color_is_an_error() {
        let err = CardDataStore::from_json(r#"{ "Bad": { "i": "wz" } }"#).unwrap_err();
        assert!(matches!(err, CatalogError::CardData(_)));
    }
}
