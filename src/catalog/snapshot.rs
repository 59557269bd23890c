//! Compact catalog snapshot decoding.
//!
//! The snapshot is a JSON array with one short-keyed object per combo:
//!
//! | Key | Meaning | Required |
//! |-----|---------|----------|
//! | `d` | Combo id | Yes |
//! | `c` | Card tokens (array, or one `\|`-delimited string) | Yes |
//! | `i` | Color identity (`"wub"`, `"c"`) | Yes |
//! | `p` | Prerequisites | No |
//! | `s` | Steps | No |
//! | `r` | Results | No |
//! | `v` | Vendor prices (`{"c": 4.5, "t": 3.9}`) | No |
//! | `b` | Contains a banned card (0/1) | No |
//! | `o` | Contains a preview card (0/1) | No |
//!
//! Unknown keys are ignored so newer snapshots still decode.

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Read;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::card_data::CardDataStore;
use crate::core::color::ColorIdentity;
use crate::core::combo::ComboRecord;
use crate::core::requirement::{CardGrouping, SpellbookList};
use crate::core::types::{ComboId, Vendor};
use crate::utils::validation::{is_gzip, is_valid_price, MAX_SNAPSHOT_BYTES};

/// One malformed snapshot entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("entry {index}{}: {reason}", .id.map(|id| format!(" (combo {id})")).unwrap_or_default())]
pub struct EntryError {
    /// Position in the snapshot array
    pub index: usize,
    /// Combo id, when it could be read
    pub id: Option<u64>,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to decompress snapshot: {0}")]
    Decompress(#[from] std::io::Error),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Malformed catalog {0}")]
    Entry(EntryError),
}

/// How per-entry failures are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Abort on the first malformed entry
    #[default]
    Strict,
    /// Skip malformed entries and report them
    Lenient,
}

/// Decoded combos in snapshot order, plus entries skipped in lenient mode
#[derive(Debug, Clone, Default)]
pub struct DecodedCatalog {
    pub combos: Vec<ComboRecord>,
    pub skipped: Vec<EntryError>,
}

/// Either a JSON array of strings or one delimited string
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum TextField {
    List(Vec<String>),
    Joined(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CompressedCombo {
    d: u64,
    c: TextField,
    i: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    p: Option<TextField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    s: Option<TextField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    r: Option<TextField>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    v: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "is_zero")]
    b: u8,
    #[serde(default, skip_serializing_if = "is_zero")]
    o: u8,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde skip_serializing_if signature
fn is_zero(flag: &u8) -> bool {
    *flag == 0
}

fn card_tokens(field: &TextField) -> Vec<&str> {
    match field {
        TextField::List(items) => items.iter().map(String::as_str).collect(),
        TextField::Joined(joined) => joined.split('|').collect(),
    }
}

fn text_list(field: Option<&TextField>) -> SpellbookList {
    match field {
        None => SpellbookList::default(),
        Some(TextField::List(items)) => SpellbookList::new(items.clone()),
        Some(TextField::Joined(text)) => SpellbookList::from_sentences(text),
    }
}

fn flag(value: u8, key: &str) -> Result<bool, String> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(format!("flag '{key}' must be 0 or 1, found {other}")),
    }
}

/// Inflate gzip input; anything else is passed through unchanged.
///
/// # Errors
///
/// Returns an IO error when the gzip stream is corrupt or inflates past
/// `MAX_SNAPSHOT_BYTES`.
pub fn inflate_if_gzip(bytes: &[u8]) -> std::io::Result<Cow<'_, [u8]>> {
    if !is_gzip(bytes) {
        return Ok(Cow::Borrowed(bytes));
    }

    let mut inflated = Vec::new();
    GzDecoder::new(bytes)
        .take(MAX_SNAPSHOT_BYTES + 1)
        .read_to_end(&mut inflated)?;

    if inflated.len() as u64 > MAX_SNAPSHOT_BYTES {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("snapshot inflates past {MAX_SNAPSHOT_BYTES} bytes"),
        ));
    }
    Ok(Cow::Owned(inflated))
}

/// Expands a compact snapshot into [`ComboRecord`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogDecoder<'a> {
    mode: DecodeMode,
    card_data: Option<&'a CardDataStore>,
}

impl<'a> CatalogDecoder<'a> {
    #[must_use]
    pub fn new(mode: DecodeMode) -> Self {
        Self {
            mode,
            card_data: None,
        }
    }

    #[must_use]
    pub fn strict() -> Self {
        Self::new(DecodeMode::Strict)
    }

    #[must_use]
    pub fn lenient() -> Self {
        Self::new(DecodeMode::Lenient)
    }

    /// Fill vendor prices an entry lacks by summing card prices from `card_data`
    #[must_use]
    pub fn with_card_data(mut self, card_data: &'a CardDataStore) -> Self {
        self.card_data = Some(card_data);
        self
    }

    #[must_use]
    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// Decode snapshot bytes, inflating them first if gzip-compressed
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Decompress` for corrupt gzip input,
    /// `DecodeError::InvalidSnapshot` when the payload is not a JSON array,
    /// and `DecodeError::Entry` for the first malformed entry in strict mode.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedCatalog, DecodeError> {
        let payload = inflate_if_gzip(bytes)?;
        let entries: Vec<Value> = serde_json::from_slice(&payload)
            .map_err(|e| DecodeError::InvalidSnapshot(e.to_string()))?;
        self.decode_entries(entries)
    }

    /// Decode a snapshot held as text
    ///
    /// # Errors
    ///
    /// See [`CatalogDecoder::decode`].
    pub fn decode_str(&self, json: &str) -> Result<DecodedCatalog, DecodeError> {
        self.decode(json.as_bytes())
    }

    fn decode_entries(&self, entries: Vec<Value>) -> Result<DecodedCatalog, DecodeError> {
        let mut decoded = DecodedCatalog {
            combos: Vec::with_capacity(entries.len()),
            skipped: Vec::new(),
        };

        for (index, entry) in entries.into_iter().enumerate() {
            let id = entry.get("d").and_then(Value::as_u64);
            match self.decode_entry(entry) {
                Ok(combo) => decoded.combos.push(combo),
                Err(reason) => {
                    let error = EntryError { index, id, reason };
                    match self.mode {
                        DecodeMode::Strict => return Err(DecodeError::Entry(error)),
                        DecodeMode::Lenient => {
                            warn!("Skipping malformed catalog {error}");
                            decoded.skipped.push(error);
                        }
                    }
                }
            }
        }

        debug!(
            "Decoded {} combos ({} skipped)",
            decoded.combos.len(),
            decoded.skipped.len()
        );
        Ok(decoded)
    }

    fn decode_entry(&self, entry: Value) -> Result<ComboRecord, String> {
        let raw: CompressedCombo = serde_json::from_value(entry).map_err(|e| e.to_string())?;

        let tokens: Vec<&str> = card_tokens(&raw.c)
            .into_iter()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return Err("card list is empty".to_string());
        }
        let cards = CardGrouping::from_tokens(&tokens).map_err(|e| format!("card list: {e}"))?;

        let color_identity: ColorIdentity = raw
            .i
            .parse()
            .map_err(|e| format!("color identity: {e}"))?;

        let mut prices = BTreeMap::new();
        for (key, price) in &raw.v {
            if !is_valid_price(*price) {
                return Err(format!("price '{key}' must be a non-negative number"));
            }
            if let Some(vendor) = Vendor::from_snapshot_key(key) {
                prices.insert(vendor, *price);
            }
        }
        if let Some(card_data) = self.card_data {
            for vendor in Vendor::ALL {
                prices
                    .entry(vendor)
                    .or_insert_with(|| cards.aggregate_price(vendor, card_data));
            }
        }

        Ok(ComboRecord {
            id: ComboId::new(raw.d),
            prerequisites: text_list(raw.p.as_ref()),
            steps: text_list(raw.s.as_ref()),
            results: text_list(raw.r.as_ref()),
            cards,
            color_identity,
            prices,
            has_banned_card: flag(raw.b, "b")?,
            has_spoiled_card: flag(raw.o, "o")?,
        })
    }
}

/// Encode records back into the compact snapshot format
///
/// # Errors
///
/// Returns a `serde_json::Error` if serialization fails.
pub fn encode(combos: &[ComboRecord]) -> Result<String, serde_json::Error> {
    let compact: Vec<CompressedCombo> = combos
        .iter()
        .map(|combo| CompressedCombo {
            d: combo.id.0,
            c: TextField::List(combo.cards.to_tokens()),
            i: combo.color_identity.to_string(),
            p: Some(TextField::List(combo.prerequisites.items().to_vec())),
            s: Some(TextField::List(combo.steps.items().to_vec())),
            r: Some(TextField::List(combo.results.items().to_vec())),
            v: combo
                .prices
                .iter()
                .map(|(vendor, price)| (vendor.snapshot_key().to_string(), *price))
                .collect(),
            b: u8::from(combo.has_banned_card),
            o: u8::from(combo.has_spoiled_card),
        })
        .collect();
    serde_json::to_string(&compact)
}
