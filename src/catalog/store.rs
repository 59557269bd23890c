use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::catalog::index::CardIndex;
use crate::catalog::snapshot::{CatalogDecoder, DecodeError, EntryError};
use crate::core::card::Card;
use crate::core::combo::ComboRecord;
use crate::core::types::ComboId;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to decode catalog: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to parse card data: {0}")]
    CardData(serde_json::Error),
}

/// The decoded combo catalog with indexes.
///
/// Read-only once built; share it between lookups by reference or `Arc`.
#[derive(Debug, Default)]
pub struct ComboCatalog {
    combos: Vec<ComboRecord>,

    /// Index: combo ID -> index in combos vec
    id_to_index: HashMap<ComboId, usize>,

    /// Index: card -> indices of combos requiring it
    card_index: CardIndex,

    /// Entries dropped by a lenient decode
    skipped: Vec<EntryError>,
}

impl ComboCatalog {
    /// Build a catalog from already decoded records, keeping their order
    #[must_use]
    pub fn from_records(combos: Vec<ComboRecord>) -> Self {
        let mut catalog = Self::default();
        for combo in combos {
            catalog.push(combo);
        }
        catalog
    }

    /// Load the sample snapshot compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Decode` if the embedded snapshot is malformed.
    pub fn load_embedded() -> Result<Self, CatalogError> {
        // Validated at compile time by build.rs
        const EMBEDDED_SNAPSHOT: &[u8] = include_bytes!("../../catalogs/sample_snapshot.json");
        Self::from_snapshot(EMBEDDED_SNAPSHOT, &CatalogDecoder::strict())
    }

    /// Load a snapshot file (plain JSON or gzip)
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Read` if the file cannot be read, or
    /// `CatalogError::Decode` if decoding fails.
    pub fn load_from_file(path: &Path, decoder: &CatalogDecoder<'_>) -> Result<Self, CatalogError> {
        let bytes = std::fs::read(path)?;
        Self::from_snapshot(&bytes, decoder)
    }

    /// Decode snapshot bytes into a catalog
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Decode` if the decoder rejects the snapshot.
    pub fn from_snapshot(bytes: &[u8], decoder: &CatalogDecoder<'_>) -> Result<Self, CatalogError> {
        let decoded = decoder.decode(bytes)?;
        let mut catalog = Self::from_records(decoded.combos);
        catalog.skipped = decoded.skipped;
        Ok(catalog)
    }

    fn push(&mut self, combo: ComboRecord) {
        let index = self.combos.len();

        if self.id_to_index.contains_key(&combo.id) {
            warn!("Duplicate combo id {} in catalog; keeping the first", combo.id);
        } else {
            self.id_to_index.insert(combo.id, index);
        }

        self.card_index.add(index, &combo);
        self.combos.push(combo);
    }

    /// All combos in catalog order
    #[must_use]
    pub fn combos(&self) -> &[ComboRecord] {
        &self.combos
    }

    /// Get a combo by ID
    #[must_use]
    pub fn get(&self, id: ComboId) -> Option<&ComboRecord> {
        self.id_to_index.get(&id).map(|&idx| &self.combos[idx])
    }

    /// Combos requiring `card`, in catalog order
    pub fn combos_with_card<'a>(&'a self, card: &Card) -> impl Iterator<Item = &'a ComboRecord> + 'a {
        self.card_index
            .combos_with(card)
            .iter()
            .map(move |&idx| &self.combos[idx])
    }

    #[must_use]
    pub fn card_index(&self) -> &CardIndex {
        &self.card_index
    }

    /// Entries skipped while decoding in lenient mode
    #[must_use]
    pub fn skipped(&self) -> &[EntryError] {
        &self.skipped
    }

    /// Number of combos in catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.combos.len()
    }

    /// Check if catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::ColorIdentity;
    use crate::core::requirement::CardGrouping;
    use std::io::Write;

    #[test]
    fn test_load_embedded_catalog() {
        let catalog = ComboCatalog::load_embedded().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.skipped().is_empty());
    }

    #[test]
    fn test_catalog_get_by_id() {
        let catalog = ComboCatalog::load_embedded().unwrap();
        let first = &catalog.combos()[0];
        let fetched = catalog.get(first.id).unwrap();
        assert_eq!(fetched, first);
        assert!(catalog.get(ComboId::new(u64::MAX)).is_none());
    }

    #[test]
    fn test_combos_with_card() {
        let catalog = ComboCatalog::from_records(vec![
            ComboRecord::new(
                1,
                CardGrouping::from_tokens(&["A", "B"]).unwrap(),
                ColorIdentity::COLORLESS,
            ),
            ComboRecord::new(
                2,
                CardGrouping::from_tokens(&["B", "C"]).unwrap(),
                ColorIdentity::COLORLESS,
            ),
        ]);
        let ids: Vec<u64> = catalog
            .combos_with_card(&Card::new("b"))
            .map(|c| c.id.0)
            .collect();
        assert_eq!(ids, [1, 2]);
        assert_eq!(catalog.combos_with_card(&Card::new("Z")).count(), 0);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = ComboCatalog::from_records(vec![
            ComboRecord::new(
                5,
                CardGrouping::from_tokens(&["A"]).unwrap(),
                ColorIdentity::COLORLESS,
            ),
            ComboRecord::new(
                5,
                CardGrouping::from_tokens(&["B"]).unwrap(),
                ColorIdentity::COLORLESS,
            ),
        ]);
        assert_eq!(catalog.len(), 2);
        let kept = catalog.get(ComboId::new(5)).unwrap();
        assert!(kept.cards.contains(&Card::new("A")));
    }

    #[test]
    fn test_load_from_file_lenient_reports_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"d": 1, "c": ["A", "B"], "i": "g"}}, {{"d": 2, "c": ["A"], "i": "q"}}]"#
        )
        .unwrap();

        let strict = ComboCatalog::load_from_file(file.path(), &CatalogDecoder::strict());
        assert!(matches!(strict, Err(CatalogError::Decode(DecodeError::Entry(_)))));

        let lenient =
            ComboCatalog::load_from_file(file.path(), &CatalogDecoder::lenient()).unwrap();
        assert_eq!(lenient.len(), 1);
        assert_eq!(lenient.skipped().len(), 1);
        assert_eq!(lenient.skipped()[0].id, Some(2));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = ComboCatalog::load_from_file(
            Path::new("/nonexistent/snapshot.json"),
            &CatalogDecoder::strict(),
        );
        assert!(matches!(result, Err(CatalogError::Read(_))));
    }
}
