use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::core::card::{split_quantity_prefix, Card, CardError};
use crate::core::deck::{ColorIdentityLookup, Deck, DeckError};
use crate::utils::validation::{validate_decklist_text, ValidationError};

#[derive(Error, Debug)]
pub enum DecklistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: {source}")]
    InvalidLine { line: usize, source: CardError },

    #[error("Decklist rejected: {0}")]
    TooLarge(#[from] ValidationError),

    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// One parsed decklist line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub card: Card,
    pub quantity: u32,
    /// 1-based source line
    pub line: usize,
}

/// Parse a decklist file
///
/// # Errors
///
/// Returns `DecklistError::Io` if the file cannot be read, or any error from
/// [`parse_decklist_text`].
pub fn parse_decklist_file(path: &Path) -> Result<Vec<DeckEntry>, DecklistError> {
    let content = std::fs::read_to_string(path)?;
    parse_decklist_text(&content)
}

/// Parse decklist text, one card per line: `<qty>x? <name>` or `<name>`.
///
/// Blank lines, `//` and `#` comments and section headers such as
/// `Commander:` are skipped. Trailing set markers (`(CMR) 123`, `[CMR]`)
/// and foil tags (`*F*`) are dropped.
///
/// # Errors
///
/// Returns `DecklistError::TooLarge` if the text is over the size limits and
/// `DecklistError::InvalidLine` for a zero quantity.
pub fn parse_decklist_text(text: &str) -> Result<Vec<DeckEntry>, DecklistError> {
    validate_decklist_text(text)?;

    let mut entries = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") || line.starts_with('#') || line.ends_with(':') {
            continue;
        }

        let (quantity, name) = split_quantity_prefix(line)
            .map_err(|source| DecklistError::InvalidLine { line: idx + 1, source })?;

        let name = strip_printing_markers(name);
        if name.is_empty() {
            continue;
        }

        entries.push(DeckEntry {
            card: Card::new(name),
            quantity,
            line: idx + 1,
        });
    }

    debug!("Parsed {} decklist entries", entries.len());
    Ok(entries)
}

fn strip_printing_markers(name: &str) -> &str {
    let mut name = name.trim();
    for tag in ["*F*", "*f*", "*E*", "*e*"] {
        if let Some(stripped) = name.strip_suffix(tag) {
            name = stripped.trim_end();
        }
    }
    for open in [" (", " ["] {
        if let Some(pos) = name.find(open) {
            name = &name[..pos];
        }
    }
    name.trim()
}

/// Merge entries into a [`Deck`], deriving its identity from `lookup`
///
/// # Errors
///
/// Returns `DecklistError::Deck` if an entry carries an invalid quantity.
pub fn build_deck(
    entries: &[DeckEntry],
    lookup: &impl ColorIdentityLookup,
) -> Result<Deck, DecklistError> {
    let deck = Deck::from_entries(
        entries.iter().map(|e| (e.card.clone(), e.quantity)),
        lookup,
    )?;
    Ok(deck)
}

/// Parse text straight into a [`Deck`]
///
/// # Errors
///
/// Returns any error from [`parse_decklist_text`] or [`build_deck`].
pub fn parse_deck(text: &str, lookup: &impl ColorIdentityLookup) -> Result<Deck, DecklistError> {
    let entries = parse_decklist_text(text)?;
    build_deck(&entries, lookup)
}
