use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Prefix marking a template token in a snapshot card list (`T:Any sacrifice outlet`)
pub const TEMPLATE_PREFIX: &str = "T:";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("Card name is empty")]
    EmptyName,

    #[error("Invalid quantity '{0}' (must be a positive integer)")]
    InvalidQuantity(String),
}

/// Normalize a card name for identity comparison.
///
/// Trims, collapses internal whitespace runs to one space and lowercases.
/// Typo tolerance and punctuation folding are left to the caller.
#[must_use]
pub fn normalize_card_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A concrete card, identified by its normalized name.
///
/// The display name is kept for output only; equality, ordering and hashing
/// look at the normalized key.
#[derive(Debug, Clone)]
pub struct Card {
    name: String,
    key: String,
}

impl Card {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        let key = normalize_card_name(&name);
        Self { name, key }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Card::new)
    }
}

/// An open-ended requirement such as "Any sacrifice outlet".
///
/// No concrete deck can satisfy a template on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
        }
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Split an optional `<n>` or `<n>x` quantity prefix from a decklist line.
///
/// Returns the quantity (1 when absent) and the remaining name.
///
/// # Errors
///
/// Returns `CardError::InvalidQuantity` for a zero quantity and
/// `CardError::EmptyName` when nothing follows the prefix.
pub fn split_quantity_prefix(token: &str) -> Result<(u32, &str), CardError> {
    split_prefix(token, false)
}

/// Split an optional `<n>x` quantity prefix from a catalog card token.
///
/// Catalog tokens always carry the `x`, so a name that starts with a number
/// (`1996 World Champion`) stays whole.
///
/// # Errors
///
/// Same as [`split_quantity_prefix`].
pub fn split_catalog_quantity(token: &str) -> Result<(u32, &str), CardError> {
    split_prefix(token, true)
}

fn split_prefix(token: &str, require_x: bool) -> Result<(u32, &str), CardError> {
    let token = token.trim();
    let (first, rest) = match token.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim_start()),
        None => (token, ""),
    };

    let stripped = first.strip_suffix('x').or_else(|| first.strip_suffix('X'));
    let digits = match stripped {
        Some(digits) => digits,
        None if require_x => "",
        None => first,
    };

    let is_quantity =
        !rest.is_empty() && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());

    if !is_quantity {
        if token.is_empty() {
            return Err(CardError::EmptyName);
        }
        return Ok((1, token));
    }

    let quantity: u32 = digits
        .parse()
        .map_err(|_| CardError::InvalidQuantity(first.to_string()))?;
    if quantity == 0 {
        return Err(CardError::InvalidQuantity(first.to_string()));
    }

    Ok((quantity, rest))
}
