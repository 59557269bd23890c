use serde::{Deserialize, Serialize};

use crate::core::card::{split_catalog_quantity, Card, CardError, Template, TEMPLATE_PREFIX};
use crate::core::types::Vendor;

/// Source of per-card unit prices
pub trait CardPrices {
    fn unit_price(&self, card: &Card, vendor: Vendor) -> Option<f64>;
}

/// One entry in a combo's card list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    Card { card: Card, quantity: u32 },
    Template { template: Template, quantity: u32 },
}

impl Requirement {
    #[must_use]
    pub fn card(name: impl Into<String>) -> Self {
        Self::Card {
            card: Card::new(name),
            quantity: 1,
        }
    }

    #[must_use]
    pub fn template(name: impl Into<String>) -> Self {
        Self::Template {
            template: Template::new(name),
            quantity: 1,
        }
    }

    /// Set the required quantity
    ///
    /// # Errors
    ///
    /// Returns `CardError::InvalidQuantity` for a quantity of 0.
    pub fn with_quantity(mut self, n: u32) -> Result<Self, CardError> {
        if n == 0 {
            return Err(CardError::InvalidQuantity(n.to_string()));
        }
        match &mut self {
            Self::Card { quantity, .. } | Self::Template { quantity, .. } => *quantity = n,
        }
        Ok(self)
    }

    /// Parse a snapshot token: `[<n>x ]<name>` or `[<n>x ]T:<template>`
    ///
    /// # Errors
    ///
    /// Returns a `CardError` for an empty name or a zero quantity.
    pub fn parse_token(token: &str) -> Result<Self, CardError> {
        let (quantity, name) = split_catalog_quantity(token)?;
        if let Some(template) = name.strip_prefix(TEMPLATE_PREFIX) {
            let template = template.trim();
            if template.is_empty() {
                return Err(CardError::EmptyName);
            }
            return Self::template(template).with_quantity(quantity);
        }
        Self::card(name).with_quantity(quantity)
    }

    /// Render back into snapshot token form
    #[must_use]
    pub fn to_token(&self) -> String {
        let (quantity, body) = match self {
            Self::Card { card, quantity } => (*quantity, card.name().to_string()),
            Self::Template { template, quantity } => {
                (*quantity, format!("{TEMPLATE_PREFIX}{}", template.name))
            }
        };
        if quantity > 1 {
            format!("{quantity}x {body}")
        } else {
            body
        }
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        match self {
            Self::Card { quantity, .. } | Self::Template { quantity, .. } => *quantity,
        }
    }

    #[must_use]
    pub fn as_card(&self) -> Option<&Card> {
        match self {
            Self::Card { card, .. } => Some(card),
            Self::Template { .. } => None,
        }
    }

    #[must_use]
    pub fn is_template(&self) -> bool {
        matches!(self, Self::Template { .. })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Card { card, .. } => card.name(),
            Self::Template { template, .. } => &template.name,
        }
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.quantity() {
            1 => write!(f, "{}", self.name()),
            n => write!(f, "{n}x {}", self.name()),
        }
    }
}

/// Ordered list of the cards and templates a combo needs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardGrouping(Vec<Requirement>);

impl CardGrouping {
    #[must_use]
    pub fn new(requirements: Vec<Requirement>) -> Self {
        Self(requirements)
    }

    /// Parse snapshot tokens in order
    ///
    /// # Errors
    ///
    /// Returns the first token error encountered.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, CardError> {
        tokens
            .iter()
            .map(|t| Requirement::parse_token(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Requirement> {
        self.0.iter()
    }

    /// Concrete cards with their required quantities
    pub fn cards(&self) -> impl Iterator<Item = (&Card, u32)> {
        self.0.iter().filter_map(|r| match r {
            Requirement::Card { card, quantity } => Some((card, *quantity)),
            Requirement::Template { .. } => None,
        })
    }

    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.0.iter().filter_map(|r| match r {
            Requirement::Template { template, .. } => Some(template),
            Requirement::Card { .. } => None,
        })
    }

    #[must_use]
    pub fn contains(&self, card: &Card) -> bool {
        self.cards().any(|(c, _)| c == card)
    }

    /// Sum of unit price times quantity over concrete cards.
    ///
    /// Cards without a price and templates contribute nothing.
    #[must_use]
    pub fn aggregate_price(&self, vendor: Vendor, prices: &impl CardPrices) -> f64 {
        self.cards()
            .map(|(card, quantity)| {
                prices.unit_price(card, vendor).unwrap_or(0.0) * f64::from(quantity)
            })
            .sum()
    }

    #[must_use]
    pub fn to_tokens(&self) -> Vec<String> {
        self.0.iter().map(Requirement::to_token).collect()
    }
}

impl<'a> IntoIterator for &'a CardGrouping {
    type Item = &'a Requirement;
    type IntoIter = std::slice::Iter<'a, Requirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Ordered text list: prerequisites, steps or results of a combo
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellbookList(Vec<String>);

impl SpellbookList {
    #[must_use]
    pub fn new(items: Vec<String>) -> Self {
        Self(
            items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    /// Split a run of sentences on `.` into items
    #[must_use]
    pub fn from_sentences(text: &str) -> Self {
        Self::new(text.split('.').map(str::to_string).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.0
    }
}
