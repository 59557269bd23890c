use std::collections::HashMap;
use thiserror::Error;

use crate::core::card::Card;
use crate::core::color::ColorIdentity;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("Invalid quantity {quantity} for '{card}' (must be at least 1)")]
    InvalidQuantity { card: String, quantity: u32 },
}

/// Per-card color identity, supplied alongside the deck
pub trait ColorIdentityLookup {
    fn color_identity(&self, card: &Card) -> ColorIdentity;
}

impl ColorIdentityLookup for HashMap<Card, ColorIdentity> {
    fn color_identity(&self, card: &Card) -> ColorIdentity {
        self.get(card).copied().unwrap_or_default()
    }
}

/// Lookup for callers with no card data: every card is colorless
#[derive(Debug, Clone, Copy, Default)]
pub struct NoColorData;

impl ColorIdentityLookup for NoColorData {
    fn color_identity(&self, _card: &Card) -> ColorIdentity {
        ColorIdentity::COLORLESS
    }
}

/// A player's deck: card quantities plus the derived color identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: HashMap<Card, u32>,
    color_identity: ColorIdentity,
}

impl Deck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a deck from `(card, quantity)` entries, deriving identity from `lookup`
    ///
    /// # Errors
    ///
    /// Returns `DeckError::InvalidQuantity` if any entry has quantity 0.
    pub fn from_entries<I>(entries: I, lookup: &impl ColorIdentityLookup) -> Result<Self, DeckError>
    where
        I: IntoIterator<Item = (Card, u32)>,
    {
        let mut deck = Self::new();
        for (card, quantity) in entries {
            let identity = lookup.color_identity(&card);
            deck.add(card, quantity, identity)?;
        }
        Ok(deck)
    }

    /// Add copies of a card. Repeated cards accumulate; identity only grows.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::InvalidQuantity` for a quantity of 0.
    pub fn add(
        &mut self,
        card: Card,
        quantity: u32,
        identity: ColorIdentity,
    ) -> Result<(), DeckError> {
        if quantity == 0 {
            return Err(DeckError::InvalidQuantity {
                card: card.name().to_string(),
                quantity,
            });
        }
        let held = self.cards.entry(card).or_insert(0);
        *held = held.saturating_add(quantity);
        self.color_identity = self.color_identity.union(identity);
        Ok(())
    }

    #[must_use]
    pub fn color_identity(&self) -> ColorIdentity {
        self.color_identity
    }

    /// Copies of `card` held; 0 when absent
    #[must_use]
    pub fn quantity(&self, card: &Card) -> u32 {
        self.cards.get(card).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains_key(card)
    }

    #[must_use]
    pub fn distinct_cards(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn total_cards(&self) -> u64 {
        self.cards.values().map(|&q| u64::from(q)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> impl Iterator<Item = (&Card, u32)> {
        self.cards.iter().map(|(c, q)| (c, *q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ci(s: &str) -> ColorIdentity {
        s.parse().unwrap()
    }

    #[test]
    fn test_add_accumulates_quantities() {
        let mut deck = Deck::new();
        deck.add(Card::new("Island"), 10, ColorIdentity::COLORLESS).unwrap();
        deck.add(Card::new("island"), 5, ColorIdentity::COLORLESS).unwrap();
        assert_eq!(deck.quantity(&Card::new("ISLAND")), 15);
        assert_eq!(deck.distinct_cards(), 1);
        assert_eq!(deck.total_cards(), 15);
    }

    #[test]
    fn test_identity_is_monotone() {
        let mut deck = Deck::new();
        deck.add(Card::new("Llanowar Elves"), 1, ci("g")).unwrap();
        assert_eq!(deck.color_identity(), ci("g"));
        deck.add(Card::new("Sol Ring"), 1, ColorIdentity::COLORLESS).unwrap();
        assert_eq!(deck.color_identity(), ci("g"));
        deck.add(Card::new("Dark Ritual"), 1, ci("b")).unwrap();
        assert_eq!(deck.color_identity(), ci("bg"));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut deck = Deck::new();
        let err = deck
            .add(Card::new("Sol Ring"), 0, ColorIdentity::COLORLESS)
            .unwrap_err();
        assert!(matches!(err, DeckError::InvalidQuantity { quantity: 0, .. }));
        assert!(deck.is_empty());
    }

    #[test]
    fn test_from_entries_uses_lookup() {
        let lookup: HashMap<Card, ColorIdentity> =
            [(Card::new("Swords to Plowshares"), ci("w"))].into_iter().collect();
        let deck = Deck::from_entries(
            vec![(Card::new("Swords to Plowshares"), 1), (Card::new("Unknown"), 2)],
            &lookup,
        )
        .unwrap();
        assert_eq!(deck.color_identity(), ci("w"));
        assert_eq!(deck.quantity(&Card::new("unknown")), 2);
        assert_eq!(deck.quantity(&Card::new("Missing")), 0);
    }

    #[test]
    fn test_identity_always_covers_held_cards() {
        let mut deck = Deck::new();
        deck.add(Card::new("Llanowar Elves"), 1, ci("g")).unwrap();
        deck.add(Card::new("Sol Ring"), 1, ColorIdentity::COLORLESS).unwrap();
        for _ in 0..3 {
            deck.add(Card::new("Wastes"), 1, ColorIdentity::COLORLESS).unwrap();
            assert!(ci("g").is_subset_of(deck.color_identity()));
        }

        let rejected = deck.add(Card::new("Forest"), 0, ColorIdentity::COLORLESS);
        assert!(rejected.is_err());
        assert_eq!(deck.color_identity(), ci("g"));
    }
}
