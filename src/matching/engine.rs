use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::catalog::store::ComboCatalog;
use crate::core::card::Card;
use crate::core::combo::ComboRecord;
use crate::core::deck::Deck;
use crate::core::requirement::Requirement;
use crate::core::types::MatchType;

/// Decks need at least this many distinct cards before the catalog is scanned
pub const MIN_DISTINCT_CARDS: usize = 2;

/// How many missing requirements a combo may have and still be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tolerance {
    /// Every non-exact combo is a potential match
    #[default]
    Unbounded,
    /// Combos missing more than `n` requirements are dropped
    AtMost(usize),
}

impl Tolerance {
    #[must_use]
    pub fn allows(self, missing: usize) -> bool {
        match self {
            Self::Unbounded => true,
            Self::AtMost(limit) => missing <= limit,
        }
    }
}

/// Configuration for the matching engine
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchingConfig {
    pub tolerance: Tolerance,
    /// Skip combos containing a card banned in the format
    pub exclude_banned: bool,
    /// Skip combos containing an unreleased card
    pub exclude_spoiled: bool,
}

/// A combo the deck is close to, with what it still lacks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PotentialMatch<'a> {
    pub combo: &'a ComboRecord,

    /// Unmet requirements, in the combo's requirement order
    pub missing: Vec<&'a Requirement>,
}

impl AsRef<ComboRecord> for PotentialMatch<'_> {
    fn as_ref(&self) -> &ComboRecord {
        self.combo
    }
}

/// Exact and potential matches for one deck, both in catalog order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeckMatches<'a> {
    pub exact: Vec<&'a ComboRecord>,
    pub potential: Vec<PotentialMatch<'a>>,
}

impl<'a> DeckMatches<'a> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.potential.is_empty()
    }

    /// Distinct concrete cards missing across all potential matches, first seen first
    #[must_use]
    pub fn missing_cards(&self) -> Vec<&'a Card> {
        let mut seen: HashSet<&Card> = HashSet::new();
        self.potential
            .iter()
            .flat_map(|p| p.missing.iter().filter_map(|r| r.as_card()))
            .filter(|card| seen.insert(*card))
            .collect()
    }
}

/// Requirements of `combo` the deck does not satisfy.
///
/// A concrete card is missing when the deck holds fewer copies than the combo
/// needs; it is listed once however large the deficit. Templates are always
/// missing.
#[must_use]
pub fn missing_requirements<'c>(deck: &Deck, combo: &'c ComboRecord) -> Vec<&'c Requirement> {
    let mut required: HashMap<&Card, u32> = HashMap::new();
    for (card, quantity) in combo.cards.cards() {
        *required.entry(card).or_insert(0) += quantity;
    }

    let mut reported: HashSet<&Card> = HashSet::new();
    let mut missing = Vec::new();
    for requirement in &combo.cards {
        match requirement {
            Requirement::Template { .. } => missing.push(requirement),
            Requirement::Card { card, .. } => {
                let needed = required.get(card).copied().unwrap_or(0);
                if deck.quantity(card) < needed && reported.insert(card) {
                    missing.push(requirement);
                }
            }
        }
    }
    missing
}

/// The main matching engine
pub struct MatchingEngine<'a> {
    catalog: &'a ComboCatalog,
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with default configuration
    #[must_use]
    pub fn new(catalog: &'a ComboCatalog) -> Self {
        Self {
            catalog,
            config: MatchingConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    #[must_use]
    pub fn with_config(catalog: &'a ComboCatalog, config: MatchingConfig) -> Self {
        Self { catalog, config }
    }

    #[must_use]
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Classify one combo against a deck, returning the unmet requirements
    #[must_use]
    pub fn classify<'c>(&self, deck: &Deck, combo: &'c ComboRecord) -> (MatchType, Vec<&'c Requirement>) {
        let missing = missing_requirements(deck, combo);
        let match_type = if missing.is_empty() {
            MatchType::Exact
        } else if self.config.tolerance.allows(missing.len()) {
            MatchType::Potential
        } else {
            MatchType::NoMatch
        };
        (match_type, missing)
    }

    /// Scan the catalog for combos the deck holds or is close to holding
    #[must_use]
    pub fn find_matches(&self, deck: &Deck) -> DeckMatches<'a> {
        let mut matches = DeckMatches::default();

        if deck.distinct_cards() < MIN_DISTINCT_CARDS {
            debug!(
                "Deck has {} distinct cards; skipping catalog scan",
                deck.distinct_cards()
            );
            return matches;
        }

        let mut excluded = 0usize;
        for combo in self.catalog.combos() {
            if self.is_excluded(combo) {
                excluded += 1;
                continue;
            }

            match self.classify(deck, combo) {
                (MatchType::Exact, _) => matches.exact.push(combo),
                (MatchType::Potential, missing) => {
                    matches.potential.push(PotentialMatch { combo, missing });
                }
                (MatchType::NoMatch, _) => {}
            }
        }

        debug!(
            "Matched {} distinct cards against {} combos: {} exact, {} potential, {} excluded",
            deck.distinct_cards(),
            self.catalog.len(),
            matches.exact.len(),
            matches.potential.len(),
            excluded
        );

        matches
    }

    fn is_excluded(&self, combo: &ComboRecord) -> bool {
        (self.config.exclude_banned && combo.has_banned_card)
            || (self.config.exclude_spoiled && combo.has_spoiled_card)
    }
}
