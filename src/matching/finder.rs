use serde::Serialize;
use tracing::debug;

use crate::catalog::store::ComboCatalog;
use crate::core::card::Card;
use crate::core::color::ColorIdentity;
use crate::core::combo::ComboRecord;
use crate::core::deck::Deck;
use crate::matching::engine::{MatchingConfig, MatchingEngine, PotentialMatch};
use crate::matching::partition::{default_selection, filter_outside, partition};
use crate::matching::sorting::{sort_combos, SortOptions};

/// One "find my combos" lookup
#[derive(Debug, Clone, Default)]
pub struct FinderRequest {
    pub deck: Deck,
    /// Colors the player says the deck plays, on top of what its cards show
    pub deck_colors: Option<ColorIdentity>,
    /// Extra colors the user is willing to add; all colors when `None`
    pub selected: Option<ColorIdentity>,
    pub sort: SortOptions,
}

impl FinderRequest {
    #[must_use]
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_deck_colors(mut self, colors: ColorIdentity) -> Self {
        self.deck_colors = Some(colors);
        self
    }

    /// Identity used for partitioning: the deck's own identity widened by
    /// any stated colors. Never narrower than the cards held.
    #[must_use]
    pub fn deck_identity(&self) -> ColorIdentity {
        let derived = self.deck.color_identity();
        self.deck_colors.map_or(derived, |stated| derived.union(stated))
    }

    #[must_use]
    pub fn with_selection(mut self, selected: ColorIdentity) -> Self {
        self.selected = Some(selected);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortOptions) -> Self {
        self.sort = sort;
        self
    }
}

/// The three result sections of a lookup, each already sorted
#[derive(Debug, Clone, Serialize)]
pub struct FinderResults<'a> {
    pub deck_identity: ColorIdentity,
    pub exact: Vec<&'a ComboRecord>,
    pub potential_within: Vec<PotentialMatch<'a>>,
    /// Outside-identity matches that fit the selected colors
    pub potential_outside: Vec<PotentialMatch<'a>>,
    /// Outside-identity matches removed by the color selection
    pub hidden_outside: usize,
    /// Distinct cards the potential matches are waiting on
    pub missing_cards: Vec<&'a Card>,
}

impl FinderResults<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.potential_within.is_empty() && self.potential_outside.is_empty()
    }
}

/// Size and colors of the deck a lookup ran against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeckSummary {
    pub total_cards: u64,
    pub distinct_cards: usize,
    pub color_identity: ColorIdentity,
}

impl From<&Deck> for DeckSummary {
    fn from(deck: &Deck) -> Self {
        Self {
            total_cards: deck.total_cards(),
            distinct_cards: deck.distinct_cards(),
            color_identity: deck.color_identity(),
        }
    }
}

/// Serializable lookup output shared by the CLI and the HTTP API
#[derive(Debug, Clone, Serialize)]
pub struct LookupReport<'a> {
    pub deck: DeckSummary,
    #[serde(flatten)]
    pub results: FinderResults<'a>,
}

impl<'a> LookupReport<'a> {
    #[must_use]
    pub fn new(deck: &Deck, results: FinderResults<'a>) -> Self {
        Self {
            deck: DeckSummary::from(deck),
            results,
        }
    }
}

/// Runs a lookup end to end: match, partition by identity, narrow, sort
pub struct ComboFinder<'a> {
    engine: MatchingEngine<'a>,
}

impl<'a> ComboFinder<'a> {
    #[must_use]
    pub fn new(catalog: &'a ComboCatalog) -> Self {
        Self {
            engine: MatchingEngine::new(catalog),
        }
    }

    #[must_use]
    pub fn with_config(catalog: &'a ComboCatalog, config: MatchingConfig) -> Self {
        Self {
            engine: MatchingEngine::with_config(catalog, config),
        }
    }

    #[must_use]
    pub fn lookup(&self, request: &FinderRequest) -> FinderResults<'a> {
        let deck_identity = request.deck_identity();
        let matches = self.engine.find_matches(&request.deck);
        let missing_cards = matches.missing_cards();

        let split = partition(matches.potential, deck_identity);
        let outside_total = split.outside.len();
        let selected = request.selected.unwrap_or_else(default_selection);

        let mut exact = matches.exact;
        let mut potential_within = split.within;
        let mut potential_outside = filter_outside(split.outside, selected);
        let hidden_outside = outside_total - potential_outside.len();

        sort_combos(&mut exact, &request.sort);
        sort_combos(&mut potential_within, &request.sort);
        sort_combos(&mut potential_outside, &request.sort);

        debug!(
            "Lookup for identity {}: {} exact, {} within, {} outside ({} hidden by selection {})",
            deck_identity,
            exact.len(),
            potential_within.len(),
            potential_outside.len(),
            hidden_outside,
            selected
        );

        FinderResults {
            deck_identity,
            exact,
            potential_within,
            potential_outside,
            hidden_outside,
            missing_cards,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::requirement::CardGrouping;
    use crate::matching::sorting::{SortDirection, SortKey};

    fn combo(id: u64, tokens: &[&str], identity: &str) -> ComboRecord {
        ComboRecord::new(
            id,
            CardGrouping::from_tokens(tokens).unwrap(),
            identity.parse().unwrap(),
        )
    }

    fn deck(cards: &[&str], identity: &str) -> Deck {
        let mut deck = Deck::new();
        for name in cards {
            deck.add(Card::new(*name), 1, identity.parse().unwrap()).unwrap();
        }
        deck
    }

    fn catalog() -> ComboCatalog {
        ComboCatalog::from_records(vec![
            combo(1, &["A", "B", "C"], "g"),
            combo(2, &["A", "B"], "g"),
            combo(3, &["A", "D"], "wb"),
            combo(4, &["B", "E"], "w"),
            combo(5, &["A", "F"], "c"),
        ])
    }

    #[test]
    fn test_lookup_sections() {
        let catalog = catalog();
        let finder = ComboFinder::new(&catalog);
        let results = finder.lookup(&FinderRequest::new(deck(&["A", "B"], "g")));

        let exact: Vec<u64> = results.exact.iter().map(|c| c.id.0).collect();
        assert_eq!(exact, [2]);

        // Default sort is by color rank: colorless before green
        let within: Vec<u64> = results.potential_within.iter().map(|p| p.combo.id.0).collect();
        assert_eq!(within, [5, 1]);

        let outside: Vec<u64> = results.potential_outside.iter().map(|p| p.combo.id.0).collect();
        assert_eq!(outside, [4, 3]);
        assert_eq!(results.hidden_outside, 0);

        let missing: Vec<&str> = results.missing_cards.iter().map(|c| c.name()).collect();
        assert_eq!(missing, ["C", "D", "E", "F"]);
    }

    #[test]
    fn test_selection_narrows_outside() {
        let catalog = catalog();
        let finder = ComboFinder::new(&catalog);
        let request = FinderRequest::new(deck(&["A", "B"], "g"))
            .with_selection("w".parse().unwrap())
            .with_sort(SortOptions::new(SortKey::Id, SortDirection::Descending));
        let results = finder.lookup(&request);

        let outside: Vec<u64> = results.potential_outside.iter().map(|p| p.combo.id.0).collect();
        assert_eq!(outside, [4]);
        assert_eq!(results.hidden_outside, 1);

        let within: Vec<u64> = results.potential_within.iter().map(|p| p.combo.id.0).collect();
        assert_eq!(within, [5, 1]);
    }

    #[test]
    fn test_stated_colors_widen_but_never_narrow_identity() {
        let catalog = ComboCatalog::from_records(vec![
            combo(1, &["Llanowar Elves", "Freed from the Real"], "g"),
            combo(2, &["Sol Ring", "Dark Ritual"], "b"),
        ]);
        let mut held = Deck::new();
        held.add(Card::new("Llanowar Elves"), 1, "g".parse().unwrap()).unwrap();
        held.add(Card::new("Sol Ring"), 1, ColorIdentity::COLORLESS).unwrap();

        let request = FinderRequest::new(held.clone()).with_deck_colors(ColorIdentity::COLORLESS);
        assert_eq!(request.deck_identity(), "g".parse().unwrap());
        let results = ComboFinder::new(&catalog).lookup(&request);
        let within: Vec<u64> = results.potential_within.iter().map(|p| p.combo.id.0).collect();
        assert_eq!(within, [1]);

        let request = FinderRequest::new(held).with_deck_colors("b".parse().unwrap());
        assert_eq!(request.deck_identity(), "bg".parse().unwrap());
        assert_eq!(request.deck.color_identity(), "g".parse().unwrap());
        let results = ComboFinder::new(&catalog).lookup(&request);
        assert_eq!(results.potential_within.len(), 2);
        assert!(results.potential_outside.is_empty());
    }

    #[test]
    fn test_single_card_deck_finds_nothing() {
        let catalog = catalog();
        let results = ComboFinder::new(&catalog).lookup(&FinderRequest::new(deck(&["A"], "g")));
        assert!(results.is_empty());
        assert!(results.missing_cards.is_empty());
    }
}
