use std::collections::{HashMap, HashSet};

use crate::core::card::Card;
use crate::core::combo::ComboRecord;

/// Index from concrete card to the combos that require it
#[derive(Debug, Clone, Default)]
pub struct CardIndex {
    card_to_combos: HashMap<Card, Vec<usize>>,
}

impl CardIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record combo `index`; each card maps to the combo at most once
    pub fn add(&mut self, index: usize, combo: &ComboRecord) {
        let mut seen: HashSet<&Card> = HashSet::new();
        for (card, _) in combo.cards.cards() {
            if seen.insert(card) {
                self.card_to_combos
                    .entry(card.clone())
                    .or_default()
                    .push(index);
            }
        }
    }

    /// Combo indices requiring `card`, in catalog order
    #[must_use]
    pub fn combos_with(&self, card: &Card) -> &[usize] {
        self.card_to_combos
            .get(card)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct cards across the catalog
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.card_to_combos.len()
    }

    /// Cards appearing in the most combos, most frequent first, ties by name
    #[must_use]
    pub fn most_used(&self, limit: usize) -> Vec<(&Card, usize)> {
        let mut counts: Vec<(&Card, usize)> = self
            .card_to_combos
            .iter()
            .map(|(card, combos)| (card, combos.len()))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        counts.truncate(limit);
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::ColorIdentity;
    use crate::core::requirement::CardGrouping;

    fn combo(id: u64, tokens: &[&str]) -> ComboRecord {
        ComboRecord::new(
            id,
            CardGrouping::from_tokens(tokens).unwrap(),
            ColorIdentity::COLORLESS,
        )
    }

    #[test]
    fn test_combos_with_card() {
        let mut index = CardIndex::new();
        index.add(0, &combo(10, &["Sol Ring", "Basalt Monolith"]));
        index.add(1, &combo(11, &["Sol Ring", "T:Any untapper"]));

        assert_eq!(index.combos_with(&Card::new("sol ring")), [0, 1]);
        assert_eq!(index.combos_with(&Card::new("Basalt Monolith")), [0]);
        assert!(index.combos_with(&Card::new("Any untapper")).is_empty());
        assert_eq!(index.card_count(), 2);
    }

    #[test]
    fn test_duplicate_card_in_combo_indexed_once() {
        let mut index = CardIndex::new();
        index.add(0, &combo(1, &["Island", "2x island"]));
        assert_eq!(index.combos_with(&Card::new("Island")), [0]);
    }

    #[test]
    fn test_most_used() {
        let mut index = CardIndex::new();
        index.add(0, &combo(1, &["B", "A"]));
        index.add(1, &combo(2, &["A", "C"]));
        let top = index.most_used(2);
        assert_eq!(top[0], (&Card::new("A"), 2));
        assert_eq!(top[1], (&Card::new("B"), 1));
    }
}
