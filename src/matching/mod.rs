//! Deck-to-combo matching, color-identity partitioning and sorting.
//!
//! This module provides the core lookup functionality:
//!
//! - [`MatchingEngine`]: classifies every catalog combo against a deck
//! - [`partition`](partition::partition): splits potential matches by deck identity
//! - [`sort_combos`]: orders any combo list by a [`SortKey`] cascade
//! - [`ComboFinder`]: runs the whole pipeline for one request
//!
//! ## Matching Algorithm
//!
//! For each combo, the engine computes which requirements the deck fails:
//!
//! 1. **Concrete cards**: missing when the deck holds fewer copies than required,
//!    counted once per card however large the deficit
//! 2. **Templates**: always missing, a deck cannot satisfy them by name
//!
//! No missing requirements makes an *exact* match; otherwise the combo is a
//! *potential* match when the count is within the configured [`Tolerance`].
//! Decks with fewer than two distinct cards never match anything.
//!
//! ## Example
//!
//! ```rust
//! use combo_finder::{ComboCatalog, ComboFinder, FinderRequest};
//! use combo_finder::core::deck::NoColorData;
//! use combo_finder::parsing::decklist::parse_deck;
//!
//! let catalog = ComboCatalog::load_embedded().unwrap();
//! let deck = parse_deck("1 Basalt Monolith\n1 Rings of Brighthearth", &NoColorData).unwrap();
//!
//! let results = ComboFinder::new(&catalog).lookup(&FinderRequest::new(deck));
//! for combo in &results.exact {
//!     println!("{} {}", combo.id, combo.permalink());
//! }
//! assert!(!results.exact.is_empty());
//! ```

pub mod engine;
pub mod finder;
pub mod partition;
pub mod sorting;

pub use engine::{DeckMatches, MatchingConfig, MatchingEngine, PotentialMatch, Tolerance};
pub use finder::{ComboFinder, DeckSummary, FinderRequest, FinderResults, LookupReport};
pub use sorting::{sort_combos, SortDirection, SortKey, SortOptions};
