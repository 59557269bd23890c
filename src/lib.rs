//! # combo-finder
//!
//! A library for finding the card combos a decklist already contains, or is
//! a few cards away from.
//!
//! A combo catalog lists thousands of card combinations, each with the cards
//! it needs, its color identity, and how it plays out. Given a deck,
//! `combo-finder` reports three lists:
//!
//! - **Exact matches**: every card the combo needs is in the deck
//! - **Potential matches within the deck's colors**: some cards missing
//! - **Potential matches outside the deck's colors**: narrowed by the colors
//!   the player is willing to add
//!
//! Each list can be ordered by id, card count, prerequisites, steps, results,
//! color identity, or price.
//!
//! ## Features
//!
//! - **Compact snapshot decoding**: plain or gzip JSON, strict or lenient
//! - **Hash-based matching**: one pass over the catalog per deck
//! - **Templates**: open-ended requirements are reported as missing
//! - **Cascading sorts**: price ties fall back to colors, then card count
//!
//! ## Example
//!
//! ```rust
//! use combo_finder::{ComboCatalog, ComboFinder, FinderRequest, SortKey, SortOptions, SortDirection};
//! use combo_finder::core::deck::NoColorData;
//! use combo_finder::parsing::decklist::parse_deck;
//!
//! // Load the embedded sample catalog
//! let catalog = ComboCatalog::load_embedded().unwrap();
//!
//! // Parse a decklist
//! let deck = parse_deck("1 Thassa's Oracle\n1 Demonic Consultation\n1 Sol Ring", &NoColorData).unwrap();
//!
//! // Find combos, fewest cards first
//! let request = FinderRequest::new(deck)
//!     .with_sort(SortOptions::new(SortKey::Cards, SortDirection::Ascending));
//! let results = ComboFinder::new(&catalog).lookup(&request);
//!
//! for combo in &results.exact {
//!     println!("{}: {}", combo.id, combo.permalink());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Snapshot decoding, combo storage and indexing
//! - [`core`]: Core data types for cards, colors, combos, and decks
//! - [`matching`]: Matching engine, identity partitioning, and sorting
//! - [`parsing`]: Decklist parser
//! - [`utils`]: Input limits for untrusted decklists
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: HTTP API

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use catalog::store::ComboCatalog;
pub use core::color::{Color, ColorIdentity};
pub use core::combo::ComboRecord;
pub use core::deck::Deck;
pub use core::requirement::{CardGrouping, Requirement};
pub use core::types::*;
pub use matching::engine::{DeckMatches, MatchingConfig, MatchingEngine, PotentialMatch, Tolerance};
pub use matching::finder::{ComboFinder, FinderRequest, FinderResults};
pub use matching::sorting::{sort_combos, SortDirection, SortKey, SortOptions};
