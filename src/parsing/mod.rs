//! Parsers for user-supplied decklists.
//!
//! Decklists are plain text, one card per line, in the format most deck
//! builders export:
//!
//! ```text
//! // Commander
//! 1 Kinnan, Bonder Prodigy
//! 1x Basalt Monolith
//! 2 Island (NEO) 294
//! Sol Ring
//! ```
//!
//! ## Example
//!
//! ```rust
//! use combo_finder::parsing::decklist::parse_deck;
//! use combo_finder::core::deck::NoColorData;
//!
//! let deck = parse_deck("1 Sol Ring\n1 Basalt Monolith", &NoColorData).unwrap();
//! assert_eq!(deck.distinct_cards(), 2);
//! ```

pub mod decklist;
