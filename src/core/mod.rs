//! Core data types for decklist-to-combo matching.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Card`](card::Card), [`Template`](card::Template): concrete cards and open-ended placeholders
//! - [`Requirement`](requirement::Requirement), [`CardGrouping`](requirement::CardGrouping): what a combo needs
//! - [`ColorIdentity`](color::ColorIdentity): a subset of WUBRG with the canonical display order
//! - [`ComboRecord`](combo::ComboRecord): one decoded catalog entry
//! - [`Deck`](deck::Deck): card quantities plus derived color identity
//! - [`ComboId`](types::ComboId), [`Vendor`](types::Vendor), [`MatchType`](types::MatchType)
//!
//! ## Card Identity
//!
//! Cards are compared by normalized name only (trimmed, whitespace collapsed,
//! lowercased). `"Sol Ring"` and `"sol  ring"` are the same card; misspellings
//! are not corrected.

pub mod card;
pub mod color;
pub mod combo;
pub mod deck;
pub mod requirement;
pub mod types;
