//! Combo catalog decoding, storage and indexing.
//!
//! The catalog holds every known combo decoded from a compact JSON snapshot
//! (optionally gzip-compressed). A small sample snapshot is compiled into the
//! binary; the full catalog is loaded from a file.
//!
//! ## Example
//!
//! ```rust
//! use combo_finder::ComboCatalog;
//! use combo_finder::core::card::Card;
//!
//! // Load the embedded sample catalog
//! let catalog = ComboCatalog::load_embedded().unwrap();
//!
//! for combo in catalog.combos_with_card(&Card::new("Basalt Monolith")) {
//!     println!("{} {}", combo.id, combo.permalink());
//! }
//! ```
//!
//! ## Custom Catalogs
//!
//! ```rust,no_run
//! use combo_finder::ComboCatalog;
//! use combo_finder::catalog::snapshot::CatalogDecoder;
//! use std::path::Path;
//!
//! // Skip malformed entries instead of failing the whole load
//! let catalog =
//!     ComboCatalog::load_from_file(Path::new("combos.json.gz"), &CatalogDecoder::lenient())
//!         .unwrap();
//! eprintln!("skipped {} entries", catalog.skipped().len());
//! ```

pub mod card_data;
pub mod index;
pub mod snapshot;
pub mod store;
