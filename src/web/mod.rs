//! HTTP API for decklist lookups.
//!
//! This module serves the combo finder over JSON using Axum. The catalog is
//! loaded once at startup and shared read-only between requests.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080 with the embedded sample catalog
//! combo-finder serve
//!
//! # Full catalog and card data on a custom port
//! combo-finder serve --port 3000 --catalog combos.json.gz --card-data cards.json
//!
//! # Bind to all interfaces
//! combo-finder serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `POST /api/find-my-combos` - Look up a decklist (JSON body with `decklist`)
//! - `GET /api/catalog` - Catalog size and decode report
//! - `GET /api/combos/{id}` - One combo by ID

pub mod server;
