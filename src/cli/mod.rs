//! Command-line interface for combo-finder.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **find**: Find the combos a decklist contains or is close to
//! - **catalog**: List, show, summarize, or export combos from the catalog
//! - **serve**: Start the HTTP API
//!
//! ## Usage
//!
//! ```text
//! # Look up a decklist
//! combo-finder find deck.txt --catalog combos.json.gz --card-data cards.json
//!
//! # Pipe a decklist in, cheapest combos first
//! pbpaste | combo-finder find - --sort price --vendor tcgplayer
//!
//! # JSON output for scripting
//! combo-finder find deck.txt --format json
//!
//! # Browse the catalog
//! combo-finder catalog list --card "Basalt Monolith"
//!
//! # Start the API
//! combo-finder serve --port 8080 --catalog combos.json.gz
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::catalog::card_data::CardDataStore;
use crate::catalog::snapshot::{CatalogDecoder, DecodeMode};
use crate::catalog::store::ComboCatalog;

pub mod catalog;
pub mod find;

#[derive(Parser)]
#[command(name = "combo-finder")]
#[command(author = "Commander Spellbook Contributors")]
#[command(version)]
#[command(about = "Find the combos a decklist holds or is close to assembling")]
#[command(
    long_about = "combo-finder matches a decklist against a catalog of known card combos.\n\nFor every lookup it reports:\n- Combos the deck already contains\n- Combos within the deck's colors that are missing a few cards\n- Combos that would need additional colors"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find combos in a decklist
    Find(find::FindArgs),

    /// Inspect the combo catalog
    Catalog(catalog::CatalogArgs),

    /// Start the web server
    Serve(ServeArgs),
}

/// Where the catalog and card data come from
#[derive(clap::Args, Clone, Debug, Default)]
pub struct CatalogSourceArgs {
    /// Path to a catalog snapshot (JSON or gzip); defaults to the embedded sample
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Skip malformed catalog entries instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Path to card data (color identities and prices)
    #[arg(long)]
    pub card_data: Option<PathBuf>,
}

impl CatalogSourceArgs {
    /// Load card data, if given, then the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or decoded.
    pub fn load(&self, verbose: bool) -> anyhow::Result<(ComboCatalog, Option<CardDataStore>)> {
        let card_data = self
            .card_data
            .as_deref()
            .map(CardDataStore::load_from_file)
            .transpose()?;

        if verbose {
            if let Some(store) = &card_data {
                eprintln!("Loaded card data for {} cards", store.len());
            }
        }

        let catalog = match &self.catalog {
            Some(path) => {
                let mode = if self.lenient {
                    DecodeMode::Lenient
                } else {
                    DecodeMode::Strict
                };
                let mut decoder = CatalogDecoder::new(mode);
                if let Some(store) = &card_data {
                    decoder = decoder.with_card_data(store);
                }
                ComboCatalog::load_from_file(path, &decoder)?
            }
            None => ComboCatalog::load_embedded()?,
        };

        debug!("Catalog ready: {} combos", catalog.len());
        if verbose {
            eprintln!("Loaded catalog with {} combos", catalog.len());
            if !catalog.skipped().is_empty() {
                eprintln!(
                    "Skipped {} malformed catalog entries",
                    catalog.skipped().len()
                );
            }
        }

        Ok((catalog, card_data))
    }
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    #[command(flatten)]
    pub source: CatalogSourceArgs,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
