use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::catalog::snapshot::encode;
use crate::catalog::store::ComboCatalog;
use crate::cli::{CatalogSourceArgs, OutputFormat};
use crate::core::card::Card;
use crate::core::combo::ComboRecord;
use crate::core::types::{ComboId, Vendor};
use crate::matching::sorting::{sort_combos, SortDirection, SortKey, SortOptions};

/// Number of most-used cards shown by `catalog stats`
const TOP_CARDS: usize = 10;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List combos in the catalog
    List {
        #[command(flatten)]
        source: CatalogSourceArgs,

        /// Only combos requiring this card
        #[arg(long)]
        card: Option<String>,

        /// Sort key: id, cards, prerequisites, steps, results, colors, price
        #[arg(long, default_value = "id")]
        sort: SortKey,

        /// Sort order: asc or desc
        #[arg(long, default_value = "asc")]
        order: SortDirection,

        /// Price vendor used for price sorting
        #[arg(long, default_value = "cardkingdom")]
        vendor: Vendor,
    },

    /// Show details of a specific combo
    Show {
        /// Combo ID
        #[arg(required = true)]
        id: u64,

        #[command(flatten)]
        source: CatalogSourceArgs,
    },

    /// Summarize the catalog
    Stats {
        #[command(flatten)]
        source: CatalogSourceArgs,
    },

    /// Export the catalog as a compact snapshot (gzip when OUTPUT ends in .gz)
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,

        #[command(flatten)]
        source: CatalogSourceArgs,
    },
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, a combo is not found,
/// or the export cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List {
            source,
            card,
            sort,
            order,
            vendor,
        } => {
            let options = SortOptions::new(sort, order).with_vendor(vendor);
            run_list(&source, card.as_deref(), &options, format, verbose)
        }
        CatalogCommands::Show { id, source } => run_show(id, &source, format, verbose),
        CatalogCommands::Stats { source } => run_stats(&source, format, verbose),
        CatalogCommands::Export { output, source } => run_export(&output, &source, verbose),
    }
}

fn run_list(
    source: &CatalogSourceArgs,
    card_filter: Option<&str>,
    options: &SortOptions,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let (catalog, _) = source.load(verbose)?;

    let mut combos: Vec<&ComboRecord> = match card_filter {
        Some(name) => catalog.combos_with_card(&Card::new(name)).collect(),
        None => catalog.combos().iter().collect(),
    };
    sort_combos(&mut combos, options);

    match format {
        OutputFormat::Text => {
            if combos.is_empty() {
                println!("No combos found.");
                return Ok(());
            }

            let id_width = combos
                .iter()
                .map(|c| c.id.to_string().len())
                .max()
                .unwrap_or(2)
                .max(2);

            println!("Combo Catalog ({} combos)\n", combos.len());
            println!(
                "{:<id_w$} {:<6} {:>5} {:>9}  Cards",
                "ID",
                "Colors",
                "Steps",
                "Price",
                id_w = id_width
            );
            println!("{}", "-".repeat(id_width + 30));

            for combo in &combos {
                let cards: Vec<String> = combo.cards.iter().map(ToString::to_string).collect();
                println!(
                    "{:<id_w$} {:<6} {:>5} {:>9.2}  {}",
                    combo.id,
                    combo.color_identity.to_string(),
                    combo.steps.len(),
                    combo.price(options.vendor),
                    cards.join(" + "),
                    id_w = id_width
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&combos)?);
        }
        OutputFormat::Tsv => {
            println!("id\tcolor_identity\tcards\tsteps\tprice\tpermalink");
            for combo in &combos {
                println!(
                    "{}\t{}\t{}\t{}\t{:.2}\t{}",
                    combo.id,
                    combo.color_identity,
                    combo.cards.to_tokens().join("|"),
                    combo.steps.len(),
                    combo.price(options.vendor),
                    combo.permalink()
                );
            }
        }
    }

    Ok(())
}

fn run_show(
    id: u64,
    source: &CatalogSourceArgs,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let (catalog, _) = source.load(verbose)?;

    let combo = catalog
        .get(ComboId::new(id))
        .ok_or_else(|| anyhow::anyhow!("Combo not found: {id}"))?;

    match format {
        OutputFormat::Text => print_combo_details(combo),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(combo)?);
        }
        OutputFormat::Tsv => {
            println!("section\tposition\tvalue");
            let sections = [
                ("card", combo.cards.to_tokens()),
                ("prerequisite", combo.prerequisites.items().to_vec()),
                ("step", combo.steps.items().to_vec()),
                ("result", combo.results.items().to_vec()),
            ];
            for (section, items) in sections {
                for (i, item) in items.iter().enumerate() {
                    println!("{section}\t{}\t{item}", i + 1);
                }
            }
        }
    }

    Ok(())
}

fn print_numbered(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{title}:");
    for (i, item) in items.iter().enumerate() {
        println!("  {}. {item}", i + 1);
    }
}

fn print_combo_details(combo: &ComboRecord) {
    println!("Combo {}", combo.id);
    println!("Color identity: {}", combo.color_identity);
    if combo.has_banned_card {
        println!("Contains a banned card");
    }
    if combo.has_spoiled_card {
        println!("Contains a preview card");
    }

    let cards = combo.cards.to_tokens();
    print_numbered("Cards", &cards);
    print_numbered("Prerequisites", combo.prerequisites.items());
    print_numbered("Steps", combo.steps.items());
    print_numbered("Results", combo.results.items());

    if !combo.prices.is_empty() {
        println!("\nPrices:");
        for (vendor, price) in &combo.prices {
            println!("  {vendor}: ${price:.2}");
        }
    }

    println!("\n{}", combo.permalink());
}

fn run_stats(source: &CatalogSourceArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (catalog, _) = source.load(verbose)?;

    let mut by_color_count: BTreeMap<u32, usize> = BTreeMap::new();
    for combo in catalog.combos() {
        *by_color_count.entry(combo.color_identity.count()).or_insert(0) += 1;
    }
    let banned = catalog.combos().iter().filter(|c| c.has_banned_card).count();
    let previews = catalog.combos().iter().filter(|c| c.has_spoiled_card).count();
    let with_templates = catalog
        .combos()
        .iter()
        .filter(|c| c.cards.templates().next().is_some())
        .count();
    let top_cards = catalog.card_index().most_used(TOP_CARDS);

    match format {
        OutputFormat::Text => {
            println!("Combos: {}", catalog.len());
            println!("Distinct cards: {}", catalog.card_index().card_count());
            println!("Skipped entries: {}", catalog.skipped().len());
            println!("With templates: {with_templates}");
            println!("With banned cards: {banned}");
            println!("With preview cards: {previews}");

            println!("\nBy number of colors:");
            for (colors, count) in &by_color_count {
                println!("  {colors}: {count}");
            }

            if !top_cards.is_empty() {
                println!("\nMost used cards:");
                for (card, count) in &top_cards {
                    println!("  {count:>4}  {card}");
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "combos": catalog.len(),
                "distinct_cards": catalog.card_index().card_count(),
                "skipped": catalog.skipped().iter().map(ToString::to_string).collect::<Vec<_>>(),
                "with_templates": with_templates,
                "with_banned_cards": banned,
                "with_preview_cards": previews,
                "by_color_count": by_color_count,
                "most_used_cards": top_cards
                    .iter()
                    .map(|(card, count)| serde_json::json!({ "card": card, "combos": count }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("metric\tvalue");
            println!("combos\t{}", catalog.len());
            println!("distinct_cards\t{}", catalog.card_index().card_count());
            println!("skipped\t{}", catalog.skipped().len());
            println!("with_templates\t{with_templates}");
            println!("with_banned_cards\t{banned}");
            println!("with_preview_cards\t{previews}");
            for (colors, count) in &by_color_count {
                println!("colors_{colors}\t{count}");
            }
        }
    }

    Ok(())
}

fn run_export(output: &Path, source: &CatalogSourceArgs, verbose: bool) -> anyhow::Result<()> {
    let (catalog, _) = source.load(verbose)?;
    let json = encode(catalog.combos())?;

    let gzip = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    if gzip {
        let file = std::fs::File::create(output)
            .with_context(|| format!("Failed to create {}", output.display()))?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(json.as_bytes())?;
        encoder.finish()?;
    } else {
        std::fs::write(output, json)
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }

    println!(
        "Exported {} combos to {}",
        catalog.len(),
        output.display()
    );

    Ok(())
}
