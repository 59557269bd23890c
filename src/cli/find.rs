use std::path::PathBuf;

use clap::Args;

use crate::catalog::card_data::CardDataStore;
use crate::cli::{CatalogSourceArgs, OutputFormat};
use crate::core::color::ColorIdentity;
use crate::core::combo::ComboRecord;
use crate::core::deck::{Deck, NoColorData};
use crate::core::types::Vendor;
use crate::matching::engine::{MatchingConfig, PotentialMatch, Tolerance};
use crate::matching::finder::{ComboFinder, FinderRequest, FinderResults, LookupReport};
use crate::matching::sorting::{SortDirection, SortKey, SortOptions};
use crate::parsing::decklist::{build_deck, parse_decklist_file, parse_decklist_text, DeckEntry};

#[derive(Args)]
pub struct FindArgs {
    /// Decklist file, one card per line ("1x Sol Ring")
    /// Use '-' for stdin
    #[arg(required = true)]
    pub decklist: PathBuf,

    #[command(flatten)]
    pub source: CatalogSourceArgs,

    /// Deck colors (e.g. "wub"), added to the identity derived from card data
    #[arg(long)]
    pub deck_colors: Option<ColorIdentity>,

    /// Extra colors to consider for combos outside the deck's identity
    #[arg(long, default_value = "wubrg")]
    pub colors: ColorIdentity,

    /// Only list potential combos missing at most this many cards
    #[arg(long)]
    pub max_missing: Option<usize>,

    /// Sort key: id, cards, prerequisites, steps, results, colors, price
    #[arg(long, default_value = "colors")]
    pub sort: SortKey,

    /// Sort order: asc or desc
    #[arg(long, default_value = "asc")]
    pub order: SortDirection,

    /// Price vendor used for price sorting and display
    #[arg(long, default_value = "cardkingdom")]
    pub vendor: Vendor,

    /// Hide combos containing banned cards
    #[arg(long)]
    pub hide_banned: bool,

    /// Hide combos containing unreleased preview cards
    #[arg(long)]
    pub hide_previews: bool,
}

/// Execute find subcommand
///
/// # Errors
///
/// Returns an error if the decklist cannot be parsed or the catalog fails to load.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FindArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let entries = read_decklist(&args)?;
    let (catalog, card_data) = args.source.load(verbose)?;

    let deck = deck_from_entries(&entries, card_data.as_ref())?;

    if verbose {
        eprintln!(
            "Parsed {} cards ({} distinct), color identity {}",
            deck.total_cards(),
            deck.distinct_cards(),
            deck.color_identity()
        );
    }

    let config = MatchingConfig {
        tolerance: args.max_missing.map_or(Tolerance::Unbounded, Tolerance::AtMost),
        exclude_banned: args.hide_banned,
        exclude_spoiled: args.hide_previews,
    };
    let sort = SortOptions::new(args.sort, args.order).with_vendor(args.vendor);
    let mut request = FinderRequest::new(deck)
        .with_selection(args.colors)
        .with_sort(sort);
    request.deck_colors = args.deck_colors;

    let results = ComboFinder::with_config(&catalog, config).lookup(&request);

    match format {
        OutputFormat::Text => print_text_results(&request.deck, &results, args.vendor),
        OutputFormat::Json => {
            let report = LookupReport::new(&request.deck, results);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Tsv => print_tsv_results(&results, args.vendor),
    }

    Ok(())
}

fn read_decklist(args: &FindArgs) -> anyhow::Result<Vec<DeckEntry>> {
    use std::io::{self, Read};

    // Handle stdin
    if args.decklist.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(parse_decklist_text(&buffer)?);
    }

    Ok(parse_decklist_file(&args.decklist)?)
}

fn deck_from_entries(
    entries: &[DeckEntry],
    card_data: Option<&CardDataStore>,
) -> anyhow::Result<Deck> {
    let deck = match card_data {
        Some(store) => build_deck(entries, store)?,
        None => build_deck(entries, &NoColorData)?,
    };
    Ok(deck)
}

fn card_list(combo: &ComboRecord) -> String {
    combo
        .cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" + ")
}

fn print_combo_line(combo: &ComboRecord, vendor: Vendor) {
    println!("   [{}] #{} {}", combo.color_identity, combo.id, card_list(combo));
    if let Some(result) = combo.results.iter().next() {
        let extra = combo.results.len() - 1;
        if extra > 0 {
            println!("       {result} (+{extra} more)");
        } else {
            println!("       {result}");
        }
    }
    let price = combo.price(vendor);
    if price > 0.0 {
        println!("       ${price:.2} at {vendor}");
    }
    println!("       {}", combo.permalink());
}

fn print_potential_section(title: &str, matches: &[PotentialMatch<'_>], vendor: Vendor) {
    if matches.is_empty() {
        return;
    }
    println!("\n{title} ({})", matches.len());
    println!("{}", "─".repeat(60));
    for m in matches {
        print_combo_line(m.combo, vendor);
        let missing: Vec<String> = m.missing.iter().map(ToString::to_string).collect();
        println!("       Missing: {}", missing.join(", "));
    }
}

fn print_text_results(deck: &Deck, results: &FinderResults<'_>, vendor: Vendor) {
    println!(
        "Deck: {} cards ({} distinct), color identity {}",
        deck.total_cards(),
        deck.distinct_cards(),
        results.deck_identity
    );

    if results.is_empty() {
        println!("\nNo combos found.");
        return;
    }

    if !results.exact.is_empty() {
        println!("\nCombos in deck ({})", results.exact.len());
        println!("{}", "─".repeat(60));
        for combo in &results.exact {
            print_combo_line(combo, vendor);
        }
    }

    print_potential_section(
        "Potential combos within deck colors",
        &results.potential_within,
        vendor,
    );
    print_potential_section(
        "Potential combos needing additional colors",
        &results.potential_outside,
        vendor,
    );

    if results.hidden_outside > 0 {
        println!(
            "\n   {} more combos hidden by the color selection",
            results.hidden_outside
        );
    }

    if !results.missing_cards.is_empty() {
        let names: Vec<&str> = results.missing_cards.iter().map(|c| c.name()).collect();
        println!("\nCards to acquire ({}): {}", names.len(), names.join(", "));
    }
}

fn print_tsv_results(results: &FinderResults<'_>, vendor: Vendor) {
    println!("section\tid\tcolor_identity\tcards\tmissing\tprice\tpermalink");

    let rows = results
        .exact
        .iter()
        .map(|combo| ("exact", *combo, String::new()))
        .chain(potential_rows("within", &results.potential_within))
        .chain(potential_rows("outside", &results.potential_outside));

    for (section, combo, missing) in rows {
        println!(
            "{section}\t{}\t{}\t{}\t{missing}\t{:.2}\t{}",
            combo.id,
            combo.color_identity,
            combo.cards.to_tokens().join("|"),
            combo.price(vendor),
            combo.permalink()
        );
    }
}

fn potential_rows<'r, 'a>(
    section: &'static str,
    matches: &'r [PotentialMatch<'a>],
) -> impl Iterator<Item = (&'static str, &'a ComboRecord, String)> + 'r
where
    'a: 'r,
{
    matches.iter().map(move |m| {
        let missing: Vec<String> = m.missing.iter().map(|r| r.to_token()).collect();
        (section, m.combo, missing.join("|"))
    })
}
