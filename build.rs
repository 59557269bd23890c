use std::path::Path;

fn main() {
    let snapshot_path = Path::new("catalogs/sample_snapshot.json");
    validate_snapshot_file(snapshot_path);
    set_build_dependencies();
}

fn validate_snapshot_file(snapshot_path: &Path) {
    // Ensure snapshot exists at build time
    assert!(
        snapshot_path.exists(),
        "\n\nSNAPSHOT BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the sample snapshot before building.\n",
        snapshot_path.display()
    );

    let contents = std::fs::read_to_string(snapshot_path).unwrap_or_else(|e| {
        panic!(
            "\n\nSNAPSHOT BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            snapshot_path.display()
        );
    });

    let snapshot: serde_json::Value = serde_json::from_str(&contents).unwrap_or_else(|e| {
        panic!(
            "\n\nSNAPSHOT BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            snapshot_path.display()
        );
    });

    let entries = snapshot.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nSNAPSHOT BUILD ERROR: Root must be a JSON array of combos\n\
             Got: {snapshot}\n"
        );
    });

    let total_cards = validate_entries(entries);

    println!(
        "cargo:warning=Validated sample snapshot: {} combos, {total_cards} card entries",
        entries.len()
    );
}

fn validate_entries(entries: &[serde_json::Value]) -> usize {
    let mut total_cards = 0;
    let mut seen_ids = std::collections::HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        let id = entry
            .get("d")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or_else(|| {
                panic!(
                    "\n\nSNAPSHOT BUILD ERROR: Entry at index {index} missing numeric 'd' (id) field\n"
                );
            });

        assert!(
            seen_ids.insert(id),
            "\n\nSNAPSHOT BUILD ERROR: Duplicate combo id {id} at index {index}\n"
        );

        total_cards += validate_cards(entry, id);
        validate_identity(entry, id);
    }

    total_cards
}

fn validate_cards(entry: &serde_json::Value, id: u64) -> usize {
    let count = match entry.get("c") {
        Some(serde_json::Value::Array(cards)) => cards.len(),
        Some(serde_json::Value::String(joined)) => {
            joined.split('|').filter(|s| !s.trim().is_empty()).count()
        }
        _ => panic!(
            "\n\nSNAPSHOT BUILD ERROR: Combo {id} missing 'c' (cards) list\n"
        ),
    };

    assert!(
        count > 0,
        "\n\nSNAPSHOT BUILD ERROR: Combo {id} has an empty card list\n\
         Every combo needs at least one card.\n"
    );
    count
}

fn validate_identity(entry: &serde_json::Value, id: u64) {
    let identity = entry
        .get("i")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_else(|| {
            panic!("\n\nSNAPSHOT BUILD ERROR: Combo {id} missing 'i' (color identity) field\n");
        });

    assert!(
        identity == "c"
            || identity
                .chars()
                .all(|c| matches!(c.to_ascii_lowercase(), 'w' | 'u' | 'b' | 'r' | 'g')),
        "\n\nSNAPSHOT BUILD ERROR: Combo {id} has invalid color identity '{identity}'\n\
         Use letters from 'wubrg', or 'c' for colorless.\n"
    );
}

fn set_build_dependencies() {
    // Tell cargo to rerun if snapshot changes
    println!("cargo:rerun-if-changed=catalogs/sample_snapshot.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
