use std::path::Path;

use agf_engine::Engine;
use comfy_table::{ContentArrangement, Table};

pub fn run(dir: &Path, json: bool) -> Result<(), String> {
    let engine = Engine::new();
    let summary = engine.load_dir(dir);
    for (name, err) in &summary.skipped {
        eprintln!("warning: skipped '{name}': {err}");
    }

    let adventures = engine.list_adventures();

    if json {
        let entries: Vec<_> = adventures
            .iter()
            .map(|(name, title)| serde_json::json!({ "name": name, "title": title }))
            .collect();
        let out = serde_json::to_string_pretty(&entries).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    if adventures.is_empty() {
        println!("  No adventures found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Title"]);
    for (name, title) in &adventures {
        table.add_row(vec![name, title]);
    }

    println!("{table}");
    println!();
    println!("  {} adventures", adventures.len());

    Ok(())
}
