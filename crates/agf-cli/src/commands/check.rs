use std::path::Path;

pub fn run(file: &Path) -> Result<(), String> {
    let (_, adventure) = super::parse_file(file)?;

    println!("  All checks passed for '{}'.", adventure.title());
    println!(
        "  {} scenes, start at '{}'",
        adventure.scene_count(),
        adventure.start()
    );

    Ok(())
}
