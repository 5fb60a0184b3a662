use std::path::Path;

use agf_engine::Engine;

/// Parse an adventure file and store its canonical form under `dir`,
/// creating the directory if needed. The persisted filename is the
/// normalized catalog name plus the `.agf` extension.
pub fn run(file: &Path, dir: &Path, name: Option<&str>) -> Result<(), String> {
    let source = std::fs::read_to_string(file)
        .map_err(|e| format!("cannot read {}: {e}", file.display()))?;

    let name = match name {
        Some(n) => n.to_string(),
        None => file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| format!("cannot derive a name from {}", file.display()))?,
    };

    let engine = Engine::new();
    let upserted = match engine.submit_adventure(&name, &source) {
        Ok(upserted) => upserted,
        Err(err) => {
            super::print_parse_error(&source, file, &err);
            return Err("parsing failed".into());
        }
    };

    std::fs::create_dir_all(dir).map_err(|e| format!("cannot create {}: {e}", dir.display()))?;
    let target = dir.join(format!("{}.agf", upserted.name));
    std::fs::write(&target, &upserted.canonical)
        .map_err(|e| format!("cannot write {}: {e}", target.display()))?;

    println!(
        "  Added '{}' as {}",
        upserted.adventure.title(),
        target.display()
    );

    Ok(())
}
