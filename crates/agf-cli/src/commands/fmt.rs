use std::path::Path;

pub fn run(file: &Path, write: bool) -> Result<(), String> {
    let (source, adventure) = super::parse_file(file)?;
    let canonical = agf_dsl::serialize(&adventure);

    if write {
        if canonical == source {
            println!("  {} is already canonical", file.display());
        } else {
            std::fs::write(file, &canonical)
                .map_err(|e| format!("cannot write {}: {e}", file.display()))?;
            println!("  Rewrote {}", file.display());
        }
    } else {
        print!("{canonical}");
    }

    Ok(())
}
