pub mod add;
pub mod check;
pub mod fmt;
pub mod list;
pub mod new;
pub mod play;

use std::path::Path;

use agf_core::Adventure;
use agf_dsl::{Diagnostic, ParseError};

/// Read and parse an adventure file, rendering any diagnostic to stderr.
pub fn parse_file(path: &Path) -> Result<(String, Adventure), String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    match agf_dsl::parse(&source) {
        Ok(adventure) => Ok((source, adventure)),
        Err(err) => {
            print_parse_error(&source, path, &err);
            Err("parsing failed".into())
        }
    }
}

/// Render a parse error with source context to stderr.
pub fn print_parse_error(source: &str, path: &Path, err: &ParseError) {
    let filename = path.display().to_string();
    let rendered = agf_dsl::render_diagnostic(source, &filename, &Diagnostic::from(err));
    eprint!("{rendered}");
}
