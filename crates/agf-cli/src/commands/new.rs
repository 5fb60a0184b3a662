use std::path::{Path, PathBuf};

pub fn run(name: &str, file: Option<&Path>) -> Result<(), String> {
    let path = file.map(Path::to_path_buf).unwrap_or_else(|| {
        PathBuf::from(format!("{}.agf", name.to_lowercase().replace(' ', "_")))
    });
    if path.exists() {
        return Err(format!("{} already exists", path.display()));
    }

    let text = template(name);
    std::fs::write(&path, text).map_err(|e| format!("cannot write {}: {e}", path.display()))?;

    println!("  Created {} — edit it, then run 'agf check'", path.display());
    Ok(())
}

fn template(title: &str) -> String {
    let title = title.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        r#"scene start {{
    title "{title}"
    """
    Your adventure begins here.
    """
    choice "Press on" -> deeper
    choice "Turn back" -> lose
}}

scene deeper {{
    """
    The path ahead splits into darkness.
    """
    choice "Take the lit tunnel" -> win
    choice "Take the dark tunnel" -> lose
}}
"#
    )
}
