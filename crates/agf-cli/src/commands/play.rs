//! Interactive play loop over stdin — the local stand-in for a chat
//! transport delivering one choice at a time.

use std::io::{self, BufRead, Write};
use std::path::Path;

use agf_core::Ending;
use agf_engine::{Engine, EngineError, SceneView};
use colored::Colorize;

pub fn run(dir: &Path, name: &str) -> Result<(), String> {
    let engine = Engine::new();
    let summary = engine.load_dir(dir);
    for (skipped, err) in &summary.skipped {
        eprintln!("warning: skipped '{skipped}': {err}");
    }

    let mut view = engine
        .start_session("local", name)
        .map_err(|e| e.to_string())?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_view(&view);
        if view.is_terminal() {
            break;
        }

        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        let Some(line) = lines.next() else {
            engine.quit_session("local");
            println!("Adventure quit.");
            return Ok(());
        };
        let line = line.map_err(|e| e.to_string())?;
        let input = line.trim();
        if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
            engine.quit_session("local");
            println!("Adventure quit.");
            return Ok(());
        }

        let Ok(number) = input.parse::<usize>() else {
            println!("Enter a choice number, or 'q' to quit.");
            continue;
        };
        match engine.submit_choice("local", number.wrapping_sub(1)) {
            Ok(next) => view = next,
            Err(EngineError::ChoiceOutOfRange { available, .. }) => {
                println!("Pick a number between 1 and {available}.");
            }
            Err(e) => return Err(e.to_string()),
        }
    }

    Ok(())
}

fn print_view(view: &SceneView) {
    println!();
    println!("{}", view.narrative);
    for (i, label) in view.choices.iter().enumerate() {
        println!("  {} {label}", format!("[{}]", i + 1).cyan());
    }
    match view.outcome {
        Some(Ending::Win) => println!("{}", "GM: Adventure completed".green()),
        Some(Ending::Lose) => println!("{}", "GM: Adventure end...".red()),
        None => {}
    }
}
