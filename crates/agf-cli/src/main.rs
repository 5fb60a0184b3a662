//! CLI frontend for the AGF branching text-adventure engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "agf",
    about = "agf — a branching text-adventure engine",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an adventure file and report diagnostics
    Check {
        /// The .agf file to check
        file: PathBuf,
    },

    /// Rewrite an adventure file in canonical form
    Fmt {
        /// The .agf file to canonicalize
        file: PathBuf,

        /// Write the canonical text back instead of printing it
        #[arg(short, long)]
        write: bool,
    },

    /// List the adventures stored in a directory
    List {
        /// Directory containing .agf files
        #[arg(short, long, default_value = "adventures")]
        dir: PathBuf,

        /// Emit the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play an adventure interactively
    Play {
        /// Adventure name (case-insensitive)
        name: String,

        /// Directory containing .agf files
        #[arg(short, long, default_value = "adventures")]
        dir: PathBuf,
    },

    /// Add an adventure file to a directory, canonicalized
    Add {
        /// The .agf file to add
        file: PathBuf,

        /// Directory the adventure is stored in
        #[arg(short, long, default_value = "adventures")]
        dir: PathBuf,

        /// Catalog name (default: the file stem)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Write a template adventure to get started
    New {
        /// Adventure title
        name: String,

        /// File to create (default: `<name>.agf`)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { file } => commands::check::run(&file),
        Commands::Fmt { file, write } => commands::fmt::run(&file, write),
        Commands::List { dir, json } => commands::list::run(&dir, json),
        Commands::Play { name, dir } => commands::play::run(&dir, &name),
        Commands::Add { file, dir, name } => commands::add::run(&file, &dir, name.as_deref()),
        Commands::New { name, file } => commands::new::run(&name, file.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
