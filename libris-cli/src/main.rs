//! Libris CLI - Interactive session over an in-memory book catalog

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use libris_core::Limits;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate a ranking size (must be at least 1)
fn parse_limit(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("limit must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "libris")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive catalog session reading commands from stdin
    Shell {
        /// Directory used for text import and export
        #[arg(long, default_value = ".")]
        files_dir: PathBuf,

        /// Size of the overall ranking
        #[arg(long, default_value = "10", value_parser = parse_limit)]
        top: usize,

        /// Size of a per-genre ranking
        #[arg(long, default_value = "10", value_parser = parse_limit)]
        top_genre: usize,

        /// Size of a per-author ranking
        #[arg(long, default_value = "3", value_parser = parse_limit)]
        top_author: usize,
    },

    /// Check a candidate book against the validation rules
    Check {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        author: String,

        #[arg(long, default_value = "")]
        genre: String,

        #[arg(long, default_value = "")]
        year: String,

        #[arg(long)]
        rating: Option<String>,

        #[arg(long)]
        review: Option<String>,

        #[arg(long)]
        text: Option<String>,

        /// Validate for saving an existing book (text optional)
        #[arg(long)]
        edit: bool,

        /// Output errors as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "libris_cli=debug,libris_core=debug"
    } else {
        "libris_cli=info,libris_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Shell {
            files_dir,
            top,
            top_genre,
            top_author,
        } => {
            let limits = Limits {
                top_overall: top,
                top_by_genre: top_genre,
                top_by_author: top_author,
            };
            commands::shell(files_dir, limits).await
        }

        Commands::Check {
            name,
            author,
            genre,
            year,
            rating,
            review,
            text,
            edit,
            json,
        } => {
            let mut draft = libris_core::BookDraft::new(name, author, genre, year);
            draft.rating = rating;
            draft.review = review;
            draft.text = text;
            commands::check(&draft, edit, json)
        }
    }
}
