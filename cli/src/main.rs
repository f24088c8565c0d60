#![deny(missing_docs)]

//! # Docex CLI
//!
//! Offline front end for the export pipeline.
//!
//! Supported Commands:
//! - `render`: JSON file + OpenAPI document -> `.xlsx` / `.pdf`.
//! - `columns`: Prints the columns an endpoint's documents would carry.

use clap::{Parser, Subcommand};
use docex_core::AppResult;

mod columns;
mod render;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Schema-driven document export")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a JSON payload as a spreadsheet or PDF document.
    Render(render::RenderArgs),
    /// Show the columns derived from an endpoint's response schema.
    Columns(columns::ColumnsArgs),
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Render(args) => render::execute(args)?,
        Commands::Columns(args) => columns::execute(args)?,
    }

    Ok(())
}
