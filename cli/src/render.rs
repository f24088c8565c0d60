#![deny(missing_docs)]

//! # Render Command
//!
//! Runs the export pipeline over a JSON file and writes the document to disk.

use std::fs;
use std::path::PathBuf;

use docex_core::{AppError, AppResult, ExportOptions, Exporter, LayoutMode, OutputFormat};
use serde_json::Value;

/// Arguments for the render command.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Path to the OpenAPI document.
    #[clap(long, env = "DOCEX_OPENAPI_PATH")]
    pub openapi: PathBuf,

    /// Endpoint path exactly as declared under `paths` (e.g. `/orders`).
    #[clap(long)]
    pub endpoint: String,

    /// HTTP method of the operation.
    #[clap(long, default_value = "get")]
    pub method: String,

    /// JSON file holding the response payload.
    #[clap(long)]
    pub data: PathBuf,

    /// Output format (`xlsx` or `pdf`).
    #[clap(long, default_value = "xlsx")]
    pub ext: OutputFormat,

    /// Layout (`table` or `list`).
    #[clap(long = "type", default_value = "table")]
    pub mode: LayoutMode,

    /// Where to write the document.
    #[clap(long)]
    pub output: PathBuf,
}

/// Executes the render command.
pub fn execute(args: &RenderArgs) -> AppResult<()> {
    let exporter = Exporter::new(ExportOptions::new(&args.openapi))?;

    let raw = fs::read_to_string(&args.data)?;
    let payload: Value = serde_json::from_str(&raw).map_err(|e| {
        AppError::General(format!("Invalid JSON in {}: {}", args.data.display(), e))
    })?;

    tracing::debug!(endpoint = %args.endpoint, format = %args.ext, mode = %args.mode, "rendering");
    let bytes = exporter.render(&args.endpoint, &args.method, args.ext, args.mode, &payload)?;

    if let Some(parent) = args.output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.output, &bytes)?;

    println!("Wrote {} ({} bytes)", args.output.display(), bytes.len());
    Ok(())
}
