#![deny(missing_docs)]

//! # Columns Command
//!
//! Prints the column descriptors an endpoint's documents would carry.

use std::path::PathBuf;

use docex_core::{
    columns_for, load_openapi_document, resolve_response, AppResult, Column, LayoutMode,
};

/// Arguments for the columns command.
#[derive(clap::Args, Debug, Clone)]
pub struct ColumnsArgs {
    /// Path to the OpenAPI document.
    #[clap(long, env = "DOCEX_OPENAPI_PATH")]
    pub openapi: PathBuf,

    /// Endpoint path exactly as declared under `paths`.
    #[clap(long)]
    pub endpoint: String,

    /// HTTP method of the operation.
    #[clap(long, default_value = "get")]
    pub method: String,

    /// Layout (`table` or `list`).
    #[clap(long = "type", default_value = "table")]
    pub mode: LayoutMode,
}

/// Resolves the endpoint and derives its columns.
pub fn collect(args: &ColumnsArgs) -> AppResult<(String, Vec<Column>)> {
    let document = load_openapi_document(&args.openapi)?;
    let resolved = resolve_response(&document, &args.endpoint, &args.method)?;
    Ok((
        resolved.name.to_string(),
        columns_for(resolved.schema, args.mode),
    ))
}

/// Executes the columns command.
pub fn execute(args: &ColumnsArgs) -> AppResult<()> {
    let (schema, columns) = collect(args)?;
    println!("# {} ({})", schema, args.mode);
    for column in columns {
        println!("{}\t{}", column.key, column.header);
    }
    Ok(())
}
