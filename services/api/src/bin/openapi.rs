//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document of the notes API to the path given as the
//! first argument, or to `openapi.json`.

use notes_api_lib::{error::ApiError, web::notes::write_openapi};
use std::path::PathBuf;

fn main() -> Result<(), ApiError> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));
    write_openapi(&path)?;
    println!("OpenAPI document written to {}", path.display());
    Ok(())
}
