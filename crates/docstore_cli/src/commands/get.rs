//! Get command implementation.

use docstore_core::{document_to_json, Store};
use std::path::Path;
use tracing::info;

/// Runs the get command.
pub fn run(path: &Path, collection: &str, key: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!("Loading snapshot {:?}", path);
    let store = Store::restore_from_file(path)?;

    let doc = store.get_collection(collection)?.get(key)?;
    let json = document_to_json(&doc)?;
    println!("{}", serde_json::to_string_pretty(&json)?);

    Ok(())
}
