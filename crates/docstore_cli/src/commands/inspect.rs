//! Inspect command implementation.

use docstore_core::{CollectionSummary, SnapshotSummary};
use docstore_storage::{FileBackend, SnapshotBackend};
use serde::Serialize;
use std::path::Path;

/// Snapshot inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Snapshot path.
    pub path: String,
    /// File size in bytes.
    pub size: u64,
    /// Total number of document entries.
    pub document_count: usize,
    /// Per-collection summaries.
    pub collections: Vec<CollectionSummary>,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(path)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

/// Reads the snapshot at `path` and summarizes it.
pub fn inspect(path: &Path) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let backend = FileBackend::new(path);
    if !backend.exists() {
        return Err(format!("No snapshot found at {:?}", path).into());
    }

    let data = backend.read_all()?;
    let summary = SnapshotSummary::from_dump(&data)?;

    Ok(InspectResult {
        path: path.display().to_string(),
        size: backend.size()?,
        document_count: summary.document_count(),
        collections: summary.collections,
    })
}

fn print_text_output(result: &InspectResult) {
    println!("DocStore Snapshot Inspection");
    println!("============================");
    println!();
    println!("Path: {}", result.path);
    println!("Size: {}", format_size(result.size));
    println!();
    println!("Collections: {}", result.collections.len());
    println!("Documents:   {}", result.document_count);

    if !result.collections.is_empty() {
        println!();
        for col in &result.collections {
            println!(
                "  {} (primary key: {}) {} documents",
                col.name,
                col.primary_key.as_deref().unwrap_or("<none>"),
                col.documents
            );
        }
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
