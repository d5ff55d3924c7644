//! Verify command implementation.

use docstore_core::{CoreError, Store};
use std::path::Path;

/// Verification result.
#[derive(Debug)]
pub struct VerifyResult {
    /// Number of collections restored.
    pub collections: usize,
    /// Number of documents restored.
    pub documents: usize,
    /// Error that stopped the restore, if any.
    pub error: Option<CoreError>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying snapshot at {:?}", path);
    println!();

    let result = verify(path);

    if result.is_ok() {
        println!("  Collections: {}", result.collections);
        println!("  Documents:   {}", result.documents);
        println!();
        println!("✓ Snapshot verification passed");
        Ok(())
    } else {
        if let Some(err) = &result.error {
            println!("  {}: {}", failure_kind(err), err);
        }
        println!();
        println!("✗ Snapshot verification failed");
        Err("Verification failed".into())
    }
}

/// Names the class of a restore failure.
pub fn failure_kind(err: &CoreError) -> &'static str {
    if err.is_validation() {
        "Invalid content"
    } else {
        "Unreadable snapshot"
    }
}

/// Restores the snapshot at `path`, validating every collection and document.
pub fn verify(path: &Path) -> VerifyResult {
    match Store::restore_from_file(path) {
        Ok(store) => VerifyResult {
            collections: store.len(),
            documents: store.document_count(),
            error: None,
        },
        Err(err) => VerifyResult {
            collections: 0,
            documents: 0,
            error: Some(err),
        },
    }
}
