//! Demo command implementation.
//!
//! Walks through the user service: create users, dump the store to a
//! file, delete a user, then restore the file and list users again.

use crate::users::{User, UserService};
use docstore_core::{CollectionConfig, Store};
use std::path::Path;
use tracing::info;

/// Runs the demo command, leaving the snapshot at `path`.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Document Store with Dump/Restore ===");

    let mut store = Store::new();
    let users = store.create_collection("users", CollectionConfig::new("id"))?;
    let mut service = UserService::new(users);

    println!("Creating users...");
    for (id, name) in [("1", "Alice"), ("2", "Bob"), ("3", "Charlie")] {
        service.create_user(id, name)?;
    }

    println!();
    println!("Listing users...");
    print_users(&service.list_users()?);

    println!();
    println!("Dumping store to file: {}", path.display());
    store.dump_to_file(path)?;
    info!("Snapshot written to {:?}", path);

    println!();
    println!("Deleting user 2...");
    let mut service = UserService::new(store.get_collection_mut("users")?);
    service.delete_user("2")?;

    println!();
    println!("Users after deletion:");
    print_users(&service.list_users()?);

    println!();
    println!("Restoring store from file: {}", path.display());
    let mut restored = Store::restore_from_file(path)?;
    let service = UserService::new(restored.get_collection_mut("users")?);

    println!();
    println!("Users after restore:");
    let list = service.list_users()?;
    print_users(&list);

    let bob = service.get_user("2")?;
    println!();
    println!("User 2 is back: {}", bob.name);

    println!();
    println!("✓ Demo completed ({} users restored)", list.len());
    Ok(())
}

fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("  (none)");
    }
    for user in users {
        println!("  {} {}", user.id, user.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn demo_leaves_full_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store_backup.json");

        run(&path).unwrap();

        let store = Store::restore_from_file(&path).unwrap();
        assert_eq!(store.get_collection("users").unwrap().len(), 3);
    }
}
