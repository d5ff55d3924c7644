//! Golden tests for the snapshot text format.

use docstore_core::{SnapshotConfig, Store};
use docstore_testkit::prelude::*;

#[test]
fn sample_store_snapshot_text() {
    let store = sample_store();
    let golden = GoldenTest::with_default_dir("sample_store");

    golden.assert_bytes("compact", &store.dump().unwrap());
    golden.assert_bytes(
        "pretty",
        &store.dump_with(&SnapshotConfig::default()).unwrap(),
    );
}

#[test]
fn file_dump_matches_pretty_golden() {
    let store = sample_store();
    let snapshot = TempSnapshot::new();
    store.dump_to_file(snapshot.path()).unwrap();

    let text = std::fs::read_to_string(snapshot.path()).unwrap();
    GoldenTest::with_default_dir("sample_store").assert_text("pretty", &text);
}

#[test]
fn golden_snapshot_restores() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("golden")
        .join("sample_store_pretty.golden");

    let restored = Store::restore_from_file(path).unwrap();
    let users = restored.get_collection("users").unwrap();
    let members: Vec<Member> = users
        .list()
        .iter()
        .map(|doc| docstore_core::from_document(doc).unwrap())
        .collect();

    let alice = Member {
        id: "user:1".into(),
        name: "Alice".into(),
        age: 25,
        admin: true,
    };
    let bob = Member {
        id: "user:2".into(),
        name: "Bob".into(),
        age: 31,
        admin: false,
    };
    assert_eq!(members, vec![alice, bob]);
    assert_eq!(restored.document_count(), 3);
}
