// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

const STORE: &str = r#"{
    "item_desc": [{"id": 1, "name": "Plank", "tier": 1, "tag": "Plank"}],
    "npc_desc": [{"npc_type": 3, "name": "Rumbagh"}],
    "claim_tile_cost": []
}"#;

#[test]
fn loads_plain_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(REFERENCE_FILE);
    fs::write(&path, STORE).unwrap();

    let tables = load_reference(&path).unwrap();
    assert_eq!(tables.len(), 3);
    assert_eq!(tables.rows("item_desc")[0]["name"], "Plank");
    assert!(tables.rows("cargo_desc").is_empty());
}

#[test]
fn loads_zstd_compressed_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(REFERENCE_FILE_ZST);
    fs::write(&path, zstd::encode_all(STORE.as_bytes(), 3).unwrap()).unwrap();

    let tables = load_reference(&path).unwrap();
    assert_eq!(tables.rows("npc_desc")[0]["npc_type"], 3);
}

#[test]
fn locate_prefers_compressed_store() {
    let dir = tempdir().unwrap();
    assert_eq!(locate_reference(dir.path()), None);

    fs::write(dir.path().join(REFERENCE_FILE), STORE).unwrap();
    assert_eq!(locate_reference(dir.path()), Some(dir.path().join(REFERENCE_FILE)));

    fs::write(dir.path().join(REFERENCE_FILE_ZST), b"").unwrap();
    assert_eq!(locate_reference(dir.path()), Some(dir.path().join(REFERENCE_FILE_ZST)));
}

#[yare::parameterized(
    array_root = { "[]" },
    table_not_array = { r#"{"item_desc": {"id": 1}}"# },
    not_json = { "item_desc" },
)]
fn malformed_stores_are_errors(content: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join(REFERENCE_FILE);
    fs::write(&path, content).unwrap();
    assert!(load_reference(&path).is_err());
}
