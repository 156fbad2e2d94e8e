//! Store backend tests through the public API.

use crypt::core::store::{self, Backend, Filesystem, Memory, Store};
use crypt::error::StoreError;
use tempfile::TempDir;

fn stores(dir: &TempDir) -> Vec<(&'static str, Box<dyn Store>)> {
    vec![
        ("memory", Box::new(Memory::new()) as Box<dyn Store>),
        (
            "file",
            Box::new(Filesystem::new(dir.path().join("tree"))) as Box<dyn Store>,
        ),
        (
            "file via open",
            store::open(Backend::File, dir.path().join("opened").to_str()).unwrap(),
        ),
    ]
}

#[test]
fn test_contract_get_set() {
    let dir = TempDir::new().unwrap();
    for (name, store) in stores(&dir) {
        store.set("svc/token", b"abc").unwrap();
        assert_eq!(store.get("svc/token").unwrap(), b"abc", "{name}");

        store.set("svc/token", b"").unwrap();
        assert_eq!(store.get("svc/token").unwrap(), b"", "{name}");
    }
}

#[test]
fn test_contract_missing_key() {
    let dir = TempDir::new().unwrap();
    for (name, store) in stores(&dir) {
        assert!(
            matches!(store.get("absent"), Err(StoreError::NotFound(ref key)) if key == "absent"),
            "{name}"
        );
    }
}

#[test]
fn test_contract_list_prefix() {
    let dir = TempDir::new().unwrap();
    for (name, store) in stores(&dir) {
        store.set("svc/b", b"2").unwrap();
        store.set("svc/a", b"1").unwrap();
        store.set("svcx", b"3").unwrap();

        let keys: Vec<String> = store
            .list("svc/")
            .unwrap()
            .into_iter()
            .map(|pair| pair.key)
            .collect();
        assert_eq!(keys, ["svc/a", "svc/b"], "{name}");
        assert!(store.list("nothing/").unwrap().is_empty(), "{name}");
    }
}

#[test]
fn test_binary_values() {
    let dir = TempDir::new().unwrap();
    let value: Vec<u8> = (0..=255).collect();
    for (name, store) in stores(&dir) {
        store.set("bin", &value).unwrap();
        assert_eq!(store.get("bin").unwrap(), value, "{name}");
    }
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("tree");
    Filesystem::new(&root).set("persisted", b"yes").unwrap();

    let reopened = store::open(Backend::File, root.to_str()).unwrap();
    assert_eq!(reopened.get("persisted").unwrap(), b"yes");
}
