#![allow(missing_docs)]

use grapy::{
    storage::{GraphStores, NodeRecord, NodeStore, StoreOptions},
    types::{Result, StoreError},
};
use tempfile::tempdir;

#[test]
fn options_load_from_toml_with_defaults() {
    let opts: StoreOptions = toml::from_str(
        r#"
        dir = "/var/lib/grapy"
        sync_on_write = true
        "#,
    )
    .expect("parse options");
    assert_eq!(opts.dir, std::path::PathBuf::from("/var/lib/grapy"));
    assert!(opts.sync_on_write);
    assert!(opts.create_dir, "missing keys take defaults");

    let empty: StoreOptions = toml::from_str("").expect("parse empty");
    assert_eq!(empty, StoreOptions::default());
}

#[test]
fn options_roundtrip_through_toml() {
    let opts = StoreOptions::new("data/graph").create_dir(false);
    let text = toml::to_string(&opts).expect("serialize options");
    let back: StoreOptions = toml::from_str(&text).expect("parse options");
    assert_eq!(back, opts);
}

#[test]
fn sync_on_write_store_persists_records() -> Result<()> {
    let dir = tempdir()?;
    let opts = StoreOptions::new(dir.path()).sync_on_write(true);
    let store = NodeStore::new(opts.clone());
    store.open()?;
    let id = store.write(&NodeRecord::new())?;
    store.close();

    let reopened = NodeStore::new(opts);
    reopened.open()?;
    assert_eq!(reopened.read(id)?, NodeRecord::new());
    Ok(())
}

#[test]
fn missing_dir_without_create_fails_every_store() -> Result<()> {
    let dir = tempdir()?;
    let stores = GraphStores::new(StoreOptions::new(dir.path().join("absent")).create_dir(false));
    assert!(matches!(stores.open(), Err(StoreError::Io(_))));
    assert!(!stores.is_open());
    assert!(matches!(stores.nodes.len(), Err(StoreError::Closed)));
    Ok(())
}
