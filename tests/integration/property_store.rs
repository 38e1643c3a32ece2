#![allow(missing_docs)]

use std::fs::OpenOptions;
use std::io::{self, ErrorKind, Seek, SeekFrom, Write};
use std::sync::Once;

use grapy::{
    primitives::io::FileIo,
    storage::{PropertyRecord, PropertyStore, PropertyType, PropertyValue, PROPERTY_HEADER_SIZE},
    types::{RecordId, Result, StoreError},
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempfile::tempdir;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("grapy::storage=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .try_init();
    });
}

fn open_store(dir: &std::path::Path) -> Result<PropertyStore> {
    let store = PropertyStore::in_dir(dir);
    store.open()?;
    Ok(store)
}

#[test]
fn every_kind_roundtrips() -> Result<()> {
    init_tracing();
    let dir = tempdir()?;
    let store = open_store(dir.path())?;

    let values = [
        PropertyValue::Int(-42),
        PropertyValue::Int(i64::MAX),
        PropertyValue::Float(3.3),
        PropertyValue::Bool(true),
        PropertyValue::Bool(false),
        PropertyValue::Bytes(b"test bytes\x00\xff".to_vec()),
        PropertyValue::Bytes(Vec::new()),
        PropertyValue::Text("zażółć gęślą jaźń".into()),
        PropertyValue::Text(String::new()),
    ];
    let mut ids = Vec::new();
    for (idx, value) in values.iter().enumerate() {
        let record = PropertyRecord::new(RecordId(idx as u64 * 40), RecordId::NONE, value.clone());
        ids.push(store.write(&record)?);
    }
    for (id, value) in ids.iter().zip(&values) {
        let back = store.read(*id)?;
        assert_eq!(&back.value, value);
        assert_eq!(back.property_type()?, value.property_type());
    }
    assert_eq!(ids[0], RecordId(0));
    assert_eq!(ids[1], RecordId(PROPERTY_HEADER_SIZE as u64 + 8));
    Ok(())
}

#[test]
fn float_keeps_full_precision() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(dir.path())?;
    let id = store.write(&PropertyRecord::new(RecordId(0), RecordId(0), 3.3))?;
    let back = store.read(id)?;
    assert_eq!(back.property_type()?, PropertyType::Float);
    assert_eq!(back.header.length, 8);
    assert_eq!(back.value, PropertyValue::Float(3.3));
    Ok(())
}

#[test]
fn string_length_counts_encoded_bytes() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(dir.path())?;
    let text = "ążźćę";
    let id = store.write(&PropertyRecord::new(RecordId(0), RecordId::NONE, text))?;
    let back = store.read(id)?;
    assert_eq!(back.property_type()?, PropertyType::String);
    assert_eq!(back.header.length, text.len() as u64);
    assert_eq!(back.header.length, 10);
    assert_eq!(back.value, PropertyValue::Text(text.into()));
    assert_eq!(store.len()?, (PROPERTY_HEADER_SIZE + 10) as u64);
    Ok(())
}

#[test]
fn write_restamps_stale_header() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(dir.path())?;
    let mut record = PropertyRecord::new(RecordId(80), RecordId::NONE, 7i64);
    record.value = PropertyValue::Bytes(vec![1, 2, 3]);
    let back = store.read(store.write(&record)?)?;
    assert_eq!(back.property_type()?, PropertyType::Bytes);
    assert_eq!(back.header.length, 3);
    assert_eq!(back.header.name, RecordId(80));
    Ok(())
}

#[test]
fn monkey_mode_random_values() -> Result<()> {
    init_tracing();
    let dir = tempdir()?;
    let store = open_store(dir.path())?;
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);

    let mut written = Vec::new();
    let mut next = RecordId::NONE;
    for _ in 0..500 {
        let value = match rng.gen_range(0..5) {
            0 => PropertyValue::Int(rng.gen()),
            1 => PropertyValue::Float(rng.gen_range(-1.0e9..1.0e9)),
            2 => PropertyValue::Bool(rng.gen()),
            3 => {
                let len = rng.gen_range(0..64);
                PropertyValue::Bytes((0..len).map(|_| rng.gen()).collect())
            }
            _ => {
                let len = rng.gen_range(0..32);
                PropertyValue::Text(
                    (0..len)
                        .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
                        .collect(),
                )
            }
        };
        let name = RecordId(rng.gen_range(0..100) * 40);
        let id = store.write(&PropertyRecord::new(name, next, value.clone()))?;
        written.push((id, name, value));
        next = id;
    }

    for (id, name, value) in &written {
        let back = store.read(*id)?;
        assert_eq!(back.header.name, *name);
        assert_eq!(&back.value, value);
    }

    let chain = store.read_chain(next)?;
    assert_eq!(chain.len(), written.len());
    let newest_first: Vec<_> = written.iter().rev().map(|(_, _, v)| v.clone()).collect();
    let chained: Vec<_> = chain.into_iter().map(|record| record.value).collect();
    assert_eq!(chained, newest_first);
    assert_eq!(store.metrics_snapshot().records_written, 500);
    Ok(())
}

#[test]
fn chain_from_sentinel_is_empty() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(dir.path())?;
    assert!(store.read_chain(RecordId::NONE)?.is_empty());
    Ok(())
}

#[test]
fn chain_cycle_is_reported() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(dir.path())?;
    // The first record is written at offset 0, so pointing it at 0 loops.
    let id = store.write(&PropertyRecord::new(RecordId(0), RecordId(0), true))?;
    assert_eq!(id, RecordId(0));
    assert!(matches!(store.read_chain(id), Err(StoreError::Decode(_))));
    Ok(())
}

#[test]
fn unknown_type_tag_fails_decode() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(dir.path())?;
    let id = store.write(&PropertyRecord::new(RecordId(0), RecordId::NONE, 1i64))?;
    store.close();

    let mut file = OpenOptions::new().write(true).open(store.store_file())?;
    file.seek(SeekFrom::Start(16))?;
    file.write_all(&9u16.to_le_bytes())?;
    file.sync_all()?;
    drop(file);

    store.open()?;
    assert!(matches!(store.read(id), Err(StoreError::Decode(_))));
    Ok(())
}

#[test]
fn fixed_kind_with_wrong_length_fails_decode() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(dir.path())?;
    let id = store.write(&PropertyRecord::new(RecordId(0), RecordId::NONE, 5i64))?;
    store.write(&PropertyRecord::new(RecordId(0), RecordId::NONE, vec![0u8; 120]))?;
    store.close();

    // length follows name, next, and the two-byte tag
    let mut file = OpenOptions::new().write(true).open(store.store_file())?;
    file.seek(SeekFrom::Start(18))?;
    file.write_all(&100u64.to_le_bytes())?;
    file.sync_all()?;
    drop(file);

    store.open()?;
    assert!(matches!(store.read(id), Err(StoreError::Decode(_))));
    Ok(())
}

#[test]
fn truncated_payload_is_reported() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(dir.path())?;
    let id = store.write(&PropertyRecord::new(RecordId(0), RecordId::NONE, vec![7u8; 32]))?;
    store.close();

    let file = OpenOptions::new().write(true).open(store.store_file())?;
    file.set_len((PROPERTY_HEADER_SIZE + 10) as u64)?;
    drop(file);

    store.open()?;
    match store.read(id) {
        Err(StoreError::Truncated {
            offset,
            need,
            available,
        }) => assert_eq!((offset, need, available), (26, 32, 10)),
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[test]
fn mid_record_id_fails() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(dir.path())?;
    store.write(&PropertyRecord::new(RecordId(0), RecordId::NONE, "abc"))?;
    assert!(store.read(RecordId(20)).is_err());
    Ok(())
}

struct FailingIo;

impl FileIo for FailingIo {
    fn read_at(&self, _off: u64, _dst: &mut [u8]) -> Result<()> {
        Err(io::Error::new(ErrorKind::Other, "read denied").into())
    }

    fn write_at(&self, _off: u64, _src: &[u8]) -> Result<()> {
        Err(io::Error::new(ErrorKind::PermissionDenied, "disk full").into())
    }

    fn sync_all(&self) -> Result<()> {
        Ok(())
    }

    fn len(&self) -> Result<u64> {
        Ok(0)
    }
}

#[test]
fn io_errors_propagate_unchanged() -> Result<()> {
    let store = PropertyStore::in_dir("unused");
    store.open_with(Box::new(FailingIo))?;
    match store.write(&PropertyRecord::new(RecordId(0), RecordId::NONE, 1i64)) {
        Err(StoreError::Io(err)) => {
            assert_eq!(err.kind(), ErrorKind::PermissionDenied);
            assert_eq!(err.to_string(), "disk full");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(store.metrics_snapshot().records_written, 0);
    Ok(())
}

fn property_value() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        any::<i64>().prop_map(PropertyValue::Int),
        (-1.0e15f64..1.0e15).prop_map(PropertyValue::Float),
        any::<bool>().prop_map(PropertyValue::Bool),
        proptest::collection::vec(any::<u8>(), 0..128).prop_map(PropertyValue::Bytes),
        ".{0,40}".prop_map(PropertyValue::Text),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn arbitrary_values_roundtrip(values in proptest::collection::vec(property_value(), 1..16)) {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path()).unwrap();
        let ids: Vec<RecordId> = values
            .iter()
            .map(|value| {
                store
                    .write(&PropertyRecord::new(RecordId(0), RecordId::NONE, value.clone()))
                    .unwrap()
            })
            .collect();
        for (id, value) in ids.iter().zip(&values) {
            let back = store.read(*id).unwrap();
            prop_assert_eq!(&back.value, value);
            prop_assert_eq!(back.header.length, value.serialize().len() as u64);
        }
    }
}
