#![allow(missing_docs)]

use grapy::{
    storage::{
        EdgeRecord, EdgeStore, EdgeTypeRecord, EdgeTypeStore, GraphStores, LabelRecord,
        NodeRecord, NodeStore, PropertyNameRecord, PropertyRecord, PropertyValue, StoreOptions,
        NO_LABEL,
    },
    types::{RecordId, Result},
};
use tempfile::tempdir;

#[test]
fn node_ids_step_by_record_size() -> Result<()> {
    let dir = tempdir()?;
    let store = NodeStore::in_dir(dir.path());
    store.open()?;

    let mut written = Vec::new();
    for idx in 0..6u64 {
        let node = NodeRecord {
            in_use: idx % 3 != 0,
            first_edge: RecordId(idx * 37),
            first_property: RecordId::NONE,
            labels: [idx as u32, NO_LABEL, NO_LABEL, NO_LABEL],
        };
        let id = store.write(&node)?;
        assert_eq!(id, RecordId(idx * 33));
        written.push((id, node));
    }
    for (id, node) in &written {
        assert_eq!(&store.read(*id)?, node);
    }
    assert_eq!(store.record_count()?, 6);
    Ok(())
}

#[test]
fn edge_records_roundtrip() -> Result<()> {
    let dir = tempdir()?;
    let edges = EdgeStore::in_dir(dir.path());
    let types = EdgeTypeStore::in_dir(dir.path());
    edges.open()?;
    types.open()?;

    let knows = types.write(&EdgeTypeRecord::new("KNOWS")?)?;
    let likes = types.write(&EdgeTypeRecord::new("LUBI_ŻÓŁW")?)?;
    assert_eq!(likes, RecordId(40));

    let first = EdgeRecord::new(RecordId(0), RecordId(33)).with_edge_type(knows)?;
    let first_id = edges.write(&first)?;
    let mut second = EdgeRecord::new(RecordId(33), RecordId(66)).with_edge_type(likes)?;
    second.next_edge = first_id;
    second.in_use = false;
    let second_id = edges.write(&second)?;
    assert_eq!(second_id, RecordId(37));

    let back = edges.read(second_id)?;
    assert_eq!(back, second);
    assert_eq!(back.next_edge, RecordId(0));
    let ty = types.read(back.edge_type_id().unwrap_or(RecordId::NONE))?;
    assert_eq!(ty.name()?, "LUBI_ŻÓŁW");
    Ok(())
}

#[test]
fn graph_stores_link_a_small_graph() -> Result<()> {
    let dir = tempdir()?;
    let stores = GraphStores::new(StoreOptions::new(dir.path().join("graph")));
    stores.open()?;

    let person = stores.labels.write(&LabelRecord::new("Person")?)?;
    let age = stores.property_names.write(&PropertyNameRecord::new("age")?)?;
    let nick = stores.property_names.write(&PropertyNameRecord::new("nick")?)?;

    let tail = stores
        .properties
        .write(&PropertyRecord::new(nick, RecordId::NONE, "ada"))?;
    let head = stores
        .properties
        .write(&PropertyRecord::new(age, tail, 36i64))?;

    let mut node = NodeRecord::new().with_labels(&[person])?;
    node.first_property = head;
    let node_id = stores.nodes.write(&node)?;
    stores.sync()?;
    stores.close();

    stores.open()?;
    let node = stores.nodes.read(node_id)?;
    let labels = node
        .label_ids()
        .map(|id| stores.labels.read(id)?.name())
        .collect::<Result<Vec<_>>>()?;
    assert_eq!(labels, vec!["Person".to_string()]);

    let props = stores.properties.read_chain(node.first_property)?;
    assert_eq!(props.len(), 2);
    assert_eq!(
        stores.property_names.read(props[0].header.name)?.name()?,
        "age"
    );
    assert_eq!(props[0].value, PropertyValue::Int(36));
    assert_eq!(props[1].value, PropertyValue::Text("ada".into()));
    Ok(())
}

#[test]
fn name_stores_reject_oversized_names() {
    let long = "n".repeat(41);
    assert!(LabelRecord::new(&long).is_err());
    assert!(EdgeTypeRecord::new(&long).is_err());
    assert!(PropertyNameRecord::new(&long).is_err());
    assert!(PropertyNameRecord::new(&"n".repeat(40)).is_ok());
}
