use super::layout::{FieldKind, FieldReader, FieldValue, Layout};
use super::record::{name_record, Record, StoreConfig, NAME_LAYOUT};
use super::store::RecordStore;
use crate::primitives::bytes::fixed::Charset;
use crate::types::{RecordId, Result, StoreError};

/// File holding edge records.
pub const EDGE_STORE_FILE_NAME: &str = "grapy.edges.db";
/// File holding edge type names.
pub const EDGE_TYPE_STORE_FILE_NAME: &str = "grapy.edgetypes.db";

/// Value of an edge type slot that names no type.
pub const NO_EDGE_TYPE: u32 = u32::MAX;

const EDGE_LAYOUT: Layout = Layout::new(&[
    FieldKind::Bool,
    FieldKind::U64,
    FieldKind::U64,
    FieldKind::U64,
    FieldKind::U64,
    FieldKind::U32,
]);

/// An edge between two nodes.
///
/// `next_edge` links a single chain. Both endpoints share it, so it does not
/// by itself give each node an independent adjacency list.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct EdgeRecord {
    /// False once the edge is logically deleted.
    pub in_use: bool,
    /// First endpoint in the node store.
    pub first_node: RecordId,
    /// Second endpoint in the node store.
    pub second_node: RecordId,
    /// Next edge in the chain, or [`RecordId::NONE`].
    pub next_edge: RecordId,
    /// Head of the edge's property chain.
    pub first_property: RecordId,
    /// Edge type store id, [`NO_EDGE_TYPE`] if untyped.
    pub edge_type: u32,
}

impl EdgeRecord {
    /// An in-use edge between two nodes with no successor or properties.
    pub fn new(first_node: RecordId, second_node: RecordId) -> Self {
        Self {
            in_use: true,
            first_node,
            second_node,
            next_edge: RecordId::NONE,
            first_property: RecordId::NONE,
            edge_type: NO_EDGE_TYPE,
        }
    }

    /// Sets the edge type pointer.
    pub fn with_edge_type(mut self, edge_type: RecordId) -> Result<Self> {
        self.edge_type = u32::try_from(edge_type.0)
            .ok()
            .filter(|id| *id != NO_EDGE_TYPE)
            .ok_or(StoreError::Invalid("edge type id does not fit its slot"))?;
        Ok(self)
    }

    /// The edge type pointer, if any.
    pub fn edge_type_id(&self) -> Option<RecordId> {
        (self.edge_type != NO_EDGE_TYPE).then(|| RecordId(u64::from(self.edge_type)))
    }
}

impl Record for EdgeRecord {
    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Bool(self.in_use),
            self.first_node.into(),
            self.second_node.into(),
            self.next_edge.into(),
            self.first_property.into(),
            FieldValue::U32(self.edge_type),
        ]
    }

    fn from_fields(fields: Vec<FieldValue>) -> Result<Self> {
        let mut reader = FieldReader::new(fields);
        let edge = Self {
            in_use: reader.bool()?,
            first_node: reader.record_id()?,
            second_node: reader.record_id()?,
            next_edge: reader.record_id()?,
            first_property: reader.record_id()?,
            edge_type: reader.u32()?,
        };
        reader.finish()?;
        Ok(edge)
    }
}

/// Store configuration for edges.
pub struct EdgeStoreConfig;

impl StoreConfig for EdgeStoreConfig {
    type Record = EdgeRecord;
    const LAYOUT: Layout = EDGE_LAYOUT;
    const FILE_NAME: &'static str = EDGE_STORE_FILE_NAME;
    const RECONSTRUCT: fn(Vec<FieldValue>) -> Result<EdgeRecord> = EdgeRecord::from_fields;
}

/// Store of edge records.
pub type EdgeStore = RecordStore<EdgeStoreConfig>;

name_record! {
    /// An edge type name, stored as a 40-byte UTF-8 field padded with spaces.
    EdgeTypeRecord, Charset::Utf8
}

/// Store configuration for edge type names.
pub struct EdgeTypeStoreConfig;

impl StoreConfig for EdgeTypeStoreConfig {
    type Record = EdgeTypeRecord;
    const LAYOUT: Layout = NAME_LAYOUT;
    const FILE_NAME: &'static str = EDGE_TYPE_STORE_FILE_NAME;
    const RECONSTRUCT: fn(Vec<FieldValue>) -> Result<EdgeTypeRecord> = EdgeTypeRecord::from_fields;
}

/// Store of edge type names.
pub type EdgeTypeStore = RecordStore<EdgeTypeStoreConfig>;
