use super::layout::{FieldKind, FieldReader, FieldValue, Layout};
use super::record::{Record, StoreConfig};
use super::store::RecordStore;
use crate::types::{RecordId, Result, StoreError};

/// File holding node records.
pub const NODE_STORE_FILE_NAME: &str = "grapy.nodes.db";

/// Number of label slots carried inline by a node.
pub const LABEL_SLOTS: usize = 4;

/// Value of an unused label slot.
pub const NO_LABEL: u32 = u32::MAX;

const NODE_LAYOUT: Layout = Layout::new(&[
    FieldKind::Bool,
    FieldKind::U64,
    FieldKind::U64,
    FieldKind::U32,
    FieldKind::U32,
    FieldKind::U32,
    FieldKind::U32,
]);

/// A node: tombstone flag, list heads, and up to four label ids.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeRecord {
    /// False once the node is logically deleted.
    pub in_use: bool,
    /// Head of the node's edge chain in the edge store.
    pub first_edge: RecordId,
    /// Head of the node's property chain in the property store.
    pub first_property: RecordId,
    /// Label store ids, [`NO_LABEL`] for empty slots.
    pub labels: [u32; LABEL_SLOTS],
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self {
            in_use: true,
            first_edge: RecordId::NONE,
            first_property: RecordId::NONE,
            labels: [NO_LABEL; LABEL_SLOTS],
        }
    }
}

impl NodeRecord {
    /// An in-use node with no edges, properties, or labels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the label slots with `labels`.
    ///
    /// Label ids are stored in four bytes, so each must be below `u32::MAX`.
    pub fn with_labels(mut self, labels: &[RecordId]) -> Result<Self> {
        if labels.len() > LABEL_SLOTS {
            return Err(StoreError::Invalid("node holds at most four labels"));
        }
        let mut slots = [NO_LABEL; LABEL_SLOTS];
        for (slot, label) in slots.iter_mut().zip(labels) {
            *slot = u32::try_from(label.0)
                .ok()
                .filter(|id| *id != NO_LABEL)
                .ok_or(StoreError::Invalid("label id does not fit a label slot"))?;
        }
        self.labels = slots;
        Ok(self)
    }

    /// Ids of the occupied label slots, in slot order.
    pub fn label_ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.labels
            .iter()
            .filter(|&&slot| slot != NO_LABEL)
            .map(|&slot| RecordId(u64::from(slot)))
    }
}

impl Record for NodeRecord {
    fn to_fields(&self) -> Vec<FieldValue> {
        let mut fields = Vec::with_capacity(3 + LABEL_SLOTS);
        fields.push(FieldValue::Bool(self.in_use));
        fields.push(self.first_edge.into());
        fields.push(self.first_property.into());
        fields.extend(self.labels.iter().map(|&label| FieldValue::U32(label)));
        fields
    }

    fn from_fields(fields: Vec<FieldValue>) -> Result<Self> {
        let mut reader = FieldReader::new(fields);
        let in_use = reader.bool()?;
        let first_edge = reader.record_id()?;
        let first_property = reader.record_id()?;
        let mut labels = [NO_LABEL; LABEL_SLOTS];
        for slot in &mut labels {
            *slot = reader.u32()?;
        }
        reader.finish()?;
        Ok(Self {
            in_use,
            first_edge,
            first_property,
            labels,
        })
    }
}

/// Store configuration for nodes.
pub struct NodeStoreConfig;

impl StoreConfig for NodeStoreConfig {
    type Record = NodeRecord;
    const LAYOUT: Layout = NODE_LAYOUT;
    const FILE_NAME: &'static str = NODE_STORE_FILE_NAME;
    const RECONSTRUCT: fn(Vec<FieldValue>) -> Result<NodeRecord> = NodeRecord::from_fields;
}

/// Store of node records.
pub type NodeStore = RecordStore<NodeStoreConfig>;
