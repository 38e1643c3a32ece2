//! Record stores backing the graph.
//!
//! Each store is an append-only file of records produced by a
//! [`StoreConfig`]; a record's id is the byte offset it was written at.

/// Field kinds, layouts, and packing.
pub mod layout;

mod edge;
mod label;
mod metrics;
mod node;
mod options;
mod props;
mod record;
mod store;
mod stores;

/// Record contract and per-store configuration.
pub use record::{Record, StoreConfig, NAME_LAYOUT, NAME_WIDTH};

pub use layout::{FieldKind, FieldReader, FieldValue, Layout};

/// Generic fixed-width store.
pub use store::RecordStore;

pub use edge::{
    EdgeRecord, EdgeStore, EdgeStoreConfig, EdgeTypeRecord, EdgeTypeStore, EdgeTypeStoreConfig,
    EDGE_STORE_FILE_NAME, EDGE_TYPE_STORE_FILE_NAME, NO_EDGE_TYPE,
};
pub use label::{LabelRecord, LabelStore, LabelStoreConfig, LABEL_STORE_FILE_NAME};
pub use node::{
    NodeRecord, NodeStore, NodeStoreConfig, LABEL_SLOTS, NODE_STORE_FILE_NAME, NO_LABEL,
};

/// Property values, headers, and the property store.
pub use props::{
    PayloadFormat, PropertyHeader, PropertyNameRecord, PropertyNameStore, PropertyNameStoreConfig,
    PropertyRecord, PropertyStore, PropertyType, PropertyValue, PROPERTY_HEADER_SIZE, PROPERTY_NAME_STORE_FILE_NAME, PROPERTY_STORE_FILE_NAME,
};

pub use metrics::{StoreMetrics, StoreMetricsSnapshot};
pub use options::StoreOptions;
pub use stores::GraphStores;
