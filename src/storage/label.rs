use super::layout::{FieldValue, Layout};
use super::record::{name_record, Record, StoreConfig, NAME_LAYOUT};
use super::store::RecordStore;
use crate::primitives::bytes::fixed::Charset;
use crate::types::Result;

/// File holding label names.
pub const LABEL_STORE_FILE_NAME: &str = "grapy.labels.db";

name_record! {
    /// A node label, stored as a 40-byte ASCII field padded with spaces.
    LabelRecord, Charset::Ascii
}

/// Store configuration for labels.
pub struct LabelStoreConfig;

impl StoreConfig for LabelStoreConfig {
    type Record = LabelRecord;
    const LAYOUT: Layout = NAME_LAYOUT;
    const FILE_NAME: &'static str = LABEL_STORE_FILE_NAME;
    const RECONSTRUCT: fn(Vec<FieldValue>) -> Result<LabelRecord> = LabelRecord::from_fields;
}

/// Store of label names.
pub type LabelStore = RecordStore<LabelStoreConfig>;
