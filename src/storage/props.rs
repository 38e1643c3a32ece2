//! Typed property values stored as a fixed header plus a variable payload.
//!
//! Each property occupies a [`PROPERTY_HEADER_SIZE`]-byte header immediately
//! followed by `length` payload bytes. The header's type tag selects how the
//! payload is decoded; STRING and BYTES share a wire encoding and differ only
//! in the tag.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use super::layout::{FieldKind, FieldReader, FieldValue, Layout};
use super::metrics::StoreMetricsSnapshot;
use super::options::StoreOptions;
use super::record::{name_record, Record, StoreConfig, NAME_LAYOUT};
use super::store::RecordStore;
use crate::primitives::bytes::{fixed::Charset, le};
use crate::primitives::io::FileIo;
use crate::types::{RecordId, Result, StoreError};

/// File holding property headers and payloads.
pub const PROPERTY_STORE_FILE_NAME: &str = "grapy.properties.db";
/// File holding property names.
pub const PROPERTY_NAME_STORE_FILE_NAME: &str = "grapy.propertynames.db";

const HEADER_LAYOUT: Layout = Layout::new(&[
    FieldKind::U64,
    FieldKind::U64,
    FieldKind::U16,
    FieldKind::U64,
]);

/// Width of a property header: name, next, type tag, payload length.
pub const PROPERTY_HEADER_SIZE: usize = HEADER_LAYOUT.size();

/// Wire tag identifying the kind of a property value.
#[repr(u16)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PropertyType {
    /// Signed 64-bit integer.
    Integer = 1,
    /// 64-bit IEEE-754 double.
    Float = 2,
    /// Boolean.
    Bool = 3,
    /// Raw bytes.
    Bytes = 4,
    /// UTF-8 text.
    String = 5,
}

impl PropertyType {
    /// Numeric wire tag.
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for PropertyType {
    type Error = StoreError;

    fn try_from(tag: u16) -> Result<Self> {
        match tag {
            1 => Ok(PropertyType::Integer),
            2 => Ok(PropertyType::Float),
            3 => Ok(PropertyType::Bool),
            4 => Ok(PropertyType::Bytes),
            5 => Ok(PropertyType::String),
            _ => Err(StoreError::Decode("unknown property type tag")),
        }
    }
}

/// A property value of one of the five storable kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
}

impl PropertyValue {
    /// Type tag derived from the value's kind.
    pub fn property_type(&self) -> PropertyType {
        match self {
            PropertyValue::Int(_) => PropertyType::Integer,
            PropertyValue::Float(_) => PropertyType::Float,
            PropertyValue::Bool(_) => PropertyType::Bool,
            PropertyValue::Bytes(_) => PropertyType::Bytes,
            PropertyValue::Text(_) => PropertyType::String,
        }
    }

    /// Encodes the value into its payload bytes.
    ///
    /// Text becomes its UTF-8 bytes, so the payload length of a string is its
    /// encoded byte length rather than its character count.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PayloadFormat::for_value(self).width());
        match self {
            PropertyValue::Int(v) => le::put_i64(&mut out, *v),
            PropertyValue::Float(v) => le::put_f64(&mut out, *v),
            PropertyValue::Bool(v) => le::put_bool(&mut out, *v),
            PropertyValue::Bytes(v) => out.extend_from_slice(v),
            PropertyValue::Text(v) => out.extend_from_slice(v.as_bytes()),
        }
        out
    }

    /// Decodes payload bytes written for a value of kind `ty`.
    pub fn deserialize(ty: PropertyType, payload: &[u8]) -> Result<Self> {
        let expected = PayloadFormat::for_type(ty, payload.len()).width();
        if payload.len() != expected {
            return Err(StoreError::Decode("payload width does not match type"));
        }
        Ok(match ty {
            PropertyType::Integer => PropertyValue::Int(le::get_i64(payload)?),
            PropertyType::Float => PropertyValue::Float(le::get_f64(payload)?),
            PropertyType::Bool => PropertyValue::Bool(le::get_bool(payload)?),
            PropertyType::Bytes => PropertyValue::Bytes(payload.to_vec()),
            PropertyType::String => PropertyValue::Text(
                String::from_utf8(payload.to_vec())
                    .map_err(|_| StoreError::Decode("stored string not utf8"))?,
            ),
        })
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Int(v) => write!(f, "{v}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Bool(v) => write!(f, "{v}"),
            PropertyValue::Bytes(v) => write!(f, "bytes(len={})", v.len()),
            PropertyValue::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(value: Vec<u8>) -> Self {
        PropertyValue::Bytes(value)
    }
}

impl From<&[u8]> for PropertyValue {
    fn from(value: &[u8]) -> Self {
        PropertyValue::Bytes(value.to_vec())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_owned())
    }
}

/// Wire encoding of a payload.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PayloadFormat {
    /// Eight-byte little-endian signed integer.
    I64,
    /// Eight-byte little-endian IEEE double.
    F64,
    /// One 0/1 byte.
    Bool,
    /// Raw bytes of the given length.
    Raw(usize),
}

impl PayloadFormat {
    /// Encoding used when storing `value`.
    pub fn for_value(value: &PropertyValue) -> Self {
        match value {
            PropertyValue::Int(_) => PayloadFormat::I64,
            PropertyValue::Float(_) => PayloadFormat::F64,
            PropertyValue::Bool(_) => PayloadFormat::Bool,
            PropertyValue::Bytes(v) => PayloadFormat::Raw(v.len()),
            PropertyValue::Text(v) => PayloadFormat::Raw(v.len()),
        }
    }

    /// Encoding used when restoring a value of `ty` whose header declares `length`.
    ///
    /// Fixed-width kinds ignore `length`.
    pub fn for_type(ty: PropertyType, length: usize) -> Self {
        match ty {
            PropertyType::Integer => PayloadFormat::I64,
            PropertyType::Float => PayloadFormat::F64,
            PropertyType::Bool => PayloadFormat::Bool,
            PropertyType::Bytes | PropertyType::String => PayloadFormat::Raw(length),
        }
    }

    /// Encoding used when restoring the payload that follows `header`.
    ///
    /// A fixed-width kind whose header declares any other length is rejected,
    /// which catches corrupt headers and ids that land mid-record.
    pub fn for_header(header: &PropertyHeader) -> Result<Self> {
        let length = usize::try_from(header.length)
            .map_err(|_| StoreError::Decode("payload length exceeds address space"))?;
        let format = Self::for_type(header.property_type()?, length);
        if format.width() != length {
            return Err(StoreError::Decode("header length does not match payload type"));
        }
        Ok(format)
    }

    /// Payload width in bytes.
    pub fn width(self) -> usize {
        match self {
            PayloadFormat::I64 | PayloadFormat::F64 => 8,
            PayloadFormat::Bool => 1,
            PayloadFormat::Raw(len) => len,
        }
    }
}

/// Fixed-size header that precedes every property payload.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PropertyHeader {
    /// Record id of the property's name in the property-name store.
    pub name: RecordId,
    /// Next property of the same entity, or [`RecordId::NONE`].
    pub next_property: RecordId,
    /// Raw type tag; see [`PropertyHeader::property_type`].
    pub type_tag: u16,
    /// Byte length of the payload that follows the header.
    pub length: u64,
}

impl PropertyHeader {
    /// Header for `value`, with its type tag and length stamped.
    pub fn for_value(name: RecordId, next_property: RecordId, value: &PropertyValue) -> Self {
        Self {
            name,
            next_property,
            type_tag: value.property_type().as_u16(),
            length: PayloadFormat::for_value(value).width() as u64,
        }
    }

    /// Decodes the type tag.
    pub fn property_type(&self) -> Result<PropertyType> {
        PropertyType::try_from(self.type_tag)
    }
}

impl Record for PropertyHeader {
    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            self.name.into(),
            self.next_property.into(),
            FieldValue::U16(self.type_tag),
            FieldValue::U64(self.length),
        ]
    }

    fn from_fields(fields: Vec<FieldValue>) -> Result<Self> {
        let mut reader = FieldReader::new(fields);
        let header = PropertyHeader {
            name: reader.record_id()?,
            next_property: reader.record_id()?,
            type_tag: reader.u16()?,
            length: reader.u64()?,
        };
        reader.finish()?;
        Ok(header)
    }
}

/// Store configuration for the fixed part of a property record.
///
/// Crate-private: the property file is not a sequence of fixed-width
/// records, so only [`PropertyStore`] may drive a store over it.
pub(crate) struct PropertyHeaderConfig;

impl StoreConfig for PropertyHeaderConfig {
    type Record = PropertyHeader;
    const LAYOUT: Layout = HEADER_LAYOUT;
    const FILE_NAME: &'static str = PROPERTY_STORE_FILE_NAME;
    const RECONSTRUCT: fn(Vec<FieldValue>) -> Result<PropertyHeader> = PropertyHeader::from_fields;
}

/// A property header together with its value.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyRecord {
    /// Header as stored; `type_tag` and `length` are restamped on write.
    pub header: PropertyHeader,
    /// The property value.
    pub value: PropertyValue,
}

impl PropertyRecord {
    /// Builds a record whose header already matches `value`.
    pub fn new(name: RecordId, next_property: RecordId, value: impl Into<PropertyValue>) -> Self {
        let value = value.into();
        Self {
            header: PropertyHeader::for_value(name, next_property, &value),
            value,
        }
    }

    /// Decoded type tag of the header.
    pub fn property_type(&self) -> Result<PropertyType> {
        self.header.property_type()
    }
}

/// Store of property records: a fixed header followed by a typed payload.
///
/// Unlike the other stores records here vary in total width, so ids are
/// only valid as returned by [`PropertyStore::write`] or read from a
/// `next_property` pointer.
pub struct PropertyStore {
    headers: RecordStore<PropertyHeaderConfig>,
}

impl PropertyStore {
    /// Creates a closed store for the directory in `options`.
    pub fn new(options: StoreOptions) -> Self {
        Self {
            headers: RecordStore::new(options),
        }
    }

    /// Creates a closed store in `dir` with default options.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(StoreOptions::new(dir))
    }

    /// Opens the backing file, creating it if absent.
    pub fn open(&self) -> Result<()> {
        self.headers.open()
    }

    /// Opens the store over a caller-supplied file handle.
    pub fn open_with(&self, io: Box<dyn FileIo>) -> Result<()> {
        self.headers.open_with(io)
    }

    /// Releases the file handle. A no-op if the store is not open.
    pub fn close(&self) {
        self.headers.close();
    }

    /// Returns true while the store holds an open file handle.
    pub fn is_open(&self) -> bool {
        self.headers.is_open()
    }

    /// Full path of the backing file.
    pub fn store_file(&self) -> &Path {
        self.headers.store_file()
    }

    /// Width of the fixed header part of each record.
    pub fn header_size(&self) -> usize {
        PROPERTY_HEADER_SIZE
    }

    /// Current length of the backing file in bytes.
    pub fn len(&self) -> Result<u64> {
        self.headers.len()
    }

    /// Returns true if the backing file holds no bytes.
    pub fn is_empty(&self) -> Result<bool> {
        self.headers.is_empty()
    }

    /// Flushes file data and metadata to disk.
    pub fn sync(&self) -> Result<()> {
        self.headers.sync()
    }

    /// Returns I/O counters for this store.
    pub fn metrics_snapshot(&self) -> StoreMetricsSnapshot {
        self.headers.metrics_snapshot()
    }

    /// Appends `record` and returns the id of its header.
    ///
    /// The header's type tag and length are derived from the value, then the
    /// header and payload are appended back to back inside one critical
    /// section. A failed payload append is not rolled back.
    pub fn write(&self, record: &PropertyRecord) -> Result<RecordId> {
        let payload = record.value.serialize();
        let header = PropertyHeader {
            type_tag: record.value.property_type().as_u16(),
            length: payload.len() as u64,
            ..record.header
        };
        self.headers.with_locked(|locked| {
            let id = locked.append_record(&header)?;
            let payload_at = locked.append_raw(&payload)?;
            debug_assert_eq!(payload_at.0, id.0 + PROPERTY_HEADER_SIZE as u64);
            Ok(id)
        })
    }

    /// Reads the property whose header starts at `id`.
    pub fn read(&self, id: RecordId) -> Result<PropertyRecord> {
        self.headers.with_locked(|locked| {
            let header = locked.read_record(id)?;
            let ty = header.property_type()?;
            let format = PayloadFormat::for_header(&header)?;
            let payload = locked.read_raw(id.0 + PROPERTY_HEADER_SIZE as u64, format.width())?;
            let value = PropertyValue::deserialize(ty, &payload)?;
            Ok(PropertyRecord { header, value })
        })
    }

    /// Follows `next_property` pointers from `first` until the sentinel.
    ///
    /// Returns the records in list order; an empty list for
    /// [`RecordId::NONE`]. A pointer back into the chain is reported as a
    /// decode error instead of looping forever.
    pub fn read_chain(&self, first: RecordId) -> Result<Vec<PropertyRecord>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut cursor = first;
        while cursor.is_some() {
            if !seen.insert(cursor) {
                return Err(StoreError::Decode("property chain contains a cycle"));
            }
            let record = self.read(cursor)?;
            cursor = record.header.next_property;
            out.push(record);
        }
        Ok(out)
    }
}

name_record! {
    /// A property name, stored as a 40-byte UTF-8 field padded with spaces.
    PropertyNameRecord, Charset::Utf8
}

/// Store configuration for property names.
pub struct PropertyNameStoreConfig;

impl StoreConfig for PropertyNameStoreConfig {
    type Record = PropertyNameRecord;
    const LAYOUT: Layout = NAME_LAYOUT;
    const FILE_NAME: &'static str = PROPERTY_NAME_STORE_FILE_NAME;
    const RECONSTRUCT: fn(Vec<FieldValue>) -> Result<PropertyNameRecord> =
        PropertyNameRecord::from_fields;
}

/// Store of property names.
pub type PropertyNameStore = RecordStore<PropertyNameStoreConfig>;
