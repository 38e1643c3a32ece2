//! Binary layout descriptors and the packing of field sequences.
//!
//! A [`Layout`] is an ordered list of [`FieldKind`]s with a fixed total
//! width. Records cross the store boundary as a `Vec<FieldValue>` in layout
//! order; all multi-byte values are little-endian.

use crate::primitives::bytes::{buf::Cursor, le};
use crate::types::{RecordId, Result, StoreError};

/// Type and width of a single persisted field.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
    /// One byte, 0 or 1.
    Bool,
    /// Two-byte unsigned integer.
    U16,
    /// Four-byte unsigned integer.
    U32,
    /// Eight-byte unsigned integer.
    U64,
    /// Eight-byte signed integer.
    I64,
    /// Eight-byte IEEE-754 double.
    F64,
    /// Raw byte buffer of exactly the given width.
    Bytes(usize),
}

impl FieldKind {
    /// Encoded width in bytes.
    pub const fn width(self) -> usize {
        match self {
            FieldKind::Bool => 1,
            FieldKind::U16 => 2,
            FieldKind::U32 => 4,
            FieldKind::U64 | FieldKind::I64 | FieldKind::F64 => 8,
            FieldKind::Bytes(n) => n,
        }
    }
}

/// A primitive value in a record's field sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Boolean flag.
    Bool(bool),
    /// Two-byte unsigned integer.
    U16(u16),
    /// Four-byte unsigned integer.
    U32(u32),
    /// Eight-byte unsigned integer.
    U64(u64),
    /// Eight-byte signed integer.
    I64(i64),
    /// Eight-byte float.
    F64(f64),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// The field kind this value packs as.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::U16(_) => FieldKind::U16,
            FieldValue::U32(_) => FieldKind::U32,
            FieldValue::U64(_) => FieldKind::U64,
            FieldValue::I64(_) => FieldKind::I64,
            FieldValue::F64(_) => FieldKind::F64,
            FieldValue::Bytes(bytes) => FieldKind::Bytes(bytes.len()),
        }
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            FieldValue::Bool(v) => le::put_bool(out, *v),
            FieldValue::U16(v) => le::put_u16(out, *v),
            FieldValue::U32(v) => le::put_u32(out, *v),
            FieldValue::U64(v) => le::put_u64(out, *v),
            FieldValue::I64(v) => le::put_i64(out, *v),
            FieldValue::F64(v) => le::put_f64(out, *v),
            FieldValue::Bytes(bytes) => out.extend_from_slice(bytes),
        }
    }

    fn decode(kind: FieldKind, src: &[u8]) -> Result<Self> {
        Ok(match kind {
            FieldKind::Bool => FieldValue::Bool(le::get_bool(src)?),
            FieldKind::U16 => FieldValue::U16(le::get_u16(src)?),
            FieldKind::U32 => FieldValue::U32(le::get_u32(src)?),
            FieldKind::U64 => FieldValue::U64(le::get_u64(src)?),
            FieldKind::I64 => FieldValue::I64(le::get_i64(src)?),
            FieldKind::F64 => FieldValue::F64(le::get_f64(src)?),
            FieldKind::Bytes(_) => FieldValue::Bytes(src.to_vec()),
        })
    }
}

impl From<RecordId> for FieldValue {
    fn from(id: RecordId) -> Self {
        FieldValue::U64(id.0)
    }
}

/// Ordered field kinds with a fixed total width.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Layout {
    fields: &'static [FieldKind],
}

impl Layout {
    /// Creates a layout from its ordered fields.
    pub const fn new(fields: &'static [FieldKind]) -> Self {
        Self { fields }
    }

    /// Ordered field kinds.
    pub const fn fields(&self) -> &'static [FieldKind] {
        self.fields
    }

    /// Total encoded width of one record.
    pub const fn size(&self) -> usize {
        let mut total = 0;
        let mut idx = 0;
        while idx < self.fields.len() {
            total += self.fields[idx].width();
            idx += 1;
        }
        total
    }

    /// Appends `values` to `out` in layout order.
    ///
    /// Fails without touching `out` when the sequence does not match the
    /// layout field-for-field.
    pub fn pack(&self, values: &[FieldValue], out: &mut Vec<u8>) -> Result<()> {
        if values.len() != self.fields.len() {
            return Err(StoreError::Layout("field count differs from layout"));
        }
        for (value, kind) in values.iter().zip(self.fields) {
            if value.kind() != *kind {
                return Err(StoreError::Layout("field kind differs from layout"));
            }
        }
        out.reserve(self.size());
        for value in values {
            value.encode_into(out);
        }
        Ok(())
    }

    /// Decodes one record's worth of bytes into its field sequence.
    pub fn unpack(&self, src: &[u8]) -> Result<Vec<FieldValue>> {
        if src.len() != self.size() {
            return Err(StoreError::Layout("buffer width differs from layout"));
        }
        let mut cursor = Cursor::new(src);
        self.fields
            .iter()
            .map(|kind| FieldValue::decode(*kind, cursor.take(kind.width())?))
            .collect()
    }
}

/// Consumes a field sequence in order while reconstructing a record.
#[derive(Debug)]
pub struct FieldReader {
    inner: std::vec::IntoIter<FieldValue>,
}

impl FieldReader {
    /// Wraps an unpacked field sequence.
    pub fn new(fields: Vec<FieldValue>) -> Self {
        Self {
            inner: fields.into_iter(),
        }
    }

    fn next_field(&mut self) -> Result<FieldValue> {
        self.inner
            .next()
            .ok_or(StoreError::Layout("field sequence too short"))
    }

    /// Takes the next field as a bool.
    pub fn bool(&mut self) -> Result<bool> {
        match self.next_field()? {
            FieldValue::Bool(v) => Ok(v),
            _ => Err(StoreError::Layout("expected bool field")),
        }
    }

    /// Takes the next field as a u16.
    pub fn u16(&mut self) -> Result<u16> {
        match self.next_field()? {
            FieldValue::U16(v) => Ok(v),
            _ => Err(StoreError::Layout("expected u16 field")),
        }
    }

    /// Takes the next field as a u32.
    pub fn u32(&mut self) -> Result<u32> {
        match self.next_field()? {
            FieldValue::U32(v) => Ok(v),
            _ => Err(StoreError::Layout("expected u32 field")),
        }
    }

    /// Takes the next field as a u64.
    pub fn u64(&mut self) -> Result<u64> {
        match self.next_field()? {
            FieldValue::U64(v) => Ok(v),
            _ => Err(StoreError::Layout("expected u64 field")),
        }
    }

    /// Takes the next field as a record pointer.
    pub fn record_id(&mut self) -> Result<RecordId> {
        self.u64().map(RecordId)
    }

    /// Takes the next field as raw bytes.
    pub fn bytes(&mut self) -> Result<Vec<u8>> {
        match self.next_field()? {
            FieldValue::Bytes(v) => Ok(v),
            _ => Err(StoreError::Layout("expected bytes field")),
        }
    }

    /// Fails if fields remain unconsumed.
    pub fn finish(mut self) -> Result<()> {
        match self.inner.next() {
            None => Ok(()),
            Some(_) => Err(StoreError::Layout("field sequence too long")),
        }
    }
}
