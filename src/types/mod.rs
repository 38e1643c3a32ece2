#![forbid(unsafe_code)]
//! Identifiers and the error type shared by every store.

use std::fmt;

/// Byte offset of a record's first byte within its store file.
///
/// Ids are only meaningful for the store that produced them. Offset `0` is a
/// valid id (the first record ever written), so "no record" is encoded as
/// [`RecordId::NONE`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Sentinel used by pointer fields that do not point anywhere.
    pub const NONE: RecordId = RecordId(u64::MAX);

    /// Returns true unless this is the [`RecordId::NONE`] sentinel.
    pub const fn is_some(self) -> bool {
        self.0 != u64::MAX
    }

    /// Returns `None` for the sentinel, `Some(self)` otherwise.
    pub const fn get(self) -> Option<RecordId> {
        if self.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::NONE
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_some() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "none")
        }
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId(value)
    }
}

impl From<RecordId> for u64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

/// Errors surfaced by store operations.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Underlying file I/O failed.
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    /// A value does not fit its fixed-width field.
    #[error("value of {len} bytes exceeds fixed width of {width} bytes")]
    Length {
        /// Byte length of the rejected value.
        len: usize,
        /// Configured field width.
        width: usize,
    },
    /// Text cannot be represented in the field's charset.
    #[error("encoding: {0}")]
    Encoding(&'static str),
    /// Stored bytes cannot be decoded.
    #[error("decode: {0}")]
    Decode(&'static str),
    /// Fewer bytes are available at an offset than the record requires.
    #[error("record at offset {offset} truncated: need {need} bytes, {available} available")]
    Truncated {
        /// Offset the read started at.
        offset: u64,
        /// Bytes required.
        need: u64,
        /// Bytes present in the file from `offset` on.
        available: u64,
    },
    /// A record's field sequence does not match the store layout.
    #[error("layout mismatch: {0}")]
    Layout(&'static str),
    /// The store has no open file handle.
    #[error("store is not open")]
    Closed,
    /// `open` was called on a store that is already open.
    #[error("store is already open")]
    AlreadyOpen,
    /// Invalid argument supplied by the caller.
    #[error("invalid argument: {0}")]
    Invalid(&'static str),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
