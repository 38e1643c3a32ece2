//! On-disk storage layer for the grapy graph database.
//!
//! Every entity kind lives in its own append-only file of fixed-width
//! records addressed by byte offset. Properties add a variable, type-tagged
//! payload after a fixed header. See [`storage`] for the store types.

#![warn(missing_docs)]

pub mod primitives;
pub mod storage;
pub mod types;
