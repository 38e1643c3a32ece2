//! Low-level primitives for building the stores.
//!
//! Includes fixed-width byte fields, little-endian encoding, and positioned
//! file I/O.

/// Byte-level utilities and encoding/decoding.
///
/// Fixed-width padded fields, little-endian readers, and a bounds-checked cursor.
pub mod bytes;

/// I/O abstractions and utilities.
///
/// Interfaces for reading/writing data and file operations.
pub mod io;
