#![forbid(unsafe_code)]
//! Fixed-width byte fields, little-endian encoders, and a bounds-checked cursor.

pub mod fixed {
    //! Exact-width byte buffers padded with a fill byte.

    use core::fmt;

    use crate::types::{Result, StoreError};

    /// Byte used to right-pad values shorter than the field width.
    pub const FILL_BYTE: u8 = b' ';

    /// Character set used when a fixed field is assigned from text.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub enum Charset {
        /// 7-bit ASCII; non-ASCII text is rejected.
        Ascii,
        /// UTF-8.
        Utf8,
    }

    impl Charset {
        /// Encodes `text` into its byte form for this charset.
        pub fn encode(self, text: &str) -> Result<&[u8]> {
            match self {
                Charset::Ascii if !text.is_ascii() => {
                    Err(StoreError::Encoding("text is not ascii"))
                }
                _ => Ok(text.as_bytes()),
            }
        }

        /// Decodes bytes previously produced by [`Charset::encode`].
        pub fn decode(self, bytes: &[u8]) -> Result<String> {
            match self {
                Charset::Ascii if !bytes.is_ascii() => {
                    Err(StoreError::Decode("stored name is not ascii"))
                }
                _ => core::str::from_utf8(bytes)
                    .map(str::to_owned)
                    .map_err(|_| StoreError::Decode("stored name not utf8")),
            }
        }
    }

    /// A byte buffer that is always exactly `N` bytes long.
    ///
    /// Shorter input is right-padded with [`FILL_BYTE`]; longer input is
    /// rejected and leaves the current value untouched.
    #[derive(Copy, Clone, Eq, PartialEq, Hash)]
    pub struct FixedBytes<const N: usize> {
        buf: [u8; N],
    }

    impl<const N: usize> FixedBytes<N> {
        /// Configured width in bytes.
        pub const WIDTH: usize = N;

        /// Builds a field from raw bytes.
        pub fn new(bytes: &[u8]) -> Result<Self> {
            let mut field = Self::default();
            field.set(bytes)?;
            Ok(field)
        }

        /// Builds a field from text encoded with `charset`.
        pub fn from_text(text: &str, charset: Charset) -> Result<Self> {
            Self::new(charset.encode(text)?)
        }

        /// Replaces the stored value.
        pub fn set(&mut self, bytes: &[u8]) -> Result<()> {
            if bytes.len() > N {
                return Err(StoreError::Length {
                    len: bytes.len(),
                    width: N,
                });
            }
            self.buf[..bytes.len()].copy_from_slice(bytes);
            self.buf[bytes.len()..].fill(FILL_BYTE);
            Ok(())
        }

        /// The padded buffer, exactly `N` bytes.
        pub fn as_bytes(&self) -> &[u8; N] {
            &self.buf
        }

        /// The logical value with trailing fill bytes stripped.
        pub fn trimmed(&self) -> &[u8] {
            let end = self
                .buf
                .iter()
                .rposition(|&b| b != FILL_BYTE)
                .map_or(0, |idx| idx + 1);
            &self.buf[..end]
        }

        /// Decodes the logical value as text.
        pub fn text(&self, charset: Charset) -> Result<String> {
            charset.decode(self.trimmed())
        }
    }

    impl<const N: usize> Default for FixedBytes<N> {
        fn default() -> Self {
            Self {
                buf: [FILL_BYTE; N],
            }
        }
    }

    impl<const N: usize> AsRef<[u8]> for FixedBytes<N> {
        fn as_ref(&self) -> &[u8] {
            &self.buf
        }
    }

    impl<const N: usize> TryFrom<&[u8]> for FixedBytes<N> {
        type Error = StoreError;

        fn try_from(value: &[u8]) -> Result<Self> {
            Self::new(value)
        }
    }

    impl<const N: usize> fmt::Debug for FixedBytes<N> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "FixedBytes<{N}>({:?})",
                String::from_utf8_lossy(self.trimmed())
            )
        }
    }
}

pub mod le {
    //! Little-endian fixed-width encoders and decoders.
    //!
    //! `put_*` appends to a growable buffer; `get_*` reads from the head of a
    //! slice and fails instead of panicking when it is too short.

    use crate::types::{Result, StoreError};

    /// Appends a u16.
    pub fn put_u16(dst: &mut Vec<u8>, v: u16) {
        dst.extend_from_slice(&v.to_le_bytes());
    }

    /// Appends a u32.
    pub fn put_u32(dst: &mut Vec<u8>, v: u32) {
        dst.extend_from_slice(&v.to_le_bytes());
    }

    /// Appends a u64.
    pub fn put_u64(dst: &mut Vec<u8>, v: u64) {
        dst.extend_from_slice(&v.to_le_bytes());
    }

    /// Appends an i64.
    pub fn put_i64(dst: &mut Vec<u8>, v: i64) {
        dst.extend_from_slice(&v.to_le_bytes());
    }

    /// Appends an f64 as its IEEE-754 bits.
    pub fn put_f64(dst: &mut Vec<u8>, v: f64) {
        dst.extend_from_slice(&v.to_le_bytes());
    }

    /// Appends a bool as a single 0/1 byte.
    pub fn put_bool(dst: &mut Vec<u8>, v: bool) {
        dst.push(u8::from(v));
    }

    fn array<const W: usize>(src: &[u8]) -> Result<[u8; W]> {
        src.get(..W)
            .and_then(|head| head.try_into().ok())
            .ok_or(StoreError::Decode("little-endian source too short"))
    }

    /// Decodes a u16.
    pub fn get_u16(src: &[u8]) -> Result<u16> {
        array(src).map(u16::from_le_bytes)
    }

    /// Decodes a u32.
    pub fn get_u32(src: &[u8]) -> Result<u32> {
        array(src).map(u32::from_le_bytes)
    }

    /// Decodes a u64.
    pub fn get_u64(src: &[u8]) -> Result<u64> {
        array(src).map(u64::from_le_bytes)
    }

    /// Decodes an i64.
    pub fn get_i64(src: &[u8]) -> Result<i64> {
        array(src).map(i64::from_le_bytes)
    }

    /// Decodes an f64 from its IEEE-754 bits.
    pub fn get_f64(src: &[u8]) -> Result<f64> {
        array(src).map(f64::from_le_bytes)
    }

    /// Decodes a bool stored as a single 0/1 byte.
    pub fn get_bool(src: &[u8]) -> Result<bool> {
        match src.first() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            Some(_) => Err(StoreError::Decode("bool payload invalid")),
            None => Err(StoreError::Decode("bool payload truncated")),
        }
    }
}

pub mod buf {
    //! A slice-backed cursor that reports overreads as errors.

    use core::fmt;

    use crate::types::{Result, StoreError};

    /// A cursor for reading bytes from a slice with offset tracking.
    pub struct Cursor<'a> {
        /// The underlying byte slice.
        pub buf: &'a [u8],
        /// Current read offset.
        pub off: usize,
    }

    impl<'a> Cursor<'a> {
        /// Creates a new cursor starting at offset 0.
        pub fn new(buf: &'a [u8]) -> Self {
            Self { buf, off: 0 }
        }

        /// Takes the next `n` bytes from the cursor, advancing the offset.
        pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
            let end = self
                .off
                .checked_add(n)
                .ok_or(StoreError::Decode("cursor offset overflow"))?;
            if end > self.buf.len() {
                return Err(StoreError::Decode("cursor take beyond buffer"));
            }
            let slice = &self.buf[self.off..end];
            self.off = end;
            Ok(slice)
        }

        /// Returns the number of bytes remaining in the buffer.
        pub fn remaining(&self) -> usize {
            self.buf.len().saturating_sub(self.off)
        }
    }

    impl fmt::Debug for Cursor<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Cursor")
                .field("off", &self.off)
                .field("remaining", &self.remaining())
                .finish()
        }
    }
}
