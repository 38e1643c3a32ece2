use super::layout::{FieldValue, Layout};
use crate::types::Result;

/// Width of every name field (labels, edge types, property names).
pub const NAME_WIDTH: usize = 40;

/// An entity that can be persisted as an ordered sequence of primitive fields.
///
/// `from_fields(record.to_fields())` must reproduce an equivalent record.
pub trait Record: Sized + Send {
    /// Decomposes the record into its persisted fields, in layout order.
    fn to_fields(&self) -> Vec<FieldValue>;

    /// Rebuilds a record from a field sequence in layout order.
    fn from_fields(fields: Vec<FieldValue>) -> Result<Self>;
}

/// The static facts that define one fixed-width store.
///
/// Every item is required, so a store type that omits one, or supplies one of
/// the wrong kind, does not compile.
pub trait StoreConfig: Send + Sync + 'static {
    /// Record type persisted by the store.
    type Record: Record;

    /// Binary layout of one record.
    const LAYOUT: Layout;

    /// File name inside the store directory.
    const FILE_NAME: &'static str;

    /// Maps an unpacked field sequence back to a record.
    const RECONSTRUCT: fn(Vec<FieldValue>) -> Result<Self::Record>;
}

/// Defines a record holding a single [`NAME_WIDTH`]-byte padded name field.
macro_rules! name_record {
    ($(#[$meta:meta])* $name:ident, $charset:expr) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Eq, PartialEq, Hash)]
        pub struct $name {
            value: $crate::primitives::bytes::fixed::FixedBytes<{ $crate::storage::NAME_WIDTH }>,
        }

        impl $name {
            /// Builds a record from text.
            pub fn new(name: &str) -> $crate::types::Result<Self> {
                Ok(Self {
                    value: $crate::primitives::bytes::fixed::FixedBytes::from_text(name, $charset)?,
                })
            }

            /// Builds a record from already encoded bytes.
            pub fn from_bytes(bytes: &[u8]) -> $crate::types::Result<Self> {
                Ok(Self {
                    value: $crate::primitives::bytes::fixed::FixedBytes::new(bytes)?,
                })
            }

            /// The decoded name with trailing padding removed.
            pub fn name(&self) -> $crate::types::Result<String> {
                self.value.text($charset)
            }

            /// The padded name buffer.
            pub fn value(&self) -> &[u8] {
                self.value.as_bytes()
            }
        }

        impl $crate::storage::Record for $name {
            fn to_fields(&self) -> Vec<$crate::storage::FieldValue> {
                vec![$crate::storage::FieldValue::Bytes(self.value.as_bytes().to_vec())]
            }

            fn from_fields(
                fields: Vec<$crate::storage::FieldValue>,
            ) -> $crate::types::Result<Self> {
                let mut reader = $crate::storage::FieldReader::new(fields);
                let record = Self::from_bytes(&reader.bytes()?)?;
                reader.finish()?;
                Ok(record)
            }
        }
    };
}

pub(crate) use name_record;

/// Layout shared by every name store.
pub const NAME_LAYOUT: Layout = Layout::new(&[super::layout::FieldKind::Bytes(NAME_WIDTH)]);
