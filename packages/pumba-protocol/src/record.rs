//! Fixed-layout records.
//!
//! Every record on the wire is a tightly packed sequence of 4-byte little-endian
//! fields in declaration order. There is no framing, padding or length prefix;
//! the layout is implied by the channel the payload arrived on.

use crate::{
    decode::{Decode, FIELD_WIDTH},
    encode::Encode,
};

/// A value that occupies one or more 4-byte fields inside a record.
pub trait Field: Decode + Encode {
    /// Number of 4-byte fields, with nested records flattened.
    const COUNT: usize;
}

impl Field for f32 {
    const COUNT: usize = 1;
}

impl Field for i32 {
    const COUNT: usize = 1;
}

/// A telemetry or settings record with a compiled-in layout.
///
/// # Encoding
///
/// | Field      | Size                | Description |
/// |------------|---------------------|-------------|
/// | `fields`   | 4 × [`FIELD_COUNT`] | Fields in [`FIELDS`] order, little-endian. |
///
/// Decoding checks the whole layout against the input length before reading
/// any field, so a short payload never yields a partially filled record.
///
/// [`FIELD_COUNT`]: Record::FIELD_COUNT
/// [`FIELDS`]: Record::FIELDS
pub trait Record: Field + Sized {
    /// Number of 4-byte fields, with nested records flattened.
    const FIELD_COUNT: usize;

    /// Names of the top-level fields in wire order.
    const FIELDS: &'static [&'static str];

    /// Encoded size in bytes.
    const SIZE: usize = FIELD_WIDTH * Self::FIELD_COUNT;
}

/// Declares a record struct along with its [`Record`], [`Decode`] and
/// [`Encode`] implementations. Field order in the declaration is wire order.
macro_rules! define_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                pub $field:ident: $ty:ty,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )+
        }

        impl $crate::record::Record for $name {
            const FIELD_COUNT: usize = 0 $(+ <$ty as $crate::record::Field>::COUNT)+;
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];
        }

        impl $crate::record::Field for $name {
            const COUNT: usize = <Self as $crate::record::Record>::FIELD_COUNT;
        }

        impl $crate::decode::Decode for $name {
            fn decode(data: &mut &[u8]) -> Result<Self, $crate::decode::DecodeError> {
                let size = <Self as $crate::record::Record>::SIZE;
                if data.len() < size {
                    return Err($crate::decode::DecodeError::new::<Self>(
                        $crate::decode::DecodeErrorKind::ShortBuffer {
                            expected: size,
                            found: data.len(),
                        },
                    ));
                }

                Ok(Self {
                    $(
                        $field: <$ty as $crate::decode::Decode>::decode(data)?,
                    )+
                })
            }
        }

        impl $crate::encode::Encode for $name {
            fn size(&self) -> usize {
                <Self as $crate::record::Record>::SIZE
            }

            fn encode(&self, data: &mut [u8]) {
                let mut writer = $crate::encode::FieldWriter::new(data);
                $(
                    writer.write(&self.$field);
                )+
            }
        }
    };
}

pub(crate) use define_record;
