use thiserror::Error;

/// Width in bytes of every scalar field carried by a record.
pub const FIELD_WIDTH: usize = 4;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    type_name: &'static str,
}

impl DecodeError {
    pub fn new<T>(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            type_name: core::any::type_name::<T>(),
        }
    }

    pub const fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// Name of the type that failed to decode.
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Failed to decode {}: {}", self.type_name, self.kind)
    }
}

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeErrorKind {
    #[error("Payload too short. Found {found} bytes, expected at least {expected}.")]
    ShortBuffer { expected: usize, found: usize },

    #[error("Payload was empty.")]
    EmptyBuffer,
}

/// A type that can be reconstructed (decoded) from a raw sequence of bytes.
///
/// The input slice is advanced by the number of bytes consumed. Bytes left in
/// the slice after a successful decode are not an error; the device may append
/// fields in later firmware revisions.
pub trait Decode {
    /// Attempts to decode `Self` from the beginning of the provided byte slice.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the input is shorter than the layout of
    /// this type requires.
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError>
    where
        Self: Sized;
}

macro_rules! impl_decode_for_primitive {
    ($($t:ty),*) => {
        $(
            impl Decode for $t {
                fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
                    const SIZE: usize = size_of::<$t>();

                    let (bytes, rest) = data.split_first_chunk::<SIZE>().ok_or_else(|| {
                        DecodeError::new::<Self>(DecodeErrorKind::ShortBuffer {
                            expected: SIZE,
                            found: data.len(),
                        })
                    })?;
                    *data = rest;
                    Ok(Self::from_le_bytes(*bytes))
                }
            }
        )*
    };
}

impl_decode_for_primitive!(u8, i32, u32, f32);

/// Single-byte flag: `0x01` is `true`, every other value is `false`.
impl Decode for bool {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let (first, rest) = data
            .split_first()
            .ok_or_else(|| DecodeError::new::<Self>(DecodeErrorKind::EmptyBuffer))?;
        *data = rest;
        Ok(*first == 1)
    }
}

/// Decodes a little-endian IEEE-754 single from the start of `bytes`.
pub fn decode_f32(mut bytes: &[u8]) -> Result<f32, DecodeError> {
    f32::decode(&mut bytes)
}

/// Decodes a boolean flag from the first byte of `bytes`.
pub fn decode_bool(mut bytes: &[u8]) -> Result<bool, DecodeError> {
    bool::decode(&mut bytes)
}

/// Decodes a complete record from `bytes`, ignoring any trailing bytes.
pub fn decode_record<R: crate::record::Record>(mut bytes: &[u8]) -> Result<R, DecodeError> {
    R::decode(&mut bytes)
}
