use alloc::{vec, vec::Vec};

/// A type that can be encoded into a sequence of bytes.
pub trait Encode {
    /// Returns the number of bytes this value will take when encoded.
    fn size(&self) -> usize;

    /// Encodes this instance into the provided byte slice.
    ///
    /// `data` must be at least [`Encode::size`] bytes long.
    fn encode(&self, data: &mut [u8]);

    /// Encodes this instance into a freshly allocated buffer.
    fn to_vec(&self) -> Vec<u8> {
        let mut data = vec![0; self.size()];
        self.encode(&mut data);
        data
    }
}

macro_rules! impl_encode_for_primitive {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                fn size(&self) -> usize {
                    size_of::<Self>()
                }

                fn encode(&self, data: &mut [u8]) {
                    data[..size_of::<Self>()].copy_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_encode_for_primitive!(u8, i32, u32, f32);

impl Encode for bool {
    fn size(&self) -> usize {
        1
    }

    fn encode(&self, data: &mut [u8]) {
        data[0] = u8::from(*self);
    }
}

/// Writes a sequence of [`Encode`] values back to back into a buffer.
pub struct FieldWriter<'a> {
    data: &'a mut [u8],
    position: usize,
}

impl<'a> FieldWriter<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn write<T: Encode + ?Sized>(&mut self, value: &T) {
        value.encode(&mut self.data[self.position..]);
        self.position += value.size();
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Encodes a single raw byte.
pub fn encode_u8(value: u8) -> [u8; 1] {
    [value]
}

/// Encodes a record into its packed little-endian wire form.
pub fn encode_record<R: crate::record::Record>(record: &R) -> Vec<u8> {
    record.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_writer_packs_without_padding() {
        let mut buf = [0u8; 9];
        let mut writer = FieldWriter::new(&mut buf);

        writer.write(&1.5f32);
        writer.write(&true);
        writer.write(&-1i32);

        assert_eq!(writer.position(), 9);
        assert_eq!(buf, [0x00, 0x00, 0xC0, 0x3F, 0x01, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn single_byte() {
        assert_eq!(encode_u8(70), [0x46]);
        assert_eq!(false.to_vec(), [0x00]);
    }
}
