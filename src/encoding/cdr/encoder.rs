// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Serialization half of [`Cdr`].
//!
//! Every multi-byte value is preceded by zero padding that aligns it to its
//! own size relative to the alignment origin. Methods return `&mut Self` so
//! calls can be chained:
//!
//! ```
//! use cdrcodec::{Cdr, CdrType, Endianness, FastBuffer};
//!
//! # fn main() -> cdrcodec::Result<()> {
//! let mut buffer = FastBuffer::new();
//! let mut cdr = Cdr::new(&mut buffer, Endianness::Big, CdrType::CorbaCdr);
//! cdr.serialize(1u8)?.serialize(2u32)?;
//! assert_eq!(cdr.serialized_data(), &[1, 0, 0, 0, 0, 0, 0, 2]);
//! # Ok(())
//! # }
//! ```

use super::codec::Cdr;
use super::endian::Endianness;
use super::primitive::CdrPrimitive;
use super::traits::CdrSerialize;
use crate::core::{CodecError, Result};

/// Convert an element or byte count to the `u32` length prefix.
pub(crate) fn length_prefix(len: usize, context: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        CodecError::bad_parameter(context, format!("length {len} does not fit a u32 prefix"))
    })
}

impl Cdr<'_, '_> {
    /// Write a scalar in the stored endianness.
    pub fn serialize<T: CdrPrimitive>(&mut self, value: T) -> Result<&mut Self> {
        let endianness = self.endianness();
        self.serialize_with_endianness(value, endianness)
    }

    /// Write a scalar in `endianness`, leaving the stored endianness alone.
    pub fn serialize_with_endianness<T: CdrPrimitive>(
        &mut self,
        value: T,
        endianness: Endianness,
    ) -> Result<&mut Self> {
        value.write_to(self.write_region(T::ALIGNMENT, T::SIZE)?, endianness);
        Ok(self)
    }

    /// Write scalars back to back, aligning once before the first element.
    ///
    /// Produces the same bytes as calling [`Cdr::serialize`] for each element;
    /// an empty slice writes nothing, not even padding.
    pub fn serialize_array<T: CdrPrimitive>(&mut self, values: &[T]) -> Result<&mut Self> {
        let endianness = self.endianness();
        self.serialize_array_with_endianness(values, endianness)
    }

    /// Write scalars back to back in `endianness`.
    pub fn serialize_array_with_endianness<T: CdrPrimitive>(
        &mut self,
        values: &[T],
        endianness: Endianness,
    ) -> Result<&mut Self> {
        if values.is_empty() {
            return Ok(self);
        }
        let len = values
            .len()
            .checked_mul(T::SIZE)
            .ok_or_else(|| CodecError::unknown("array byte length overflows usize"))?;
        T::write_array(values, self.write_region(T::ALIGNMENT, len)?, endianness);
        Ok(self)
    }

    /// Write a C string: `u32` length including the terminator, the bytes,
    /// then a NUL.
    ///
    /// A string containing NUL cannot be represented and is rejected with
    /// `BadParameter`.
    pub fn serialize_string(&mut self, value: &str) -> Result<&mut Self> {
        let bytes = value.as_bytes();
        if bytes.contains(&0) {
            return Err(CodecError::bad_parameter(
                "serialize(string)",
                "string contains an interior NUL byte",
            ));
        }
        let length = length_prefix(bytes.len() + 1, "serialize(string)")?;

        self.rollback_on_error(|cdr| {
            cdr.serialize(length)?;
            let region = cdr.write_region(1, bytes.len() + 1)?;
            region[..bytes.len()].copy_from_slice(bytes);
            region[bytes.len()] = 0;
            Ok(())
        })?;
        Ok(self)
    }

    /// Write a C string in `endianness`.
    pub fn serialize_string_with_endianness(
        &mut self,
        value: &str,
        endianness: Endianness,
    ) -> Result<&mut Self> {
        self.with_endianness(endianness, |cdr| cdr.serialize_string(value).map(|_| ()))?;
        Ok(self)
    }

    /// Write a wide string: `u32` character count (no terminator), then one
    /// 4-byte wide character per Unicode scalar.
    pub fn serialize_wstring(&mut self, value: &str) -> Result<&mut Self> {
        let count = value.chars().count();
        let length = length_prefix(count, "serialize(wstring)")?;
        let byte_len = count
            .checked_mul(char::SIZE)
            .ok_or_else(|| CodecError::unknown("wide string byte length overflows usize"))?;
        let endianness = self.endianness();

        self.rollback_on_error(|cdr| {
            cdr.serialize(length)?;
            let region = cdr.write_region(char::ALIGNMENT, byte_len)?;
            for (c, chunk) in value.chars().zip(region.chunks_exact_mut(char::SIZE)) {
                c.write_to(chunk, endianness);
            }
            Ok(())
        })?;
        Ok(self)
    }

    /// Write a wide string in `endianness`.
    pub fn serialize_wstring_with_endianness(
        &mut self,
        value: &str,
        endianness: Endianness,
    ) -> Result<&mut Self> {
        self.with_endianness(endianness, |cdr| cdr.serialize_wstring(value).map(|_| ()))?;
        Ok(self)
    }

    /// Write a variable-length sequence: `u32` element count, then the
    /// elements.
    pub fn serialize_sequence<T: CdrSerialize>(&mut self, items: &[T]) -> Result<&mut Self> {
        let count = length_prefix(items.len(), "serialize(sequence)")?;
        self.rollback_on_error(|cdr| {
            cdr.serialize(count)?;
            T::serialize_slice(items, cdr)
        })?;
        Ok(self)
    }

    /// Write a variable-length sequence in `endianness`.
    pub fn serialize_sequence_with_endianness<T: CdrSerialize>(
        &mut self,
        items: &[T],
        endianness: Endianness,
    ) -> Result<&mut Self> {
        self.with_endianness(endianness, |cdr| cdr.serialize_sequence(items).map(|_| ()))?;
        Ok(self)
    }

    /// Write a fixed-length sequence: the elements only, no count.
    pub fn serialize_fixed_sequence<T: CdrSerialize>(&mut self, items: &[T]) -> Result<&mut Self> {
        self.rollback_on_error(|cdr| T::serialize_slice(items, cdr))?;
        Ok(self)
    }

    /// Write a dictionary as a sequence of key/value pairs in iteration order.
    pub fn serialize_map<'m, K, V, I>(&mut self, entries: I) -> Result<&mut Self>
    where
        K: CdrSerialize + ?Sized + 'm,
        V: CdrSerialize + ?Sized + 'm,
        I: IntoIterator<Item = (&'m K, &'m V)>,
        I::IntoIter: ExactSizeIterator,
    {
        let entries = entries.into_iter();
        let count = length_prefix(entries.len(), "serialize(map)")?;
        self.rollback_on_error(|cdr| {
            cdr.serialize(count)?;
            for (key, value) in entries {
                key.serialize(cdr)?;
                value.serialize(cdr)?;
            }
            Ok(())
        })?;
        Ok(self)
    }

    /// Write any value with a CDR mapping (record, sequence, string, ...).
    pub fn serialize_value<T: CdrSerialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        self.rollback_on_error(|cdr| value.serialize(cdr))?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::encoding::cdr::{CdrType, FastBuffer};

    fn encode(endianness: Endianness, f: impl FnOnce(&mut Cdr<'_, '_>) -> Result<()>) -> Vec<u8> {
        let mut buffer = FastBuffer::new();
        let mut cdr = Cdr::new(&mut buffer, endianness, CdrType::DdsCdr);
        f(&mut cdr).unwrap();
        cdr.serialized_data().to_vec()
    }

    #[test]
    fn test_write_u8_then_u32() {
        let data = encode(Endianness::Little, |cdr| {
            cdr.serialize(0xAAu8)?.serialize(0x0102_0304u32)?;
            Ok(())
        });
        assert_eq!(data, [0xAA, 0, 0, 0, 0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_write_all_alignments() {
        let data = encode(Endianness::Big, |cdr| {
            cdr.serialize(1u8)?
                .serialize(2u16)?
                .serialize(3u8)?
                .serialize(4u64)?
                .serialize(true)?
                .serialize(5.0f32)?;
            Ok(())
        });
        assert_eq!(data.len(), 24);
        assert_eq!(&data[0..4], &[1, 0, 0, 2]);
        assert_eq!(data[4], 3);
        assert_eq!(&data[5..8], &[0, 0, 0]);
        assert_eq!(&data[8..16], &4u64.to_be_bytes());
        assert_eq!(data[16], 1);
        assert_eq!(&data[17..20], &[0, 0, 0]);
        assert_eq!(&data[20..24], &5.0f32.to_be_bytes());
    }

    #[test]
    fn test_override_does_not_change_stored_endianness() {
        let mut buffer = FastBuffer::new();
        let mut cdr = Cdr::new(&mut buffer, Endianness::Little, CdrType::DdsCdr);
        cdr.serialize_with_endianness(0x0102u16, Endianness::Big).unwrap();
        cdr.serialize(0x0102u16).unwrap();
        assert_eq!(cdr.serialized_data(), &[0x01, 0x02, 0x02, 0x01]);
        assert_eq!(cdr.endianness(), Endianness::Little);
    }

    #[test]
    fn test_array_equals_repeated_scalars() {
        let values = [1u16, 2, 3];
        let bulk = encode(Endianness::Big, |cdr| {
            cdr.serialize(9u8)?.serialize_array(&values)?;
            Ok(())
        });
        let scalar = encode(Endianness::Big, |cdr| {
            cdr.serialize(9u8)?;
            for v in values {
                cdr.serialize(v)?;
            }
            Ok(())
        });
        assert_eq!(bulk, scalar);
    }

    #[test]
    fn test_empty_array_writes_nothing() {
        let data = encode(Endianness::Big, |cdr| {
            cdr.serialize(9u8)?.serialize_array::<u64>(&[])?;
            Ok(())
        });
        assert_eq!(data, [9]);
    }

    #[test]
    fn test_string_layout() {
        let data = encode(Endianness::Little, |cdr| {
            cdr.serialize_string("ab")?;
            Ok(())
        });
        assert_eq!(data, [3, 0, 0, 0, b'a', b'b', 0]);

        let empty = encode(Endianness::Little, |cdr| {
            cdr.serialize_string("")?;
            Ok(())
        });
        assert_eq!(empty, [1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_string_rejects_interior_nul() {
        let mut buffer = FastBuffer::new();
        let mut cdr = Cdr::new(&mut buffer, Endianness::Little, CdrType::DdsCdr);
        let err = cdr.serialize_string("a\0b").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadParameter);
        assert_eq!(cdr.position(), 0);
    }

    #[test]
    fn test_wstring_layout() {
        let data = encode(Endianness::Big, |cdr| {
            cdr.serialize_wstring("ab")?;
            Ok(())
        });
        assert_eq!(data, [0, 0, 0, 2, 0, 0, 0, b'a', 0, 0, 0, b'b']);
    }

    #[test]
    fn test_string_with_endianness() {
        let data = encode(Endianness::Little, |cdr| {
            cdr.serialize_string_with_endianness("x", Endianness::Big)?;
            cdr.serialize(1u16)?;
            Ok(())
        });
        assert_eq!(data, [0, 0, 0, 2, b'x', 0, 1, 0]);
    }

    #[test]
    fn test_sequence_and_fixed_sequence() {
        let seq = encode(Endianness::Little, |cdr| {
            cdr.serialize_sequence(&[7i16, 8])?;
            Ok(())
        });
        assert_eq!(seq, [2, 0, 0, 0, 7, 0, 8, 0]);

        let fixed = encode(Endianness::Little, |cdr| {
            cdr.serialize_fixed_sequence(&[7i16, 8])?;
            Ok(())
        });
        assert_eq!(fixed, [7, 0, 8, 0]);
    }

    #[test]
    fn test_failed_string_rolls_back_cursor() {
        let mut storage = [0u8; 6];
        let mut buffer = FastBuffer::from_slice(&mut storage);
        buffer.resize(0).unwrap();
        let mut cdr = Cdr::new(&mut buffer, Endianness::Little, CdrType::DdsCdr);
        let err = cdr.serialize_string("hello").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotEnoughMemory);
        assert_eq!(cdr.position(), 0);
    }

    #[test]
    fn test_length_prefix_limit() {
        assert_eq!(length_prefix(5, "ctx").unwrap(), 5);
        #[cfg(target_pointer_width = "64")]
        {
            let err = length_prefix(u32::MAX as usize + 1, "ctx").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadParameter);
        }
    }
}
