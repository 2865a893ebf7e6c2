// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Deserialization half of [`Cdr`].
//!
//! Reads are bounded by the buffer's logical size. Running out of bytes is a
//! `NotEnoughMemory` failure; an impossible value (a boolean byte other than
//! 0/1, a wide character outside Unicode, a string that is not UTF-8) is
//! `BadParameter`. Either way the cursor stays where it was before the call.

use super::codec::Cdr;
use super::endian::Endianness;
use super::primitive::CdrPrimitive;
use super::traits::CdrDeserialize;
use crate::core::{CodecError, Result};

impl Cdr<'_, '_> {
    /// Read a scalar in the stored endianness.
    pub fn deserialize<T: CdrPrimitive>(&mut self) -> Result<T> {
        let endianness = self.endianness();
        self.deserialize_with_endianness(endianness)
    }

    /// Read a scalar in `endianness`, leaving the stored endianness alone.
    pub fn deserialize_with_endianness<T: CdrPrimitive>(
        &mut self,
        endianness: Endianness,
    ) -> Result<T> {
        self.rollback_on_error(|cdr| {
            let bytes = cdr.read_region(T::ALIGNMENT, T::SIZE)?;
            T::read_from(bytes, endianness)
        })
    }

    /// Fill `values` with scalars read back to back.
    ///
    /// On failure `values` may be partially overwritten.
    pub fn deserialize_array<T: CdrPrimitive>(&mut self, values: &mut [T]) -> Result<&mut Self> {
        let endianness = self.endianness();
        self.deserialize_array_with_endianness(values, endianness)
    }

    /// Fill `values` with scalars in `endianness`.
    pub fn deserialize_array_with_endianness<T: CdrPrimitive>(
        &mut self,
        values: &mut [T],
        endianness: Endianness,
    ) -> Result<&mut Self> {
        if values.is_empty() {
            return Ok(self);
        }
        let len = array_len::<T>(values.len())?;
        self.rollback_on_error(|cdr| {
            let bytes = cdr.read_region(T::ALIGNMENT, len)?;
            T::read_array(bytes, values, endianness)
        })?;
        Ok(self)
    }

    /// Read `count` scalars into a new vector.
    ///
    /// The byte count is checked against the remaining data before anything
    /// is allocated.
    pub(crate) fn deserialize_array_vec<T: CdrPrimitive>(&mut self, count: usize) -> Result<Vec<T>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let len = array_len::<T>(count)?;
        let endianness = self.endianness();
        self.rollback_on_error(|cdr| {
            let bytes = cdr.read_region(T::ALIGNMENT, len)?;
            let mut values = vec![T::default(); count];
            T::read_array(bytes, &mut values, endianness)?;
            Ok(values)
        })
    }

    /// Read a C string.
    ///
    /// A length of 0 yields an empty string. The trailing NUL is dropped when
    /// present; a payload without one is taken whole.
    pub fn deserialize_string(&mut self) -> Result<String> {
        self.rollback_on_error(|cdr| {
            let length = cdr.deserialize::<u32>()? as usize;
            if length == 0 {
                return Ok(String::new());
            }
            let bytes = cdr.read_region(1, length)?;
            let text = match bytes.split_last() {
                Some((0, rest)) => rest,
                _ => bytes,
            };
            std::str::from_utf8(text).map(str::to_owned).map_err(|e| {
                CodecError::bad_parameter("deserialize(string)", format!("invalid UTF-8: {e}"))
            })
        })
    }

    /// Read a C string in `endianness`.
    pub fn deserialize_string_with_endianness(&mut self, endianness: Endianness) -> Result<String> {
        self.with_endianness(endianness, |cdr| cdr.deserialize_string())
    }

    /// Read a wide string.
    pub fn deserialize_wstring(&mut self) -> Result<String> {
        let endianness = self.endianness();
        self.rollback_on_error(|cdr| {
            let count = cdr.deserialize::<u32>()? as usize;
            let len = array_len::<char>(count)?;
            let bytes = cdr.read_region(char::ALIGNMENT, len)?;
            bytes
                .chunks_exact(char::SIZE)
                .map(|chunk| char::read_from(chunk, endianness))
                .collect()
        })
    }

    /// Read a wide string in `endianness`.
    pub fn deserialize_wstring_with_endianness(&mut self, endianness: Endianness) -> Result<String> {
        self.with_endianness(endianness, |cdr| cdr.deserialize_wstring())
    }

    /// Read a variable-length sequence.
    pub fn deserialize_sequence<T: CdrDeserialize>(&mut self) -> Result<Vec<T>> {
        self.rollback_on_error(|cdr| {
            let count = cdr.deserialize::<u32>()? as usize;
            T::deserialize_vec(count, cdr)
        })
    }

    /// Read a variable-length sequence in `endianness`.
    pub fn deserialize_sequence_with_endianness<T: CdrDeserialize>(
        &mut self,
        endianness: Endianness,
    ) -> Result<Vec<T>> {
        self.with_endianness(endianness, |cdr| cdr.deserialize_sequence())
    }

    /// Read a fixed-length sequence of `N` elements.
    pub fn deserialize_fixed_sequence<T: CdrDeserialize, const N: usize>(
        &mut self,
    ) -> Result<[T; N]> {
        self.rollback_on_error(|cdr| {
            let items = T::deserialize_vec(N, cdr)?;
            <[T; N]>::try_from(items).map_err(|items| {
                CodecError::unknown(format!(
                    "fixed sequence decoded {} elements, expected {N}",
                    items.len()
                ))
            })
        })
    }

    /// Read a dictionary into any collection of key/value pairs.
    pub fn deserialize_map<K, V, M>(&mut self) -> Result<M>
    where
        K: CdrDeserialize,
        V: CdrDeserialize,
        M: FromIterator<(K, V)>,
    {
        self.rollback_on_error(|cdr| {
            let count = cdr.deserialize::<u32>()? as usize;
            (0..count)
                .rev()
                .map(|left| {
                    let start = cdr.position();
                    let key = K::deserialize(cdr)?;
                    let value = V::deserialize(cdr)?;
                    cdr.check_element_progress(start, left, "deserialize(map)")?;
                    Ok((key, value))
                })
                .collect()
        })
    }

    /// Reject a count that zero-size elements could never exhaust.
    ///
    /// An element that consumed no bytes never hits a bounds check, so `left`
    /// further elements are only accepted while they fit in the bytes left.
    pub(crate) fn check_element_progress(
        &self,
        start: usize,
        left: usize,
        context: &str,
    ) -> Result<()> {
        if self.position() == start && left > self.remaining() {
            return Err(CodecError::bad_parameter(
                context,
                format!(
                    "{left} more zero-size elements exceed the {} bytes left",
                    self.remaining()
                ),
            ));
        }
        Ok(())
    }

    /// Read any value with a CDR mapping (record, sequence, string, ...).
    pub fn deserialize_value<T: CdrDeserialize>(&mut self) -> Result<T> {
        self.rollback_on_error(|cdr| T::deserialize(cdr))
    }
}

fn array_len<T: CdrPrimitive>(count: usize) -> Result<usize> {
    count
        .checked_mul(T::SIZE)
        .ok_or_else(|| CodecError::unknown(format!("{count} {} elements overflow usize", T::TYPE_NAME)))
}
