// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR mappings for composite values.
//!
//! Records are the concatenation of their members in declaration order, each
//! aligned on its own. A record that extends a base writes the base members
//! first, then its own:
//!
//! ```
//! use cdrcodec::{Cdr, CdrDeserialize, CdrSerialize, CdrType, Endianness, FastBuffer, Result};
//!
//! #[derive(Debug, PartialEq)]
//! struct Base {
//!     id: u8,
//! }
//!
//! #[derive(Debug, PartialEq)]
//! struct Derived {
//!     base: Base,
//!     value: u32,
//! }
//!
//! impl CdrSerialize for Base {
//!     fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
//!         cdr.serialize(self.id)?;
//!         Ok(())
//!     }
//! }
//!
//! impl CdrSerialize for Derived {
//!     fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
//!         self.base.serialize(cdr)?;
//!         cdr.serialize(self.value)?;
//!         Ok(())
//!     }
//! }
//!
//! impl CdrDeserialize for Base {
//!     fn deserialize(cdr: &mut Cdr<'_, '_>) -> Result<Self> {
//!         Ok(Self { id: cdr.deserialize()? })
//!     }
//! }
//!
//! impl CdrDeserialize for Derived {
//!     fn deserialize(cdr: &mut Cdr<'_, '_>) -> Result<Self> {
//!         let base = Base::deserialize(cdr)?;
//!         Ok(Self { base, value: cdr.deserialize()? })
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let value = Derived { base: Base { id: 7 }, value: 9 };
//! let mut buffer = FastBuffer::new();
//! let mut cdr = Cdr::new(&mut buffer, Endianness::Little, CdrType::DdsCdr);
//! cdr.serialize_value(&value)?;
//! assert_eq!(cdr.serialized_data(), &[7, 0, 0, 0, 9, 0, 0, 0]);
//!
//! cdr.reset();
//! assert_eq!(cdr.deserialize_value::<Derived>()?, value);
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use super::codec::Cdr;
use super::primitive::LongDouble;
use crate::core::Result;

/// A value that can be written to a CDR stream.
pub trait CdrSerialize {
    /// Write `self` at the cursor.
    fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()>;

    /// Write `items` back to back.
    ///
    /// Scalars override this with a single bulk write.
    fn serialize_slice(items: &[Self], cdr: &mut Cdr<'_, '_>) -> Result<()>
    where
        Self: Sized,
    {
        items.iter().try_for_each(|item| item.serialize(cdr))
    }
}

/// A value that can be read from a CDR stream.
pub trait CdrDeserialize: Sized {
    /// Read a value at the cursor.
    fn deserialize(cdr: &mut Cdr<'_, '_>) -> Result<Self>;

    /// Read `count` values back to back.
    ///
    /// The preallocation is capped by the bytes left in the buffer, so a
    /// corrupt count cannot trigger a huge allocation. Elements that take no
    /// bytes are limited to the bytes left as well.
    fn deserialize_vec(count: usize, cdr: &mut Cdr<'_, '_>) -> Result<Vec<Self>> {
        let mut items = Vec::with_capacity(count.min(cdr.remaining()));
        for left in (0..count).rev() {
            let start = cdr.position();
            items.push(Self::deserialize(cdr)?);
            cdr.check_element_progress(start, left, "deserialize(sequence)")?;
        }
        Ok(items)
    }
}

macro_rules! impl_primitive_traits {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CdrSerialize for $ty {
                #[inline]
                fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
                    cdr.serialize(*self).map(|_| ())
                }

                fn serialize_slice(items: &[Self], cdr: &mut Cdr<'_, '_>) -> Result<()> {
                    cdr.serialize_array(items).map(|_| ())
                }
            }

            impl CdrDeserialize for $ty {
                #[inline]
                fn deserialize(cdr: &mut Cdr<'_, '_>) -> Result<Self> {
                    cdr.deserialize()
                }

                fn deserialize_vec(count: usize, cdr: &mut Cdr<'_, '_>) -> Result<Vec<Self>> {
                    cdr.deserialize_array_vec(count)
                }
            }
        )*
    };
}

impl_primitive_traits!(u8, i8, bool, u16, i16, u32, i32, u64, i64, f32, f64, char, LongDouble);

impl CdrSerialize for str {
    fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
        cdr.serialize_string(self).map(|_| ())
    }
}

impl CdrSerialize for String {
    fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
        self.as_str().serialize(cdr)
    }
}

impl CdrDeserialize for String {
    fn deserialize(cdr: &mut Cdr<'_, '_>) -> Result<Self> {
        cdr.deserialize_string()
    }
}

/// A string carried as wide characters.
///
/// `String` maps to the narrow C-string layout; wrap it in `WString` to get
/// the 4-byte-per-character layout instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WString(pub String);

impl WString {
    /// Borrow the text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for WString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for WString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<WString> for String {
    fn from(value: WString) -> Self {
        value.0
    }
}

impl CdrSerialize for WString {
    fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
        cdr.serialize_wstring(&self.0).map(|_| ())
    }
}

impl CdrDeserialize for WString {
    fn deserialize(cdr: &mut Cdr<'_, '_>) -> Result<Self> {
        cdr.deserialize_wstring().map(Self)
    }
}

impl<T: CdrSerialize> CdrSerialize for [T] {
    fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
        cdr.serialize_sequence(self).map(|_| ())
    }
}

impl<T: CdrSerialize> CdrSerialize for Vec<T> {
    fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
        cdr.serialize_sequence(self).map(|_| ())
    }
}

impl<T: CdrDeserialize> CdrDeserialize for Vec<T> {
    fn deserialize(cdr: &mut Cdr<'_, '_>) -> Result<Self> {
        cdr.deserialize_sequence()
    }
}

impl<T: CdrSerialize, const N: usize> CdrSerialize for [T; N] {
    fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
        cdr.serialize_fixed_sequence(self).map(|_| ())
    }
}

impl<T: CdrDeserialize, const N: usize> CdrDeserialize for [T; N] {
    fn deserialize(cdr: &mut Cdr<'_, '_>) -> Result<Self> {
        cdr.deserialize_fixed_sequence()
    }
}

impl<K: CdrSerialize, V: CdrSerialize> CdrSerialize for BTreeMap<K, V> {
    fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
        cdr.serialize_map(self.iter()).map(|_| ())
    }
}

impl<K: CdrDeserialize + Ord, V: CdrDeserialize> CdrDeserialize for BTreeMap<K, V> {
    fn deserialize(cdr: &mut Cdr<'_, '_>) -> Result<Self> {
        cdr.deserialize_map()
    }
}

impl<K: CdrSerialize, V: CdrSerialize, S> CdrSerialize for HashMap<K, V, S> {
    fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
        cdr.serialize_map(self.iter()).map(|_| ())
    }
}

impl<K, V, S> CdrDeserialize for HashMap<K, V, S>
where
    K: CdrDeserialize + Eq + Hash,
    V: CdrDeserialize,
    S: BuildHasher + Default,
{
    fn deserialize(cdr: &mut Cdr<'_, '_>) -> Result<Self> {
        cdr.deserialize_map()
    }
}

impl<T: CdrSerialize + ?Sized> CdrSerialize for &T {
    fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
        (**self).serialize(cdr)
    }
}

impl<T: CdrSerialize + ?Sized> CdrSerialize for Box<T> {
    fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
        (**self).serialize(cdr)
    }
}

impl<T: CdrDeserialize> CdrDeserialize for Box<T> {
    fn deserialize(cdr: &mut Cdr<'_, '_>) -> Result<Self> {
        T::deserialize(cdr).map(Box::new)
    }
}

macro_rules! impl_tuple_traits {
    ($(($($name:ident),+)),* $(,)?) => {
        $(
            impl<$($name: CdrSerialize),+> CdrSerialize for ($($name,)+) {
                #[allow(non_snake_case)]
                fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
                    let ($($name,)+) = self;
                    $($name.serialize(cdr)?;)+
                    Ok(())
                }
            }

            impl<$($name: CdrDeserialize),+> CdrDeserialize for ($($name,)+) {
                fn deserialize(cdr: &mut Cdr<'_, '_>) -> Result<Self> {
                    Ok(($($name::deserialize(cdr)?,)+))
                }
            }
        )*
    };
}

impl_tuple_traits!((A, B), (A, B, C), (A, B, C, D));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::cdr::{CdrType, Endianness, FastBuffer};

    fn encode<T: CdrSerialize + ?Sized>(value: &T) -> Vec<u8> {
        let mut buffer = FastBuffer::new();
        let mut cdr = Cdr::new(&mut buffer, Endianness::Little, CdrType::DdsCdr);
        cdr.serialize_value(value).unwrap();
        cdr.serialized_data().to_vec()
    }

    fn decode<T: CdrDeserialize>(data: Vec<u8>) -> T {
        let mut buffer = FastBuffer::from_vec(data);
        let mut cdr = Cdr::new(&mut buffer, Endianness::Little, CdrType::DdsCdr);
        let value = cdr.deserialize_value().unwrap();
        assert_eq!(cdr.remaining(), 0);
        value
    }

    #[test]
    fn test_vec_of_strings() {
        let value = vec!["a".to_string(), "bc".to_string()];
        let data = encode(&value);
        assert_eq!(
            data,
            [2, 0, 0, 0, 2, 0, 0, 0, b'a', 0, 0, 0, 3, 0, 0, 0, b'b', b'c', 0]
        );
        assert_eq!(decode::<Vec<String>>(data), value);
    }

    #[test]
    fn test_fixed_array_has_no_count() {
        let data = encode(&[1u16, 2, 3]);
        assert_eq!(data, [1, 0, 2, 0, 3, 0]);
        assert_eq!(decode::<[u16; 3]>(data), [1, 2, 3]);
    }

    #[test]
    fn test_btree_map() {
        let mut map = BTreeMap::new();
        map.insert(1u8, 10u32);
        map.insert(2u8, 20u32);
        let data = encode(&map);
        assert_eq!(
            data,
            [2, 0, 0, 0, 1, 0, 0, 0, 10, 0, 0, 0, 2, 0, 0, 0, 20, 0, 0, 0]
        );
        assert_eq!(decode::<BTreeMap<u8, u32>>(data), map);
    }

    #[test]
    fn test_hash_map_round_trip() {
        let mut map = HashMap::new();
        map.insert("x".to_string(), vec![1i32, 2]);
        map.insert("y".to_string(), vec![]);
        let data = encode(&map);
        assert_eq!(decode::<HashMap<String, Vec<i32>>>(data), map);
    }

    #[test]
    fn test_wstring_wrapper() {
        let value = WString::from("hé");
        let data = encode(&value);
        assert_eq!(data, [2, 0, 0, 0, b'h', 0, 0, 0, 0xE9, 0, 0, 0]);
        assert_eq!(decode::<WString>(data).as_str(), "hé");
    }

    #[test]
    fn test_tuple_aligns_each_member() {
        let data = encode(&(1u8, 2u64));
        assert_eq!(data.len(), 16);
        assert_eq!(decode::<(u8, u64)>(data), (1, 2));
    }

    #[test]
    fn test_nested_sequences() {
        let value = vec![vec![1u8], vec![], vec![2, 3]];
        assert_eq!(decode::<Vec<Vec<u8>>>(encode(&value)), value);
    }
}
