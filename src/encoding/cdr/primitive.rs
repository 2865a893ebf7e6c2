// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fixed-width scalar types and their byte layout.
//!
//! | Type         | Wire size | Alignment | Notes                         |
//! |--------------|-----------|-----------|-------------------------------|
//! | `u8`, `i8`   | 1         | 1         | also the narrow character     |
//! | `bool`       | 1         | 1         | `0` or `1`, anything else is rejected |
//! | `u16`, `i16` | 2         | 2         |                               |
//! | `u32`, `i32` | 4         | 4         |                               |
//! | `f32`        | 4         | 4         | IEEE-754 binary32             |
//! | `char`       | 4         | 4         | wide character, UTF-32 unit   |
//! | `u64`, `i64` | 8         | 8         |                               |
//! | `f64`        | 8         | 8         | IEEE-754 binary64             |
//! | [`LongDouble`] | 16      | 8         | IEEE-754 binary128            |

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::endian::Endianness;
use crate::core::{CodecError, Result};

mod sealed {
    pub trait Sealed {}
}

/// A scalar with a fixed CDR byte layout.
///
/// Implemented for every type in the module table; sealed so the layout
/// contract cannot be broken from outside the crate.
pub trait CdrPrimitive: sealed::Sealed + Copy + Default + 'static {
    /// Bytes on the wire.
    const SIZE: usize;
    /// Alignment boundary, measured from the alignment origin.
    const ALIGNMENT: usize;
    /// Name used in error messages.
    const TYPE_NAME: &'static str;

    /// Write exactly `SIZE` bytes into `out`.
    fn write_to(self, out: &mut [u8], endianness: Endianness);

    /// Read a value from exactly `SIZE` bytes.
    fn read_from(bytes: &[u8], endianness: Endianness) -> Result<Self>;

    /// Write `values` back to back into `out` (`out.len() == values.len() * SIZE`).
    fn write_array(values: &[Self], out: &mut [u8], endianness: Endianness) {
        for (value, chunk) in values.iter().zip(out.chunks_exact_mut(Self::SIZE)) {
            value.write_to(chunk, endianness);
        }
    }

    /// Fill `values` from `bytes` (`bytes.len() == values.len() * SIZE`).
    fn read_array(bytes: &[u8], values: &mut [Self], endianness: Endianness) -> Result<()> {
        for (slot, chunk) in values.iter_mut().zip(bytes.chunks_exact(Self::SIZE)) {
            *slot = Self::read_from(chunk, endianness)?;
        }
        Ok(())
    }
}

macro_rules! impl_byte_primitive {
    ($($ty:ty),*) => {$(
        impl sealed::Sealed for $ty {}

        impl CdrPrimitive for $ty {
            const SIZE: usize = 1;
            const ALIGNMENT: usize = 1;
            const TYPE_NAME: &'static str = stringify!($ty);

            #[inline]
            fn write_to(self, out: &mut [u8], _endianness: Endianness) {
                out[0] = self as u8;
            }

            #[inline]
            fn read_from(bytes: &[u8], _endianness: Endianness) -> Result<Self> {
                Ok(bytes[0] as $ty)
            }

            fn write_array(values: &[Self], out: &mut [u8], _endianness: Endianness) {
                out.copy_from_slice(bytemuck::cast_slice(values));
            }

            fn read_array(bytes: &[u8], values: &mut [Self], _endianness: Endianness) -> Result<()> {
                bytemuck::cast_slice_mut::<$ty, u8>(values).copy_from_slice(bytes);
                Ok(())
            }
        }
    )*};
}

macro_rules! impl_numeric_primitive {
    ($($ty:ty => $size:literal, $write:ident, $read:ident, $write_into:ident, $read_into:ident;)*) => {$(
        impl sealed::Sealed for $ty {}

        impl CdrPrimitive for $ty {
            const SIZE: usize = $size;
            const ALIGNMENT: usize = $size;
            const TYPE_NAME: &'static str = stringify!($ty);

            #[inline]
            fn write_to(self, out: &mut [u8], endianness: Endianness) {
                match endianness {
                    Endianness::Big => BigEndian::$write(out, self),
                    Endianness::Little => LittleEndian::$write(out, self),
                }
            }

            #[inline]
            fn read_from(bytes: &[u8], endianness: Endianness) -> Result<Self> {
                Ok(match endianness {
                    Endianness::Big => BigEndian::$read(bytes),
                    Endianness::Little => LittleEndian::$read(bytes),
                })
            }

            fn write_array(values: &[Self], out: &mut [u8], endianness: Endianness) {
                if !endianness.needs_swap() {
                    out.copy_from_slice(bytemuck::cast_slice(values));
                    return;
                }
                match endianness {
                    Endianness::Big => BigEndian::$write_into(values, out),
                    Endianness::Little => LittleEndian::$write_into(values, out),
                }
            }

            fn read_array(bytes: &[u8], values: &mut [Self], endianness: Endianness) -> Result<()> {
                if !endianness.needs_swap() {
                    bytemuck::cast_slice_mut::<$ty, u8>(values).copy_from_slice(bytes);
                    return Ok(());
                }
                match endianness {
                    Endianness::Big => BigEndian::$read_into(bytes, values),
                    Endianness::Little => LittleEndian::$read_into(bytes, values),
                }
                Ok(())
            }
        }
    )*};
}

impl_byte_primitive!(u8, i8);

impl_numeric_primitive! {
    u16 => 2, write_u16, read_u16, write_u16_into, read_u16_into;
    i16 => 2, write_i16, read_i16, write_i16_into, read_i16_into;
    u32 => 4, write_u32, read_u32, write_u32_into, read_u32_into;
    i32 => 4, write_i32, read_i32, write_i32_into, read_i32_into;
    u64 => 8, write_u64, read_u64, write_u64_into, read_u64_into;
    i64 => 8, write_i64, read_i64, write_i64_into, read_i64_into;
    f32 => 4, write_f32, read_f32, write_f32_into, read_f32_into;
    f64 => 8, write_f64, read_f64, write_f64_into, read_f64_into;
}

impl sealed::Sealed for bool {}

impl CdrPrimitive for bool {
    const SIZE: usize = 1;
    const ALIGNMENT: usize = 1;
    const TYPE_NAME: &'static str = "bool";

    #[inline]
    fn write_to(self, out: &mut [u8], _endianness: Endianness) {
        out[0] = u8::from(self);
    }

    fn read_from(bytes: &[u8], _endianness: Endianness) -> Result<Self> {
        match bytes[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::bad_parameter(
                "deserialize(bool)",
                format!("unexpected byte value {other:#04x}, expected 0 or 1"),
            )),
        }
    }
}

impl sealed::Sealed for char {}

impl CdrPrimitive for char {
    const SIZE: usize = 4;
    const ALIGNMENT: usize = 4;
    const TYPE_NAME: &'static str = "wchar";

    #[inline]
    fn write_to(self, out: &mut [u8], endianness: Endianness) {
        u32::from(self).write_to(out, endianness);
    }

    fn read_from(bytes: &[u8], endianness: Endianness) -> Result<Self> {
        let code = u32::read_from(bytes, endianness)?;
        char::from_u32(code).ok_or_else(|| {
            CodecError::bad_parameter(
                "deserialize(wchar)",
                format!("{code:#x} is not a Unicode scalar value"),
            )
        })
    }
}

/// Extended-precision float carried as an IEEE-754 binary128 bit pattern.
///
/// Rust has no stable 128-bit float, so the value is kept as raw bits.
/// Conversion from `f64` is exact; conversion back rounds to nearest, ties
/// to even.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LongDouble(u128);

const F128_EXP_BIAS: i32 = 16383;
const F128_EXP_MAX: u128 = 0x7FFF;
const F128_MANT_BITS: u32 = 112;
const F128_MANT_MASK: u128 = (1 << F128_MANT_BITS) - 1;

const F64_EXP_BIAS: i32 = 1023;
const F64_MANT_BITS: u32 = 52;
const F64_MANT_MASK: u64 = (1 << F64_MANT_BITS) - 1;
const F64_QUIET_BIT: u64 = 1 << (F64_MANT_BITS - 1);

impl LongDouble {
    /// Positive zero.
    pub const ZERO: LongDouble = LongDouble(0);

    /// Wrap a binary128 bit pattern.
    #[must_use]
    pub const fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    /// The binary128 bit pattern.
    #[must_use]
    pub const fn to_bits(self) -> u128 {
        self.0
    }

    /// Widen a double; every `f64` is representable.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        let bits = value.to_bits();
        let sign = u128::from(bits >> 63) << 127;
        let exp = ((bits >> F64_MANT_BITS) & 0x7FF) as i32;
        let mant = bits & F64_MANT_MASK;
        let shift = F128_MANT_BITS - F64_MANT_BITS;

        let body = match (exp, mant) {
            (0, 0) => 0,
            (0x7FF, _) => (F128_EXP_MAX << F128_MANT_BITS) | (u128::from(mant) << shift),
            (0, _) => {
                // Subnormal double: normalize around its highest set bit.
                let top = 63 - mant.leading_zeros() as i32;
                let exp128 = (top - 1074 + F128_EXP_BIAS) as u128;
                let fraction = u128::from(mant & !(1 << top)) << (F128_MANT_BITS as i32 - top);
                (exp128 << F128_MANT_BITS) | fraction
            }
            _ => {
                let exp128 = (exp - F64_EXP_BIAS + F128_EXP_BIAS) as u128;
                (exp128 << F128_MANT_BITS) | (u128::from(mant) << shift)
            }
        };
        Self(sign | body)
    }

    /// Narrow to a double, rounding to nearest with ties to even.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        let sign = ((self.0 >> 127) as u64) << 63;
        let exp = ((self.0 >> F128_MANT_BITS) & F128_EXP_MAX) as i32;
        let mant = self.0 & F128_MANT_MASK;
        let infinity = sign | (0x7FF << F64_MANT_BITS);

        if exp == F128_EXP_MAX as i32 {
            if mant == 0 {
                return f64::from_bits(infinity);
            }
            let payload = (mant >> (F128_MANT_BITS - F64_MANT_BITS)) as u64;
            let payload = if payload == 0 { F64_QUIET_BIT } else { payload };
            return f64::from_bits(infinity | payload);
        }
        if exp == 0 {
            // Zero or a binary128 subnormal, far below the double range.
            return f64::from_bits(sign);
        }

        let unbiased = exp - F128_EXP_BIAS;
        if unbiased > F64_EXP_BIAS {
            return f64::from_bits(infinity);
        }

        let significand = (1u128 << F128_MANT_BITS) | mant;
        let (shift, exp64) = if unbiased >= 1 - F64_EXP_BIAS {
            (F128_MANT_BITS - F64_MANT_BITS, (unbiased + F64_EXP_BIAS) as u64)
        } else {
            let shift = (-unbiased - 962) as u32;
            if shift > F128_MANT_BITS + 1 {
                return f64::from_bits(sign);
            }
            (shift, 0)
        };

        let mut kept = (significand >> shift) as u64;
        let rest = significand & ((1u128 << shift) - 1);
        let half = 1u128 << (shift - 1);
        if rest > half || (rest == half && kept & 1 == 1) {
            kept += 1;
        }

        // For normals the implicit bit is still in `kept`; adding the
        // exponent field carries a rounding overflow into the exponent.
        let bits = if exp64 == 0 {
            kept
        } else {
            ((exp64 - 1) << F64_MANT_BITS) + kept
        };
        if bits >= 0x7FF << F64_MANT_BITS {
            return f64::from_bits(infinity);
        }
        f64::from_bits(sign | bits)
    }
}

impl From<f64> for LongDouble {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<LongDouble> for f64 {
    fn from(value: LongDouble) -> Self {
        value.to_f64()
    }
}

impl sealed::Sealed for LongDouble {}

impl CdrPrimitive for LongDouble {
    const SIZE: usize = 16;
    const ALIGNMENT: usize = 8;
    const TYPE_NAME: &'static str = "long double";

    #[inline]
    fn write_to(self, out: &mut [u8], endianness: Endianness) {
        match endianness {
            Endianness::Big => BigEndian::write_u128(out, self.0),
            Endianness::Little => LittleEndian::write_u128(out, self.0),
        }
    }

    #[inline]
    fn read_from(bytes: &[u8], endianness: Endianness) -> Result<Self> {
        Ok(Self(match endianness {
            Endianness::Big => BigEndian::read_u128(bytes),
            Endianness::Little => LittleEndian::read_u128(bytes),
        }))
    }
}
