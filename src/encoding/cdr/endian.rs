// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Byte order handling.

use serde::{Deserialize, Serialize};

use crate::core::{CodecError, Result};

/// Byte order of CDR data.
///
/// The discriminants are the wire values of the endianness bit in the
/// encapsulation kind byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Endianness {
    /// Most significant byte first.
    Big = 0x00,
    /// Least significant byte first.
    Little = 0x01,
}

impl Endianness {
    /// Byte order of the host.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Endianness = Endianness::Little;
    /// Byte order of the host.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Endianness = Endianness::Big;

    /// Byte order of the host.
    #[must_use]
    pub const fn native() -> Self {
        Self::NATIVE
    }

    /// Whether values in this order must be byte-swapped on this host.
    #[must_use]
    pub const fn needs_swap(self) -> bool {
        !matches!(
            (self, Self::NATIVE),
            (Endianness::Big, Endianness::Big) | (Endianness::Little, Endianness::Little)
        )
    }

    /// Check if this is little endian.
    #[must_use]
    pub const fn is_little_endian(self) -> bool {
        matches!(self, Endianness::Little)
    }

    /// The opposite byte order.
    #[must_use]
    pub const fn swapped(self) -> Self {
        match self {
            Endianness::Big => Endianness::Little,
            Endianness::Little => Endianness::Big,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Endianness::Big => "big",
            Endianness::Little => "little",
        }
    }
}

impl Default for Endianness {
    fn default() -> Self {
        Self::NATIVE
    }
}

impl TryFrom<u8> for Endianness {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(Endianness::Big),
            0x01 => Ok(Endianness::Little),
            other => Err(CodecError::bad_parameter(
                "Endianness",
                format!("invalid endianness value {other:#04x}"),
            )),
        }
    }
}

impl From<Endianness> for u8 {
    fn from(value: Endianness) -> Self {
        value as u8
    }
}
