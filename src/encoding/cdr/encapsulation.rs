// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encapsulation header that precedes a CDR payload.
//!
//! # Wire layout
//!
//! DDS_CDR (4 bytes, the RTPS encapsulation identifier plus options):
//! - Byte 0: `0x00`
//! - Byte 1: kind, `pl_flag | endianness` (`0x02` = parameter list, `0x01` = little endian)
//! - Bytes 2-3: options, `u16` in the stream's byte order
//!
//! CORBA_CDR (1 byte):
//! - Byte 0: kind, `endianness`
//!
//! After the header the alignment origin is reset, so the first field of the
//! payload is aligned relative to the byte following the header.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::codec::Cdr;
use super::endian::Endianness;
use crate::core::{CodecError, Result};

/// Size of the DDS_CDR encapsulation header.
pub const DDS_CDR_HEADER_SIZE: usize = 4;

/// Size of the CORBA_CDR encapsulation header.
pub const CORBA_CDR_HEADER_SIZE: usize = 1;

/// CDR flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CdrType {
    /// Plain CORBA CDR: one-byte header, no options.
    #[serde(rename = "corba")]
    CorbaCdr = 0,
    /// DDS CDR: four-byte header with parameter-list flag and options.
    #[default]
    #[serde(rename = "dds")]
    DdsCdr = 1,
}

impl CdrType {
    /// Size of the encapsulation header for this flavor.
    #[must_use]
    pub const fn header_size(self) -> usize {
        match self {
            CdrType::CorbaCdr => CORBA_CDR_HEADER_SIZE,
            CdrType::DdsCdr => DDS_CDR_HEADER_SIZE,
        }
    }

    /// Kind-byte bits accepted when reading a header of this flavor.
    const fn allowed_kind_bits(self) -> u8 {
        match self {
            CdrType::CorbaCdr => Endianness::Little as u8,
            CdrType::DdsCdr => Endianness::Little as u8 | DdsCdrPlFlag::WithPl as u8,
        }
    }
}

impl TryFrom<u8> for CdrType {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(CdrType::CorbaCdr),
            1 => Ok(CdrType::DdsCdr),
            other => Err(CodecError::bad_parameter(
                "CdrType",
                format!("invalid CDR type {other:#04x}"),
            )),
        }
    }
}

/// Whether a DDS_CDR payload uses parameter-list encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DdsCdrPlFlag {
    /// Plain payload.
    #[default]
    WithoutPl = 0x00,
    /// Parameter-list payload.
    WithPl = 0x02,
}

impl TryFrom<u8> for DdsCdrPlFlag {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(DdsCdrPlFlag::WithoutPl),
            0x02 => Ok(DdsCdrPlFlag::WithPl),
            other => Err(CodecError::bad_parameter(
                "DdsCdrPlFlag",
                format!("invalid parameter-list flag {other:#04x}"),
            )),
        }
    }
}

impl From<bool> for DdsCdrPlFlag {
    fn from(with_parameter_list: bool) -> Self {
        if with_parameter_list {
            DdsCdrPlFlag::WithPl
        } else {
            DdsCdrPlFlag::WithoutPl
        }
    }
}

impl Cdr<'_, '_> {
    /// Read the encapsulation header at the cursor.
    ///
    /// Updates the stored endianness (and, for DDS_CDR, the parameter-list
    /// flag and options), then resets the alignment origin to the byte after
    /// the header. On failure the codec is left as it was before the call.
    pub fn read_encapsulation(&mut self) -> Result<&mut Self> {
        let cdr_type = self.cdr_type();
        self.rollback_on_error(|cdr| {
            if cdr_type == CdrType::DdsCdr {
                let first: u8 = cdr.deserialize()?;
                if first != 0 {
                    warn!(byte = first, "rejected DDS_CDR encapsulation");
                    return Err(CodecError::bad_parameter(
                        "read_encapsulation",
                        format!("unexpected leading byte {first:#04x}, expected 0x00"),
                    ));
                }
            }

            let kind: u8 = cdr.deserialize()?;
            if kind & !cdr_type.allowed_kind_bits() != 0 {
                warn!(kind, ?cdr_type, "rejected encapsulation kind");
                return Err(CodecError::bad_parameter(
                    "read_encapsulation",
                    format!("unexpected encapsulation kind {kind:#04x} for {cdr_type:?}"),
                ));
            }

            cdr.change_endianness(Endianness::try_from(kind & Endianness::Little as u8)?);
            if cdr_type == CdrType::DdsCdr {
                let pl_flag = DdsCdrPlFlag::try_from(kind & DdsCdrPlFlag::WithPl as u8)?;
                let options: u16 = cdr.deserialize()?;
                cdr.set_dds_cdr_pl_flag(pl_flag);
                cdr.set_dds_cdr_options(options);
            }
            Ok(())
        })?;

        self.reset_alignment();
        debug!(
            cdr_type = ?self.cdr_type(),
            endianness = self.endianness().as_str(),
            pl_flag = ?self.dds_cdr_pl_flag(),
            options = self.dds_cdr_options(),
            "read encapsulation"
        );
        Ok(self)
    }

    /// Write the encapsulation header for the current configuration.
    ///
    /// Resets the alignment origin to the byte after the header. On failure
    /// the cursor is left as it was before the call.
    pub fn serialize_encapsulation(&mut self) -> Result<&mut Self> {
        let cdr_type = self.cdr_type();
        let pl_flag = match cdr_type {
            CdrType::DdsCdr => self.dds_cdr_pl_flag() as u8,
            CdrType::CorbaCdr => 0,
        };
        let kind = pl_flag | self.endianness() as u8;
        let options = self.dds_cdr_options();

        self.rollback_on_error(|cdr| {
            if cdr_type == CdrType::DdsCdr {
                cdr.serialize(0u8)?;
            }
            cdr.serialize(kind)?;
            if cdr_type == CdrType::DdsCdr {
                cdr.serialize(options)?;
            }
            Ok(())
        })?;

        self.reset_alignment();
        debug!(?cdr_type, kind, options, "serialized encapsulation");
        Ok(self)
    }
}
