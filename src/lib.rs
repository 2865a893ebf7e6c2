// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # cdrcodec
//!
//! Binary serialization in the OMG Common Data Representation (CDR), in both
//! the DDS_CDR (RTPS payload) and CORBA_CDR flavors.
//!
//! ## Architecture
//!
//! - `core/` - error taxonomy and configuration
//! - `encoding/cdr/` - buffer, codec, encapsulation header, size calculator
//!
//! ## Example: Encoding and decoding
//!
//! ```rust
//! # fn main() -> cdrcodec::Result<()> {
//! use cdrcodec::{Cdr, CdrType, Endianness, FastBuffer};
//!
//! let mut buffer = FastBuffer::new();
//! let mut cdr = Cdr::new(&mut buffer, Endianness::Big, CdrType::DdsCdr);
//! cdr.serialize_encapsulation()?;
//! cdr.serialize(1u8)?.serialize(0x0102_0304u32)?;
//! cdr.serialize_sequence(&[1i16, 2, 3])?;
//!
//! cdr.reset();
//! cdr.read_encapsulation()?;
//! assert_eq!(cdr.deserialize::<u8>()?, 1);
//! assert_eq!(cdr.deserialize::<u32>()?, 0x0102_0304);
//! assert_eq!(cdr.deserialize_sequence::<i16>()?, vec![1, 2, 3]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Caller-supplied memory
//!
//! ```rust
//! use cdrcodec::{Cdr, CdrType, Endianness, ErrorKind, FastBuffer};
//!
//! let mut storage = [0u8; 3];
//! let mut buffer = FastBuffer::from_slice(&mut storage);
//! let mut cdr = Cdr::new(&mut buffer, Endianness::Little, CdrType::CorbaCdr);
//! let err = cdr.serialize(1u32).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::NotEnoughMemory);
//! assert_eq!(cdr.position(), 0);
//! ```

// Core types
pub mod core;

pub use core::{CdrConfig, CodecError, EndiannessSetting, ErrorKind, Result};

// Encoding/decoding
pub mod encoding;

pub use encoding::cdr::{
    alignment, Cdr, CdrDeserialize, CdrPrimitive, CdrSerialize, CdrSizeCalculator, CdrState,
    CdrType, DdsCdrPlFlag, Endianness, FastBuffer, LongDouble, WString,
};
