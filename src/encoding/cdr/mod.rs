// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR (Common Data Representation) module.
//!
//! Provides the buffer, the alignment-aware codec, encapsulation headers and
//! size calculation:
//! - [`FastBuffer`] - owned growable or caller-supplied fixed storage
//! - [`Cdr`] - cursor that serializes into and deserializes from a buffer
//! - [`CdrSizeCalculator`] - serialized size without writing anything
//! - [`CdrSerialize`] / [`CdrDeserialize`] - mappings for records, sequences,
//!   maps and strings

pub mod buffer;
pub mod calculator;
pub mod codec;
pub mod cursor;
pub mod decoder;
pub mod encapsulation;
pub mod encoder;
pub mod endian;
pub mod primitive;
pub mod traits;

pub use buffer::{FastBuffer, BUFFER_START_LENGTH};
pub use calculator::CdrSizeCalculator;
pub use codec::Cdr;
pub use cursor::{alignment, CdrState};
pub use encapsulation::{CdrType, DdsCdrPlFlag, CORBA_CDR_HEADER_SIZE, DDS_CDR_HEADER_SIZE};
pub use endian::Endianness;
pub use primitive::{CdrPrimitive, LongDouble};
pub use traits::{CdrDeserialize, CdrSerialize, WString};
