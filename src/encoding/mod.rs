// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message encoding/decoding implementations.
//!
//! - [`cdr`] - CDR (Common Data Representation) encoding/decoding

pub mod cdr;

pub use cdr::{Cdr, CdrSizeCalculator, CdrType, Endianness, FastBuffer};
