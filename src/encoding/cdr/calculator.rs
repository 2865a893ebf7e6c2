// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR size calculator.
//!
//! Computes how many bytes a sequence of fields will occupy, using the same
//! alignment arithmetic as [`Cdr`](super::Cdr), so a fixed buffer can be
//! sized before encoding.

use super::cursor::alignment;
use super::encapsulation::CdrType;
use super::primitive::CdrPrimitive;

/// CDR size calculator.
///
/// # Example
///
/// ```
/// use cdrcodec::{CdrSizeCalculator, CdrType};
///
/// let mut calc = CdrSizeCalculator::with_encapsulation(CdrType::DdsCdr);
/// calc.add::<i32>();    // 4 bytes
/// calc.add::<i32>();    // 4 bytes
/// calc.add_string(5);   // 4 (length) + 5 + 1 (null) = 10 bytes
/// assert_eq!(calc.size(), 4 + 18);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CdrSizeCalculator {
    offset: usize,
    origin: usize,
}

impl CdrSizeCalculator {
    /// Calculator for a stream without an encapsulation header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator for a stream that starts with the header of `cdr_type`.
    ///
    /// The alignment origin sits right after the header, as it does for a
    /// codec after [`Cdr::serialize_encapsulation`](super::Cdr::serialize_encapsulation).
    #[must_use]
    pub fn with_encapsulation(cdr_type: CdrType) -> Self {
        let header = cdr_type.header_size();
        Self {
            offset: header,
            origin: header,
        }
    }

    /// Total size so far.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.offset
    }

    /// Make the current size the alignment origin.
    pub fn reset_alignment(&mut self) {
        self.origin = self.offset;
    }

    /// Account for one scalar.
    pub fn add<T: CdrPrimitive>(&mut self) -> usize {
        self.increment_and_return(T::ALIGNMENT, T::SIZE)
    }

    /// Account for `count` scalars written back to back.
    ///
    /// Zero elements add nothing, padding included.
    pub fn add_array<T: CdrPrimitive>(&mut self, count: usize) -> usize {
        if count == 0 {
            return self.offset;
        }
        self.increment_and_return(T::ALIGNMENT, T::SIZE.saturating_mul(count))
    }

    /// Account for a C string of `length` bytes (terminator not included).
    pub fn add_string(&mut self, length: usize) -> usize {
        self.add::<u32>();
        self.offset = self.offset.saturating_add(length).saturating_add(1);
        self.offset
    }

    /// Account for a wide string of `chars` characters.
    pub fn add_wstring(&mut self, chars: usize) -> usize {
        self.add::<u32>();
        self.add_array::<char>(chars)
    }

    /// Account for a sequence of `count` scalars, length prefix included.
    pub fn add_sequence<T: CdrPrimitive>(&mut self, count: usize) -> usize {
        self.add::<u32>();
        self.add_array::<T>(count)
    }

    fn increment_and_return(&mut self, align: usize, byte_count: usize) -> usize {
        self.offset += alignment(self.offset - self.origin, align);
        self.offset = self.offset.saturating_add(byte_count);
        self.offset
    }
}
