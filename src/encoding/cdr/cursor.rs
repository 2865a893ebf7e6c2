// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Cursor position and alignment arithmetic.
//!
//! Key concept: padding is computed from `(offset - origin) % size`, not
//! `offset % size`. The origin starts at the beginning of the buffer and is
//! moved to the end of the encapsulation header (or anywhere else the caller
//! asks) with [`Cdr::reset_alignment`](super::Cdr::reset_alignment).

use super::endian::Endianness;

/// Number of padding bytes needed so that `current_alignment + padding` is a
/// multiple of `data_size`.
///
/// `data_size` is one of 1, 2, 4, 8 (or 16); size 1 and 0 never need padding.
///
/// ```
/// use cdrcodec::alignment;
///
/// assert_eq!(alignment(1, 4), 3);
/// assert_eq!(alignment(4, 4), 0);
/// assert_eq!(alignment(5, 1), 0);
/// assert_eq!(alignment(6, 8), 2);
/// ```
#[inline]
#[must_use]
pub const fn alignment(current_alignment: usize, data_size: usize) -> usize {
    if data_size <= 1 {
        return 0;
    }
    let remainder = current_alignment % data_size;
    if remainder == 0 {
        0
    } else {
        data_size - remainder
    }
}

/// Snapshot of a codec's position.
///
/// Obtained from [`Cdr::state`](super::Cdr::state) and restored with
/// [`Cdr::set_state`](super::Cdr::set_state) to rewind after a partial
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CdrState {
    /// Current read/write position from the buffer start.
    pub(crate) offset: usize,
    /// Alignment origin from the buffer start.
    pub(crate) origin: usize,
    /// Stored endianness.
    pub(crate) endianness: Endianness,
}

impl CdrState {
    pub(crate) const fn new(endianness: Endianness) -> Self {
        Self {
            offset: 0,
            origin: 0,
            endianness,
        }
    }

    /// Position from the buffer start.
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Alignment origin from the buffer start.
    #[inline]
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Endianness at the time of the snapshot.
    #[inline]
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Padding needed before a value aligned to `size`.
    #[inline]
    pub(crate) fn padding(&self, size: usize) -> usize {
        alignment(self.offset.saturating_sub(self.origin), size)
    }
}
