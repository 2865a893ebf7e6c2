// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Byte storage behind a CDR codec.
//!
//! A [`FastBuffer`] either owns a growable allocation or wraps memory supplied
//! by the caller. A borrowed buffer never reallocates: any write that would
//! need more room than the caller's slice fails with
//! [`CodecError::NotEnoughMemory`](crate::CodecError::NotEnoughMemory).
//!
//! The buffer tracks two lengths:
//! - `capacity`: bytes of storage available for writing
//! - `size`: bytes of logical content, readable by a decoder (`size <= capacity`)

use tracing::{trace, warn};

use crate::core::{CdrConfig, CodecError, Result};

/// Minimum growth step for an owned buffer.
pub const BUFFER_START_LENGTH: usize = 200;

#[derive(Debug)]
enum Storage<'a> {
    /// Storage owned by the buffer; `len()` is the capacity, always zero-filled.
    Owned(Vec<u8>),
    /// Caller-supplied storage with a hard upper bound.
    Borrowed(&'a mut [u8]),
}

/// Growable or fixed byte buffer.
///
/// # Example
///
/// ```
/// use cdrcodec::FastBuffer;
///
/// let mut storage = [0u8; 16];
/// let mut fixed = FastBuffer::from_slice(&mut storage);
/// assert!(fixed.is_fixed());
/// assert!(!fixed.reserve(32));
///
/// let mut owned = FastBuffer::new();
/// assert!(owned.reserve(32));
/// assert!(owned.capacity() >= 32);
/// ```
#[derive(Debug)]
pub struct FastBuffer<'a> {
    storage: Storage<'a>,
    size: usize,
}

impl Default for FastBuffer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl FastBuffer<'static> {
    /// Create an empty, growable buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Storage::Owned(Vec::new()),
            size: 0,
        }
    }

    /// Create an empty, growable buffer with preallocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Storage::Owned(vec![0; capacity]),
            size: 0,
        }
    }

    /// Fallible [`FastBuffer::with_capacity`].
    ///
    /// Fails with `Unknown` when the allocation cannot be made.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)?;
        data.resize(capacity, 0);
        Ok(Self {
            storage: Storage::Owned(data),
            size: 0,
        })
    }

    /// Create a growable buffer whose logical content is `data`.
    #[must_use]
    pub fn from_vec(data: Vec<u8>) -> Self {
        let size = data.len();
        Self {
            storage: Storage::Owned(data),
            size,
        }
    }

    /// Create a growable buffer sized from a configuration.
    ///
    /// An `initial_capacity` that cannot be allocated fails with `Unknown`.
    pub fn from_config(config: &CdrConfig) -> Result<Self> {
        Self::try_with_capacity(config.initial_capacity).map_err(|err| {
            warn!(capacity = config.initial_capacity, error = %err, "cannot allocate CDR buffer");
            err
        })
    }
}

impl<'a> FastBuffer<'a> {
    /// Create a fixed buffer over caller memory.
    ///
    /// The whole slice is logical content, so it can be decoded directly; it
    /// can also be overwritten by an encoder. The buffer never writes outside
    /// `storage` and never frees it.
    #[must_use]
    pub fn from_slice(storage: &'a mut [u8]) -> Self {
        let size = storage.len();
        Self {
            storage: Storage::Borrowed(storage),
            size,
        }
    }

    /// Logical content of the buffer.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage()[..self.size]
    }

    /// Mutable logical content of the buffer.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let size = self.size;
        &mut self.storage_mut()[..size]
    }

    /// Logical size in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Check if the buffer holds no content.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Bytes of storage available for writing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage().len()
    }

    /// Whether the buffer wraps caller memory and can never grow.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        matches!(self.storage, Storage::Borrowed(_))
    }

    /// Ensure capacity is at least `capacity` bytes.
    ///
    /// Returns `false` when a fixed buffer is too small or an allocation
    /// fails. Never shrinks and never changes the logical size.
    pub fn reserve(&mut self, capacity: usize) -> bool {
        self.grow_to(capacity).is_ok()
    }

    /// Set the logical size.
    ///
    /// An owned buffer grows its storage as needed; a fixed buffer fails with
    /// `NotEnoughMemory` if `size` exceeds its capacity. Shrinking is allowed
    /// since the caller asked for it explicitly.
    pub fn resize(&mut self, size: usize) -> Result<()> {
        self.grow_to(size)?;
        self.size = size;
        Ok(())
    }

    /// Take the logical content of an owned buffer.
    ///
    /// Returns `None` for a fixed buffer, whose memory belongs to the caller.
    pub fn into_vec(self) -> Option<Vec<u8>> {
        match self.storage {
            Storage::Owned(mut data) => {
                data.truncate(self.size);
                Some(data)
            }
            Storage::Borrowed(_) => None,
        }
    }

    /// Make room for bytes up to `end` (exclusive) for a write at `position`.
    pub(crate) fn ensure_capacity(&mut self, end: usize, position: usize) -> Result<()> {
        self.grow_to(end).map_err(|err| match err {
            CodecError::NotEnoughMemory { available, .. } => {
                CodecError::not_enough_memory(
                    end - position,
                    available.saturating_sub(position),
                    position,
                )
            }
            other => other,
        })
    }

    /// Extend the logical size to cover bytes up to `end`.
    #[inline]
    pub(crate) fn mark_written(&mut self, end: usize) {
        if end > self.size {
            self.size = end;
        }
    }

    /// Whole storage, including bytes past the logical size.
    #[inline]
    fn storage(&self) -> &[u8] {
        match &self.storage {
            Storage::Owned(data) => data,
            Storage::Borrowed(data) => data,
        }
    }

    #[inline]
    pub(crate) fn storage_mut(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Storage::Owned(data) => data,
            Storage::Borrowed(data) => data,
        }
    }

    fn grow_to(&mut self, required: usize) -> Result<()> {
        match &mut self.storage {
            Storage::Owned(data) => {
                let capacity = data.len();
                if required <= capacity {
                    return Ok(());
                }
                let step = capacity.max(BUFFER_START_LENGTH);
                let new_capacity = required.max(capacity.saturating_add(step));
                data.try_reserve_exact(new_capacity - capacity)?;
                data.resize(new_capacity, 0);
                trace!(from = capacity, to = new_capacity, "grew CDR buffer");
                Ok(())
            }
            Storage::Borrowed(data) => {
                if required <= data.len() {
                    Ok(())
                } else {
                    Err(CodecError::not_enough_memory(required, data.len(), 0))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;

    #[test]
    fn test_new_buffer_is_empty() {
        let buffer = FastBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.size(), 0);
        assert_eq!(buffer.capacity(), 0);
        assert!(!buffer.is_fixed());
    }

    #[test]
    fn test_owned_reserve_grows() {
        let mut buffer = FastBuffer::new();
        assert!(buffer.reserve(10));
        assert!(buffer.capacity() >= 10);
        assert_eq!(buffer.size(), 0);
    }

    #[test]
    fn test_reserve_never_shrinks() {
        let mut buffer = FastBuffer::with_capacity(64);
        assert!(buffer.reserve(8));
        assert_eq!(buffer.capacity(), 64);
    }

    #[test]
    fn test_fixed_reserve_fails_beyond_capacity() {
        let mut storage = [0u8; 8];
        let mut buffer = FastBuffer::from_slice(&mut storage);
        assert!(buffer.reserve(8));
        assert!(!buffer.reserve(9));
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    fn test_fixed_resize() {
        let mut storage = [1u8, 2, 3, 4];
        let mut buffer = FastBuffer::from_slice(&mut storage);
        assert_eq!(buffer.size(), 4);
        buffer.resize(2).unwrap();
        assert_eq!(buffer.as_slice(), &[1, 2]);
        let err = buffer.resize(5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotEnoughMemory);
        assert_eq!(buffer.size(), 2);
    }

    #[test]
    fn test_owned_resize_zero_fills() {
        let mut buffer = FastBuffer::new();
        buffer.resize(300).unwrap();
        assert_eq!(buffer.size(), 300);
        assert!(buffer.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_growth_step() {
        let mut buffer = FastBuffer::new();
        buffer.ensure_capacity(1, 0).unwrap();
        assert_eq!(buffer.capacity(), BUFFER_START_LENGTH);
        buffer.ensure_capacity(BUFFER_START_LENGTH + 1, 0).unwrap();
        assert_eq!(buffer.capacity(), 2 * BUFFER_START_LENGTH);
    }

    #[test]
    fn test_ensure_capacity_error_reports_position() {
        let mut storage = [0u8; 3];
        let mut buffer = FastBuffer::from_slice(&mut storage);
        let err = buffer.ensure_capacity(4, 0).unwrap_err();
        assert_eq!(err, CodecError::not_enough_memory(4, 3, 0));

        let err = buffer.ensure_capacity(6, 2).unwrap_err();
        assert_eq!(err, CodecError::not_enough_memory(4, 1, 2));
    }

    #[test]
    fn test_into_vec() {
        let mut buffer = FastBuffer::with_capacity(16);
        buffer.storage_mut()[0] = 7;
        buffer.mark_written(1);
        assert_eq!(buffer.into_vec(), Some(vec![7]));

        let mut storage = [0u8; 2];
        let fixed = FastBuffer::from_slice(&mut storage);
        assert_eq!(fixed.into_vec(), None);
    }

    #[test]
    fn test_try_with_capacity() {
        let buffer = FastBuffer::try_with_capacity(48).unwrap();
        assert_eq!(buffer.capacity(), 48);
        assert!(buffer.is_empty());

        let err = FastBuffer::try_with_capacity(usize::MAX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
    }

    #[test]
    fn test_from_config_oversized_capacity_is_unknown() {
        let config = CdrConfig::from_toml_str("initial_capacity = 9223372036854775807").unwrap();
        let err = FastBuffer::from_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
    }

    #[test]
    fn test_from_vec_is_readable() {
        let buffer = FastBuffer::from_vec(vec![1, 2, 3]);
        assert_eq!(buffer.as_slice(), &[1, 2, 3]);
        assert!(!buffer.is_fixed());
    }

    #[test]
    fn test_fixed_buffer_memory_outlives_buffer() {
        let mut storage = [0u8; 4];
        {
            let mut buffer = FastBuffer::from_slice(&mut storage);
            buffer.as_mut_slice()[0] = 0xAB;
        }
        assert_eq!(storage[0], 0xAB);
    }
}
