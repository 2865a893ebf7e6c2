// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The CDR codec: a cursor over a [`FastBuffer`].
//!
//! One [`Cdr`] both writes and reads. Serialization methods live in
//! [`encoder`](super::encoder), deserialization in [`decoder`](super::decoder)
//! and the header in [`encapsulation`](super::encapsulation); this module
//! holds construction, configuration and cursor movement.
//!
//! # Failure state
//!
//! Every fallible operation that fails leaves the cursor, the alignment
//! origin and the stored endianness exactly as they were before the call.
//! Bytes a failed composite operation already wrote are not cleared. After
//! a failure the caller decides whether to continue, [`Cdr::set_state`] to an
//! earlier snapshot, or [`Cdr::reset`].

use tracing::{debug, trace};

use super::buffer::FastBuffer;
use super::cursor::CdrState;
use super::encapsulation::{CdrType, DdsCdrPlFlag};
use super::endian::Endianness;
use crate::core::{CdrConfig, CodecError, Result};

/// CDR encoder/decoder bound to one buffer.
///
/// The buffer must outlive the codec; the codec never owns it. Dropping the
/// codec leaves the buffer and its content intact.
///
/// # Example
///
/// ```
/// use cdrcodec::{Cdr, CdrType, Endianness, FastBuffer};
///
/// # fn main() -> cdrcodec::Result<()> {
/// let mut buffer = FastBuffer::new();
/// let mut cdr = Cdr::new(&mut buffer, Endianness::Little, CdrType::DdsCdr);
/// cdr.serialize_encapsulation()?;
/// cdr.serialize(42u32)?.serialize_string("hello")?;
/// assert_eq!(cdr.serialized_data_length(), 4 + 4 + 4 + 6);
///
/// cdr.reset();
/// cdr.read_encapsulation()?;
/// assert_eq!(cdr.deserialize::<u32>()?, 42);
/// assert_eq!(cdr.deserialize_string()?, "hello");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Cdr<'b, 'a> {
    buffer: &'b mut FastBuffer<'a>,
    state: CdrState,
    cdr_type: CdrType,
    pl_flag: DdsCdrPlFlag,
    options: u16,
}

impl<'b, 'a> Cdr<'b, 'a> {
    /// Create a codec at the start of `buffer`.
    pub fn new(buffer: &'b mut FastBuffer<'a>, endianness: Endianness, cdr_type: CdrType) -> Self {
        Self {
            buffer,
            state: CdrState::new(endianness),
            cdr_type,
            pl_flag: DdsCdrPlFlag::default(),
            options: 0,
        }
    }

    /// Create a codec configured from `config`.
    pub fn from_config(buffer: &'b mut FastBuffer<'a>, config: &CdrConfig) -> Self {
        let mut cdr = Self::new(buffer, config.endianness(), config.cdr_type);
        cdr.pl_flag = DdsCdrPlFlag::from(config.parameter_list);
        cdr.options = config.options;
        cdr
    }

    /// CDR flavor.
    #[inline]
    pub fn cdr_type(&self) -> CdrType {
        self.cdr_type
    }

    /// Parameter-list flag used by DDS_CDR headers.
    #[inline]
    pub fn dds_cdr_pl_flag(&self) -> DdsCdrPlFlag {
        self.pl_flag
    }

    /// Set the parameter-list flag written by [`Cdr::serialize_encapsulation`].
    #[inline]
    pub fn set_dds_cdr_pl_flag(&mut self, flag: DdsCdrPlFlag) {
        self.pl_flag = flag;
    }

    /// Options field of DDS_CDR headers.
    #[inline]
    pub fn dds_cdr_options(&self) -> u16 {
        self.options
    }

    /// Set the options written by [`Cdr::serialize_encapsulation`].
    #[inline]
    pub fn set_dds_cdr_options(&mut self, options: u16) {
        self.options = options;
    }

    /// Stored endianness used by calls without an explicit override.
    #[inline]
    pub fn endianness(&self) -> Endianness {
        self.state.endianness
    }

    /// Change the stored endianness for all subsequent default-mode calls.
    pub fn change_endianness(&mut self, endianness: Endianness) {
        if self.state.endianness != endianness {
            debug!(
                from = self.state.endianness.as_str(),
                to = endianness.as_str(),
                position = self.state.offset,
                "changed CDR endianness"
            );
            self.state.endianness = endianness;
        }
    }

    /// Run `f` with a temporary stored endianness.
    ///
    /// The previous endianness is restored afterwards whether `f` succeeds
    /// or fails.
    pub fn with_endianness<T>(
        &mut self,
        endianness: Endianness,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let stored = self.state.endianness;
        self.state.endianness = endianness;
        let result = f(self);
        self.state.endianness = stored;
        result
    }

    /// Snapshot of the cursor, alignment origin and endianness.
    #[inline]
    pub fn state(&self) -> CdrState {
        self.state
    }

    /// Restore a snapshot taken with [`Cdr::state`].
    #[inline]
    pub fn set_state(&mut self, state: CdrState) {
        self.state = state;
    }

    /// Rewind the cursor and alignment origin to the buffer start.
    ///
    /// The stored endianness is kept, so one buffer can be written and then
    /// read back with the same codec.
    pub fn reset(&mut self) {
        trace!(position = self.state.offset, "reset CDR cursor");
        self.state.offset = 0;
        self.state.origin = 0;
    }

    /// Advance the cursor by `num_bytes` without touching them.
    ///
    /// An owned buffer grows if needed; a fixed buffer fails with
    /// `NotEnoughMemory` when the jump would leave its storage.
    pub fn jump(&mut self, num_bytes: usize) -> Result<()> {
        let end = self.end_of(num_bytes)?;
        self.buffer.ensure_capacity(end, self.state.offset)?;
        self.buffer.mark_written(end);
        self.state.offset = end;
        Ok(())
    }

    /// Skip `num_bytes` of padding without writing them.
    ///
    /// Used when the padding before a value is accounted for separately, for
    /// example when space for a header is reserved and filled in later.
    /// Behaves exactly like [`Cdr::jump`]: the cursor moves and the alignment
    /// origin stays put.
    pub fn move_alignment_forward(&mut self, num_bytes: usize) -> Result<()> {
        self.jump(num_bytes)
    }

    /// Make the current position the alignment origin.
    #[inline]
    pub fn reset_alignment(&mut self) {
        self.state.origin = self.state.offset;
    }

    /// Current position from the buffer start.
    #[inline]
    pub fn position(&self) -> usize {
        self.state.offset
    }

    /// Bytes between the buffer start and the cursor.
    #[inline]
    pub fn serialized_data_length(&self) -> usize {
        self.state.offset
    }

    /// Bytes between the buffer start and the cursor.
    pub fn serialized_data(&self) -> &[u8] {
        let content = self.buffer.as_slice();
        &content[..self.state.offset.min(content.len())]
    }

    /// Whole logical content of the underlying buffer.
    #[inline]
    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buffer.size().saturating_sub(self.state.offset)
    }

    /// Run `f`, restoring the state if it fails.
    pub(crate) fn rollback_on_error<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let saved = self.state;
        let result = f(self);
        if result.is_err() {
            self.state = saved;
        }
        result
    }

    /// Align for a write of `len` bytes and return the destination.
    ///
    /// Padding bytes are zeroed. Nothing changes if the buffer cannot hold
    /// the padding plus `len` bytes.
    pub(crate) fn write_region(&mut self, align: usize, len: usize) -> Result<&mut [u8]> {
        let offset = self.state.offset;
        let start = self.end_of(self.state.padding(align))?;
        let end = start
            .checked_add(len)
            .ok_or_else(|| CodecError::unknown("write extends past addressable memory"))?;
        self.buffer.ensure_capacity(end, offset)?;
        self.buffer.mark_written(end);
        self.state.offset = end;

        let storage = self.buffer.storage_mut();
        storage[offset..start].fill(0);
        Ok(&mut storage[start..end])
    }

    /// Align for a read of `len` bytes and return the source.
    ///
    /// Nothing changes if fewer than padding plus `len` bytes remain.
    pub(crate) fn read_region(&mut self, align: usize, len: usize) -> Result<&[u8]> {
        let offset = self.state.offset;
        let padding = self.state.padding(align);
        let needed = padding.saturating_add(len);
        if needed > self.remaining() {
            return Err(CodecError::not_enough_memory(
                needed,
                self.remaining(),
                offset,
            ));
        }
        let start = offset + padding;
        self.state.offset = start + len;
        Ok(&self.buffer.as_slice()[start..start + len])
    }

    fn end_of(&self, num_bytes: usize) -> Result<usize> {
        self.state
            .offset
            .checked_add(num_bytes)
            .ok_or_else(|| CodecError::unknown("cursor moved past addressable memory"))
    }
}
