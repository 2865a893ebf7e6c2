// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use cdrcodec::{Cdr, CdrDeserialize, CdrSerialize, CdrType, Endianness, FastBuffer, Result};

// ============================================================================
// Sample Records
// ============================================================================

/// Base record: `struct Stamp { int32 sec; uint32 nanosec; }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stamp {
    pub sec: i32,
    pub nanosec: u32,
}

/// Record extending [`Stamp`] with its own members.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    pub stamp: Stamp,
    pub frame_id: String,
    pub valid: bool,
    pub value: f64,
    pub samples: Vec<i16>,
    pub covariance: [f32; 4],
    pub labels: BTreeMap<u16, String>,
}

impl CdrSerialize for Stamp {
    fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
        cdr.serialize(self.sec)?.serialize(self.nanosec)?;
        Ok(())
    }
}

impl CdrDeserialize for Stamp {
    fn deserialize(cdr: &mut Cdr<'_, '_>) -> Result<Self> {
        Ok(Self {
            sec: cdr.deserialize()?,
            nanosec: cdr.deserialize()?,
        })
    }
}

impl CdrSerialize for Reading {
    fn serialize(&self, cdr: &mut Cdr<'_, '_>) -> Result<()> {
        self.stamp.serialize(cdr)?;
        cdr.serialize_string(&self.frame_id)?
            .serialize(self.valid)?
            .serialize(self.value)?
            .serialize_sequence(&self.samples)?
            .serialize_fixed_sequence(&self.covariance)?
            .serialize_map(&self.labels)?;
        Ok(())
    }
}

impl CdrDeserialize for Reading {
    fn deserialize(cdr: &mut Cdr<'_, '_>) -> Result<Self> {
        Ok(Self {
            stamp: Stamp::deserialize(cdr)?,
            frame_id: cdr.deserialize_string()?,
            valid: cdr.deserialize()?,
            value: cdr.deserialize()?,
            samples: cdr.deserialize_sequence()?,
            covariance: cdr.deserialize_fixed_sequence()?,
            labels: cdr.deserialize_map()?,
        })
    }
}

/// A populated [`Reading`].
pub fn sample_reading() -> Reading {
    let mut labels = BTreeMap::new();
    labels.insert(1, "left".to_string());
    labels.insert(2, "right".to_string());
    Reading {
        stamp: Stamp {
            sec: -3,
            nanosec: 500,
        },
        frame_id: "base_link".to_string(),
        valid: true,
        value: 2.5,
        samples: vec![1, -2, 3],
        covariance: [0.5, 0.0, 0.0, 0.5],
        labels,
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Serialize with `f` into a fresh owned buffer and return the bytes.
pub fn encode_with(
    endianness: Endianness,
    cdr_type: CdrType,
    f: impl FnOnce(&mut Cdr<'_, '_>) -> Result<()>,
) -> Vec<u8> {
    let mut buffer = FastBuffer::new();
    let mut cdr = Cdr::new(&mut buffer, endianness, cdr_type);
    f(&mut cdr).expect("encode");
    let len = cdr.serialized_data_length();
    let mut data = buffer.into_vec().expect("owned buffer");
    data.truncate(len);
    data
}

/// Deserialize `data` with `f` from a fresh codec.
pub fn decode_with<T>(
    data: &[u8],
    endianness: Endianness,
    cdr_type: CdrType,
    f: impl FnOnce(&mut Cdr<'_, '_>) -> Result<T>,
) -> T {
    let mut buffer = FastBuffer::from_vec(data.to_vec());
    let mut cdr = Cdr::new(&mut buffer, endianness, cdr_type);
    f(&mut cdr).expect("decode")
}

/// Both byte orders.
pub const BOTH_ENDIANNESSES: [Endianness; 2] = [Endianness::Big, Endianness::Little];
