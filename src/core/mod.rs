// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout cdrcodec.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] / [`ErrorKind`] - error taxonomy shared by every operation
//! - [`CdrConfig`] - codec configuration, loadable from TOML

pub mod config;
pub mod error;

pub use config::{CdrConfig, EndiannessSetting, DEFAULT_INITIAL_CAPACITY};
pub use error::{CodecError, ErrorKind, Result};
