// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for cdrcodec.
//!
//! Every fallible codec operation reports exactly one of three kinds:
//! - [`ErrorKind::NotEnoughMemory`] - buffer exhausted, fixed buffer cannot grow,
//!   or not enough bytes left to decode
//! - [`ErrorKind::BadParameter`] - invalid enumerator, malformed encapsulation,
//!   invalid value on the wire
//! - [`ErrorKind::Unknown`] - anything else surfaced by the storage layer

use thiserror::Error;

/// The closed taxonomy of codec failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Capacity exhausted or not enough bytes remain.
    NotEnoughMemory,
    /// Invalid argument or wire value.
    BadParameter,
    /// Any other failure.
    Unknown,
}

impl ErrorKind {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotEnoughMemory => "not-enough-memory",
            ErrorKind::BadParameter => "bad-parameter",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while encoding or decoding CDR data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Not enough room in the buffer (writes) or not enough data (reads).
    #[error(
        "Not enough memory: requested {requested} bytes at position {position}, but only {available} bytes available"
    )]
    NotEnoughMemory {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when error occurred
        position: usize,
    },

    /// A parameter or a value read from the wire is invalid.
    #[error("Bad parameter in {context}: {message}")]
    BadParameter {
        /// Operation that rejected the value
        context: String,
        /// Error message
        message: String,
    },

    /// Other error
    #[error("Unknown error: {message}")]
    Unknown {
        /// Error message
        message: String,
    },
}

impl CodecError {
    /// Create a not-enough-memory error.
    pub fn not_enough_memory(requested: usize, available: usize, position: usize) -> Self {
        CodecError::NotEnoughMemory {
            requested,
            available,
            position,
        }
    }

    /// Create a bad-parameter error.
    pub fn bad_parameter(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::BadParameter {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an unknown error.
    pub fn unknown(message: impl Into<String>) -> Self {
        CodecError::Unknown {
            message: message.into(),
        }
    }

    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::NotEnoughMemory { .. } => ErrorKind::NotEnoughMemory,
            CodecError::BadParameter { .. } => ErrorKind::BadParameter,
            CodecError::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Human-readable message (same as `Display`).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("kind", self.kind().to_string())];
        match self {
            CodecError::NotEnoughMemory {
                requested,
                available,
                position,
            } => {
                fields.push(("requested", requested.to_string()));
                fields.push(("available", available.to_string()));
                fields.push(("position", position.to_string()));
            }
            CodecError::BadParameter { context, message } => {
                fields.push(("context", context.clone()));
                fields.push(("message", message.clone()));
            }
            CodecError::Unknown { message } => fields.push(("message", message.clone())),
        }
        fields
    }
}

impl From<std::collections::TryReserveError> for CodecError {
    fn from(err: std::collections::TryReserveError) -> Self {
        CodecError::unknown(format!("allocation failed: {err}"))
    }
}

/// Result type for cdrcodec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
