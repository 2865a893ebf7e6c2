// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Codec configuration.
//!
//! A [`CdrConfig`] describes how a codec should be set up: byte order, CDR
//! flavor, DDS header fields and the initial buffer size. It can be built in
//! code or loaded from TOML:
//!
//! ```
//! use cdrcodec::{CdrConfig, CdrType, Endianness};
//!
//! let config = CdrConfig::from_toml_str(
//!     r#"
//!     endianness = "big"
//!     cdr_type = "dds"
//!     parameter_list = true
//!     options = 4660
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.endianness(), Endianness::Big);
//! assert_eq!(config.cdr_type, CdrType::DdsCdr);
//! assert_eq!(config.options, 0x1234);
//! ```

use serde::{Deserialize, Serialize};

use super::error::{CodecError, Result};
use crate::encoding::cdr::{CdrType, Endianness};

/// Default initial capacity for owned buffers built from a config.
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Byte order choice, with the host order as an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndiannessSetting {
    /// Big endian.
    Big,
    /// Little endian.
    Little,
    /// Whatever the host uses.
    #[default]
    Native,
}

impl EndiannessSetting {
    /// Resolve to a concrete byte order.
    pub fn resolve(self) -> Endianness {
        match self {
            EndiannessSetting::Big => Endianness::Big,
            EndiannessSetting::Little => Endianness::Little,
            EndiannessSetting::Native => Endianness::native(),
        }
    }
}

impl From<Endianness> for EndiannessSetting {
    fn from(value: Endianness) -> Self {
        match value {
            Endianness::Big => EndiannessSetting::Big,
            Endianness::Little => EndiannessSetting::Little,
        }
    }
}

/// Settings for a buffer and codec pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CdrConfig {
    /// Stored endianness of the codec.
    pub endianness: EndiannessSetting,
    /// CDR flavor.
    pub cdr_type: CdrType,
    /// Whether DDS_CDR headers carry the parameter-list flag.
    pub parameter_list: bool,
    /// DDS_CDR options field.
    pub options: u16,
    /// Initial capacity of an owned buffer.
    pub initial_capacity: usize,
}

impl Default for CdrConfig {
    fn default() -> Self {
        Self {
            endianness: EndiannessSetting::Native,
            cdr_type: CdrType::DdsCdr,
            parameter_list: false,
            options: 0,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl CdrConfig {
    /// Parse a TOML document.
    ///
    /// Missing keys take their defaults; unknown keys and bad values are
    /// `BadParameter` errors.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| CodecError::bad_parameter("CdrConfig", e.to_string()))
    }

    /// Render as a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| CodecError::unknown(e.to_string()))
    }

    /// Concrete endianness for the codec.
    pub fn endianness(&self) -> Endianness {
        self.endianness.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;

    #[test]
    fn test_empty_document_is_default() {
        let config = CdrConfig::from_toml_str("").unwrap();
        assert_eq!(config, CdrConfig::default());
        assert_eq!(config.endianness(), Endianness::native());
    }

    #[test]
    fn test_corba_little() {
        let config = CdrConfig::from_toml_str(
            r#"
            endianness = "little"
            cdr_type = "corba"
            initial_capacity = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.endianness(), Endianness::Little);
        assert_eq!(config.cdr_type, CdrType::CorbaCdr);
        assert_eq!(config.initial_capacity, 8);
        assert!(!config.parameter_list);
    }

    #[test]
    fn test_invalid_values_are_bad_parameter() {
        let err = CdrConfig::from_toml_str("cdr_type = \"xcdr2\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadParameter);

        let err = CdrConfig::from_toml_str("options = 70000").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadParameter);

        let err = CdrConfig::from_toml_str("compression = true").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadParameter);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CdrConfig {
            endianness: EndiannessSetting::Big,
            cdr_type: CdrType::CorbaCdr,
            parameter_list: true,
            options: 7,
            initial_capacity: 64,
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(CdrConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_setting_from_endianness() {
        assert_eq!(EndiannessSetting::from(Endianness::Big).resolve(), Endianness::Big);
        assert_eq!(
            EndiannessSetting::from(Endianness::Little).resolve(),
            Endianness::Little
        );
    }
}
