//! Closed enumerations for the byte-level identifiers used in calculator files.
//!
//! Every enum has a `from_byte` lookup returning `Option` and a `validate`
//! wrapper that turns an out-of-set value into a [`TiError::InvalidFormat`].

use std::fmt;

use serde::Serialize;

use crate::error::{Result, TiError};

/// Target calculator series of a variable file.
///
/// | Series   | Signature  | Entry header |
/// |----------|------------|--------------|
/// | TI-83    | `**TI83**` | 11 bytes     |
/// | TI-83 Plus | `**TI83F*` | 13 bytes   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Series {
    /// Legacy header format without version or archive metadata.
    Ti83,
    /// Enhanced header format carrying version and archive flag.
    #[default]
    Ti83Plus,
}

impl Series {
    /// All known series, in signature lookup order.
    pub const ALL: [Series; 2] = [Series::Ti83, Series::Ti83Plus];

    /// The 8-byte file signature.
    #[must_use]
    pub const fn signature(self) -> &'static [u8; 8] {
        match self {
            Self::Ti83 => b"**TI83**",
            Self::Ti83Plus => b"**TI83F*",
        }
    }

    /// Value of the entry `header_length` field for this series.
    #[must_use]
    pub const fn entry_header_length(self) -> u16 {
        match self {
            Self::Ti83 => 11,
            Self::Ti83Plus => 13,
        }
    }

    /// Whether entries carry the version and archived bytes.
    #[must_use]
    pub const fn is_enhanced(self) -> bool {
        matches!(self, Self::Ti83Plus)
    }

    /// Look up a series by its 8-byte signature.
    #[must_use]
    pub fn from_signature(signature: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|series| series.signature().as_slice() == signature)
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ti83 => write!(f, "TI-83"),
            Self::Ti83Plus => write!(f, "TI-83 Plus"),
        }
    }
}

/// Family of a variable, independent of real/complex or locked/editable flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VariableKind {
    Number,
    List,
    Matrix,
    Picture,
    Program,
    AppVar,
}

impl VariableKind {
    /// Human-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::List => "List",
            Self::Matrix => "Matrix",
            Self::Picture => "Picture",
            Self::Program => "Program",
            Self::AppVar => "AppVar",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry type tag identifying the payload layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum TypeTag {
    Real = 0x00,
    RealList = 0x01,
    Matrix = 0x02,
    Program = 0x05,
    ProtectedProgram = 0x06,
    Picture = 0x07,
    Complex = 0x0C,
    ComplexList = 0x0D,
    AppVar = 0x15,
}

impl TypeTag {
    /// The on-disk byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Look up a tag by byte value.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Real),
            0x01 => Some(Self::RealList),
            0x02 => Some(Self::Matrix),
            0x05 => Some(Self::Program),
            0x06 => Some(Self::ProtectedProgram),
            0x07 => Some(Self::Picture),
            0x0C => Some(Self::Complex),
            0x0D => Some(Self::ComplexList),
            0x15 => Some(Self::AppVar),
            _ => None,
        }
    }

    /// Look up a tag, rejecting unknown bytes.
    pub fn validate(byte: u8) -> Result<Self> {
        Self::from_byte(byte)
            .ok_or_else(|| TiError::invalid_format(format!("unknown type tag 0x{byte:02X}")))
    }

    /// The variable family this tag belongs to.
    #[must_use]
    pub const fn kind(self) -> VariableKind {
        match self {
            Self::Real | Self::Complex => VariableKind::Number,
            Self::RealList | Self::ComplexList => VariableKind::List,
            Self::Matrix => VariableKind::Matrix,
            Self::Program | Self::ProtectedProgram => VariableKind::Program,
            Self::Picture => VariableKind::Picture,
            Self::AppVar => VariableKind::AppVar,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Real => "Real",
            Self::RealList => "Real list",
            Self::Matrix => "Matrix",
            Self::Program => "Program",
            Self::ProtectedProgram => "Protected program",
            Self::Picture => "Picture",
            Self::Complex => "Complex",
            Self::ComplexList => "Complex list",
            Self::AppVar => "AppVar",
        };
        f.write_str(label)
    }
}

/// Target series byte of a flash application file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[repr(u8)]
pub enum FlashSeries {
    Ti73 = 0x74,
    #[default]
    Ti83Plus = 0x73,
    Ti89 = 0x98,
    Ti92Plus = 0x88,
}

impl FlashSeries {
    /// The on-disk byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Look up a series by byte value.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x74 => Some(Self::Ti73),
            0x73 => Some(Self::Ti83Plus),
            0x98 => Some(Self::Ti89),
            0x88 => Some(Self::Ti92Plus),
            _ => None,
        }
    }

    /// Look up a series, rejecting unknown bytes.
    pub fn validate(byte: u8) -> Result<Self> {
        Self::from_byte(byte)
            .ok_or_else(|| TiError::invalid_format(format!("unknown flash series 0x{byte:02X}")))
    }
}

impl fmt::Display for FlashSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ti73 => write!(f, "TI-73"),
            Self::Ti83Plus => write!(f, "TI-83 Plus"),
            Self::Ti89 => write!(f, "TI-89"),
            Self::Ti92Plus => write!(f, "TI-92 Plus"),
        }
    }
}

/// Intel-hex record type used in flash application contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum RecordType {
    Data = 0x00,
    End = 0x01,
    Page = 0x02,
}

impl RecordType {
    /// The on-disk byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Look up a record type by byte value.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Data),
            0x01 => Some(Self::End),
            0x02 => Some(Self::Page),
            _ => None,
        }
    }

    /// Look up a record type, rejecting unknown bytes.
    pub fn validate(byte: u8) -> Result<Self> {
        Self::from_byte(byte)
            .ok_or_else(|| TiError::invalid_format(format!("unknown hex record type 0x{byte:02X}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_series_signature_lookup() {
        assert_eq!(Series::from_signature(b"**TI83**"), Some(Series::Ti83));
        assert_eq!(Series::from_signature(b"**TI83F*"), Some(Series::Ti83Plus));
        assert_eq!(Series::from_signature(b"**TI82**"), None);
        assert_eq!(Series::Ti83.entry_header_length(), 11);
        assert_eq!(Series::Ti83Plus.entry_header_length(), 13);
    }

    #[test]
    fn test_type_tag_lookup() {
        for byte in 0u8..=0xFF {
            if let Some(tag) = TypeTag::from_byte(byte) {
                assert_eq!(tag.as_byte(), byte);
            }
        }
        assert_eq!(TypeTag::from_byte(0x0D), Some(TypeTag::ComplexList));
        assert_eq!(TypeTag::ComplexList.kind(), VariableKind::List);
        assert_eq!(TypeTag::ProtectedProgram.kind(), VariableKind::Program);
    }

    #[test]
    fn test_validate_rejects_unknown() {
        let err = TypeTag::validate(0x03).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(FlashSeries::validate(0x00).is_err());
        assert!(RecordType::validate(0x04).is_err());
        assert_eq!(RecordType::validate(0x02).unwrap(), RecordType::Page);
    }
}
