//! Variable names in the device character set.
//!
//! Names are stored as the raw bytes found in the entry header. Readable
//! names (`L1`, `[A]`, `Pic3`, `theta`) are parsed and rendered per
//! [`VariableKind`].

use std::fmt;

use crate::error::{Result, TiError};

use super::VariableKind;

/// Width of the NUL-padded name field in an entry header.
pub const NAME_LENGTH: usize = 8;

/// Token byte for the Greek letter theta.
pub const THETA: u8 = b'[';

/// Leading token byte of list names.
pub const LIST_TOKEN: u8 = 0x5D;

/// Leading token byte of matrix names.
pub const MATRIX_TOKEN: u8 = 0x5C;

/// Leading token byte of picture names.
pub const PICTURE_TOKEN: u8 = 0x60;

/// Longest custom list name after the `|L` prefix.
const CUSTOM_LIST_LENGTH: usize = 5;

/// A variable name as stored on the device (1 to 8 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarName(Vec<u8>);

impl VarName {
    /// Build a name from raw header bytes, dropping trailing NUL padding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let end = bytes
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);
        let trimmed = &bytes[..end];
        if trimmed.is_empty() {
            return Err(TiError::validation("name", "name must not be empty"));
        }
        if trimmed.len() > NAME_LENGTH {
            return Err(TiError::validation(
                "name",
                format!("name is {} bytes, limit is {NAME_LENGTH}", trimmed.len()),
            ));
        }
        Ok(Self(trimmed.to_vec()))
    }

    /// Parse a readable name using the naming rules of `kind`.
    pub fn parse(kind: VariableKind, text: &str) -> Result<Self> {
        let bytes = match kind {
            VariableKind::Number => parse_number_name(text),
            VariableKind::List => parse_list_name(text),
            VariableKind::Matrix => parse_matrix_name(text),
            VariableKind::Picture => parse_picture_name(text),
            VariableKind::Program => parse_program_name(text),
            VariableKind::AppVar => parse_appvar_name(text),
        };
        let bytes = bytes.ok_or_else(|| {
            TiError::validation("name", format!("{text:?} is not a valid {kind} name"))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Raw name bytes without padding.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Name field as written to an entry header.
    #[must_use]
    pub fn to_padded(&self) -> [u8; NAME_LENGTH] {
        let mut out = [0u8; NAME_LENGTH];
        out[..self.0.len()].copy_from_slice(&self.0);
        out
    }

    /// Whether the raw bytes follow the naming rules of `kind`.
    #[must_use]
    pub fn is_valid_for(&self, kind: VariableKind) -> bool {
        Self::parse(kind, &self.display(kind)).is_ok_and(|parsed| parsed == *self)
    }

    /// Render the name the way the device shows it for `kind`.
    #[must_use]
    pub fn display(&self, kind: VariableKind) -> String {
        let bytes = self.0.as_slice();
        match (kind, bytes) {
            (VariableKind::List, [LIST_TOKEN, index]) if *index < 6 => {
                format!("L{}", index + 1)
            }
            (VariableKind::List, [LIST_TOKEN, rest @ ..]) if !rest.is_empty() => {
                format!("|L{}", expand_theta(rest))
            }
            (VariableKind::Matrix, [MATRIX_TOKEN, index]) if *index < 10 => {
                format!("[{}]", char::from(b'A' + index))
            }
            (VariableKind::Picture, [PICTURE_TOKEN, 9]) => "Pic0".to_string(),
            (VariableKind::Picture, [PICTURE_TOKEN, index]) if *index < 9 => {
                format!("Pic{}", index + 1)
            }
            (VariableKind::Number | VariableKind::Program, _) => expand_theta(bytes),
            _ => raw_display(bytes),
        }
    }
}

impl fmt::Display for VarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&raw_display(&self.0))
    }
}

fn parse_number_name(text: &str) -> Option<Vec<u8>> {
    let bytes = collapse_theta(text);
    match bytes.as_slice() {
        [b] if is_letter(*b) => Some(bytes),
        _ => None,
    }
}

fn parse_list_name(text: &str) -> Option<Vec<u8>> {
    if let Some(digit) = text.strip_prefix('L') {
        return match digit.as_bytes() {
            [d @ b'1'..=b'6'] => Some(vec![LIST_TOKEN, d - b'1']),
            _ => None,
        };
    }
    let custom = collapse_theta(text.strip_prefix("|L")?);
    if custom.is_empty() || custom.len() > CUSTOM_LIST_LENGTH || !is_identifier(&custom) {
        return None;
    }
    let mut out = vec![LIST_TOKEN];
    out.extend_from_slice(&custom);
    Some(out)
}

fn parse_matrix_name(text: &str) -> Option<Vec<u8>> {
    match text.as_bytes() {
        [b'[', letter @ b'A'..=b'J', b']'] => Some(vec![MATRIX_TOKEN, letter - b'A']),
        _ => None,
    }
}

fn parse_picture_name(text: &str) -> Option<Vec<u8>> {
    match text.strip_prefix("Pic")?.as_bytes() {
        [b'0'] => Some(vec![PICTURE_TOKEN, 9]),
        [d @ b'1'..=b'9'] => Some(vec![PICTURE_TOKEN, d - b'1']),
        _ => None,
    }
}

fn parse_program_name(text: &str) -> Option<Vec<u8>> {
    let bytes = collapse_theta(text);
    (bytes.len() <= NAME_LENGTH && is_identifier(&bytes)).then_some(bytes)
}

fn parse_appvar_name(text: &str) -> Option<Vec<u8>> {
    let valid = !text.is_empty()
        && text.len() <= NAME_LENGTH
        && text.bytes().all(|b| b.is_ascii_graphic() || b == b' ');
    valid.then(|| text.as_bytes().to_vec())
}

fn is_letter(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte == THETA
}

/// A letter or theta followed by letters, digits or theta.
fn is_identifier(bytes: &[u8]) -> bool {
    match bytes.split_first() {
        Some((first, rest)) => {
            is_letter(*first) && rest.iter().all(|&b| is_letter(b) || b.is_ascii_digit())
        }
        None => false,
    }
}

fn collapse_theta(text: &str) -> Vec<u8> {
    text.replace("theta", "[").into_bytes()
}

fn expand_theta(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b == THETA {
                "theta".to_string()
            } else {
                raw_display(&[b])
            }
        })
        .collect()
}

fn raw_display(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                char::from(b).to_string()
            } else {
                format!("\\x{b:02X}")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_trims_padding() {
        let name = VarName::from_bytes(b"A\0\0\0\0\0\0\0").unwrap();
        assert_eq!(name.as_bytes(), b"A");
        assert_eq!(&name.to_padded(), b"A\0\0\0\0\0\0\0");
        assert!(VarName::from_bytes(&[0; 8]).is_err());
        assert!(VarName::from_bytes(b"TOOLONGNAME").is_err());
    }

    #[test]
    fn test_number_names() {
        assert_eq!(VarName::parse(VariableKind::Number, "A").unwrap().as_bytes(), b"A");
        let theta = VarName::parse(VariableKind::Number, "theta").unwrap();
        assert_eq!(theta.as_bytes(), b"[");
        assert_eq!(theta.display(VariableKind::Number), "theta");
        assert!(VarName::parse(VariableKind::Number, "a").is_err());
        assert!(VarName::parse(VariableKind::Number, "AB").is_err());
    }

    #[test]
    fn test_list_names() {
        let l1 = VarName::parse(VariableKind::List, "L1").unwrap();
        assert_eq!(l1.as_bytes(), &[LIST_TOKEN, 0]);
        assert_eq!(l1.display(VariableKind::List), "L1");

        let custom = VarName::parse(VariableKind::List, "|LABCDE").unwrap();
        assert_eq!(custom.as_bytes(), &[LIST_TOKEN, b'A', b'B', b'C', b'D', b'E']);
        assert_eq!(custom.display(VariableKind::List), "|LABCDE");

        let theta = VarName::parse(VariableKind::List, "|Ltheta2").unwrap();
        assert_eq!(theta.display(VariableKind::List), "|Ltheta2");

        assert!(VarName::parse(VariableKind::List, "L7").is_err());
        assert!(VarName::parse(VariableKind::List, "|LABCDEF").is_err());
        assert!(VarName::parse(VariableKind::List, "|L1AB").is_err());
    }

    #[test]
    fn test_matrix_and_picture_names() {
        let matrix = VarName::parse(VariableKind::Matrix, "[J]").unwrap();
        assert_eq!(matrix.as_bytes(), &[MATRIX_TOKEN, 9]);
        assert_eq!(matrix.display(VariableKind::Matrix), "[J]");
        assert!(VarName::parse(VariableKind::Matrix, "[K]").is_err());

        let pic0 = VarName::parse(VariableKind::Picture, "Pic0").unwrap();
        assert_eq!(pic0.as_bytes(), &[PICTURE_TOKEN, 9]);
        assert_eq!(pic0.display(VariableKind::Picture), "Pic0");
        let pic3 = VarName::parse(VariableKind::Picture, "Pic3").unwrap();
        assert_eq!(pic3.display(VariableKind::Picture), "Pic3");
    }

    #[test]
    fn test_program_and_appvar_names() {
        let program = VarName::parse(VariableKind::Program, "PRGMtheta1").unwrap();
        assert_eq!(program.as_bytes(), b"PRGM[1");
        assert!(VarName::parse(VariableKind::Program, "1ABC").is_err());
        assert!(VarName::parse(VariableKind::Program, "ABCDEFGHI").is_err());

        assert!(VarName::parse(VariableKind::AppVar, "save dat").is_ok());
        assert!(VarName::parse(VariableKind::AppVar, "").is_err());
        assert!(VarName::parse(VariableKind::AppVar, "NINECHARS").is_err());
    }

    #[test]
    fn test_is_valid_for() {
        let l1 = VarName::from_bytes(&[LIST_TOKEN, 0]).unwrap();
        assert!(l1.is_valid_for(VariableKind::List));
        assert!(!l1.is_valid_for(VariableKind::Number));
        assert_eq!(l1.to_string(), "]\\x00");
    }
}
