//! Variant payload codecs.
//!
//! Each variable kind has its own payload layout inside an entry. The
//! functions here are the single dispatch point between a type tag and the
//! codec for that layout:
//!
//! | Type tag            | Layout                                          |
//! |---------------------|-------------------------------------------------|
//! | Real / Complex      | one 9 or 18 byte number                         |
//! | RealList / ComplexList | `u16` count + 9 or 18 byte elements          |
//! | Matrix              | `u8` columns, `u8` rows + 9 byte reals          |
//! | Picture             | `u16` byte length + bit-packed pixels           |
//! | Program / AppVar    | `u16` length + raw bytes                        |
//!
//! Unrecognized tags decode to [`UnknownVariable`] carrying the raw payload.

mod blob;
mod list;
mod matrix;
mod number;
mod picture;

use crate::error::{Result, TiError};
use crate::types::{AppVar, Program, TypeTag, UnknownVariable, VariableValue};

/// Encode a value to its payload bytes.
///
/// # Errors
///
/// Fails when the value cannot be exported: an empty list or matrix, a
/// number outside the representable range, or a length that overflows its
/// field.
pub fn encode_payload(value: &VariableValue) -> Result<Vec<u8>> {
    match value {
        VariableValue::Number(number) => number::encode(number),
        VariableValue::List(list) => list::encode(list),
        VariableValue::Matrix(matrix) => matrix::encode(matrix),
        VariableValue::Picture(picture) => picture::encode(picture),
        VariableValue::AppVar(appvar) => blob::encode(&appvar.data),
        VariableValue::Program(program) => blob::encode(&program.tokens),
        VariableValue::Unknown(unknown) => Ok(unknown.data.clone()),
    }
}

/// Decode the payload of an entry with type tag `type_byte`.
///
/// # Errors
///
/// Fails with a bounds error when the payload is shorter than its
/// structural minimum or a declared count overruns it.
pub fn decode_payload(type_byte: u8, data: &[u8]) -> Result<VariableValue> {
    let Some(tag) = TypeTag::from_byte(type_byte) else {
        tracing::warn!(
            type_tag = format_args!("0x{type_byte:02X}"),
            bytes = data.len(),
            "preserving entry with unknown type tag"
        );
        return Ok(VariableValue::Unknown(UnknownVariable {
            type_tag: type_byte,
            data: data.to_vec(),
        }));
    };

    let value = match tag {
        TypeTag::Real | TypeTag::Complex => VariableValue::Number(number::decode(tag, data)?),
        TypeTag::RealList | TypeTag::ComplexList => VariableValue::List(list::decode(tag, data)?),
        TypeTag::Matrix => VariableValue::Matrix(matrix::decode(data)?),
        TypeTag::Picture => VariableValue::Picture(picture::decode(data)?),
        TypeTag::AppVar => VariableValue::AppVar(AppVar::new(blob::decode("appvar", data)?)),
        TypeTag::Program | TypeTag::ProtectedProgram => VariableValue::Program(Program {
            tokens: blob::decode("program", data)?,
            locked: tag == TypeTag::ProtectedProgram,
        }),
    };
    Ok(value)
}

/// Read the little-endian `u16` at the start of a payload.
fn read_u16_prefix(context: &'static str, data: &[u8]) -> Result<u16> {
    match data {
        [lo, hi, ..] => Ok(u16::from_le_bytes([*lo, *hi])),
        _ => Err(TiError::out_of_bounds(context, 0, 2, data.len())),
    }
}

/// Take `needed` bytes starting at `offset`, or fail with a bounds error.
fn take<'a>(
    context: &'static str,
    data: &'a [u8],
    offset: usize,
    needed: usize,
) -> Result<&'a [u8]> {
    offset
        .checked_add(needed)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| {
            TiError::out_of_bounds(context, offset, needed, data.len().saturating_sub(offset))
        })
}

/// Encode a length as the `u16` prefix of a payload.
fn length_prefix(field: &'static str, len: usize) -> Result<[u8; 2]> {
    u16::try_from(len)
        .map(u16::to_le_bytes)
        .map_err(|_| TiError::validation(field, format!("length {len} exceeds {}", u16::MAX)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{ListVariable, Matrix, Number, Picture};

    fn roundtrip(value: VariableValue) {
        let bytes = encode_payload(&value).unwrap();
        let decoded = decode_payload(value.type_byte(), &bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_roundtrip_every_kind() {
        roundtrip(Number::real(-12.5).into());
        roundtrip(Number::complex(3.0, -4.0).into());
        roundtrip(Number::undefined().into());
        roundtrip(ListVariable::from_elements([1.0, 2.0, 3.0]).into());
        roundtrip(
            ListVariable::from_elements([Number::real(1.0), Number::complex(0.0, 1.0)]).into(),
        );
        roundtrip(Matrix::from_rows([[1.0, 2.0], [3.0, 4.0]]).unwrap().into());
        roundtrip(Picture::new().into());
        roundtrip(AppVar::new(b"hello".to_vec()).into());
        roundtrip(Program::new(vec![0xDE, 0x2A]).locked().into());
    }

    #[test]
    fn test_unknown_tag_is_preserved() {
        let value = decode_payload(0x17, &[9, 8, 7]).unwrap();
        assert_eq!(
            value,
            VariableValue::Unknown(UnknownVariable {
                type_tag: 0x17,
                data: vec![9, 8, 7]
            })
        );
        assert_eq!(encode_payload(&value).unwrap(), vec![9, 8, 7]);
    }

    #[test]
    fn test_short_payloads_are_bounds_errors() {
        for tag in [0x00, 0x01, 0x02, 0x05, 0x07, 0x0C, 0x0D, 0x15] {
            let err = decode_payload(tag, &[0x01]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Bounds, "tag 0x{tag:02X}");
        }
    }

    #[test]
    fn test_take() {
        assert_eq!(take("test", &[1, 2, 3], 1, 2).unwrap(), &[2, 3]);
        assert!(take("test", &[1, 2, 3], 2, 2).is_err());
        assert!(take("test", &[1, 2, 3], usize::MAX, 2).is_err());
    }
}
