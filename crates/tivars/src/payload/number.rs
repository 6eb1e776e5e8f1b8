use crate::error::{Result, TiError};
use crate::float::{COMPLEX_LENGTH, REAL_LENGTH, decode_number, encode_number};
use crate::types::{Number, TypeTag};

pub(super) fn encode(number: &Number) -> Result<Vec<u8>> {
    encode_number(number.real_part(), number.imaginary_part(), false)
}

pub(super) fn decode(tag: TypeTag, data: &[u8]) -> Result<Number> {
    let width = if tag == TypeTag::Complex {
        COMPLEX_LENGTH
    } else {
        REAL_LENGTH
    };
    if data.len() < width {
        return Err(TiError::out_of_bounds("number", 0, width, data.len()));
    }
    let (real, imaginary) = decode_number(&data[..width])?;
    Ok(Number::from_parts(real, imaginary))
}
