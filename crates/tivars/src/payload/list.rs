use crate::error::{Result, TiError};
use crate::float::{COMPLEX_LENGTH, REAL_LENGTH, decode_number, encode_number};
use crate::types::{ListVariable, Number, TypeTag};

use super::{length_prefix, read_u16_prefix, take};

pub(super) fn encode(list: &ListVariable) -> Result<Vec<u8>> {
    if list.is_empty() {
        return Err(TiError::validation("list", "list must not be empty"));
    }
    let complex = list.is_complex();
    let width = if complex { COMPLEX_LENGTH } else { REAL_LENGTH };

    let mut out = Vec::with_capacity(2 + list.len() * width);
    out.extend_from_slice(&length_prefix("list", list.len())?);
    for element in list.elements() {
        out.extend_from_slice(&encode_number(
            element.real_part(),
            element.imaginary_part(),
            complex,
        )?);
    }
    Ok(out)
}

pub(super) fn decode(tag: TypeTag, data: &[u8]) -> Result<ListVariable> {
    let count = usize::from(read_u16_prefix("list", data)?);
    let width = if tag == TypeTag::ComplexList {
        COMPLEX_LENGTH
    } else {
        REAL_LENGTH
    };
    let body = take("list elements", data, 2, count * width)?;
    body.chunks_exact(width)
        .map(|record| {
            let (real, imaginary) = decode_number(record)?;
            Ok(Number::from_parts(real, imaginary))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_real_list_layout() {
        let bytes = encode(&ListVariable::from_elements([1.0, 2.0])).unwrap();
        assert_eq!(&bytes[..2], &[2, 0]);
        assert_eq!(bytes.len(), 2 + 2 * REAL_LENGTH);
    }

    #[test]
    fn test_complex_list_forces_every_element_wide() {
        let list = ListVariable::from_elements([Number::real(1.0), Number::complex(0.0, 1.0)]);
        let bytes = encode(&list).unwrap();
        assert_eq!(bytes.len(), 2 + 2 * COMPLEX_LENGTH);
        assert_eq!(bytes[2] & 0x0C, 0x0C);
        assert_eq!(bytes[2 + REAL_LENGTH] & 0x0C, 0x0C);
    }

    #[test]
    fn test_undefined_element_in_complex_list() {
        let list = ListVariable::from_elements([Number::undefined(), Number::complex(1.0, 1.0)]);
        let bytes = encode(&list).unwrap();
        assert_eq!(&bytes[2..2 + COMPLEX_LENGTH], &{
            let mut sentinel = [0u8; COMPLEX_LENGTH];
            sentinel[0] = 0x02;
            sentinel
        });
        assert_eq!(decode(TypeTag::ComplexList, &bytes).unwrap(), list);
    }

    #[test]
    fn test_empty_list_rejected() {
        let err = encode(&ListVariable::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_count_overrun() {
        let mut bytes = encode(&ListVariable::from_elements([1.0, 2.0])).unwrap();
        bytes[0] = 3;
        let err = decode(TypeTag::RealList, &bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bounds);
        let err = decode(TypeTag::ComplexList, &bytes[..20]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bounds);
    }
}
