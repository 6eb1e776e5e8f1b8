use crate::error::Result;
use crate::types::Picture;

use super::{length_prefix, read_u16_prefix, take};

pub(super) fn encode(picture: &Picture) -> Result<Vec<u8>> {
    let buffer = picture.buffer();
    let mut out = Vec::with_capacity(2 + buffer.len());
    out.extend_from_slice(&length_prefix("picture", buffer.len())?);
    out.extend_from_slice(buffer);
    Ok(out)
}

pub(super) fn decode(data: &[u8]) -> Result<Picture> {
    let len = usize::from(read_u16_prefix("picture", data)?);
    let buffer = take("picture buffer", data, 2, len)?;
    Picture::from_buffer(buffer.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::ROW_BYTES;

    #[test]
    fn test_length_field_is_byte_length() {
        let bytes = encode(&Picture::new()).unwrap();
        assert_eq!(&bytes[..2], &756u16.to_le_bytes());
        assert_eq!(bytes.len(), 758);
    }

    #[test]
    fn test_decode_derives_rows() {
        let mut bytes = vec![24, 0];
        bytes.extend_from_slice(&[0xFF; 24]);
        let picture = decode(&bytes).unwrap();
        assert_eq!(picture.row_count(), 2);
        assert!(picture.pixel(1, 95).unwrap());
    }

    #[test]
    fn test_decode_largest_payload() {
        let len: u16 = 65533;
        let mut bytes = len.to_le_bytes().to_vec();
        bytes.resize(2 + usize::from(len), 0);
        // data_length 65535 still fits the entry header field.
        assert_eq!(bytes.len(), usize::from(u16::MAX));

        let picture = decode(&bytes).unwrap();
        assert_eq!(picture.row_count(), Picture::MAX_ROWS + 1);
        assert_eq!(picture.buffer().len(), (Picture::MAX_ROWS as usize + 1) * ROW_BYTES);

        // Rounded up to whole rows the buffer no longer fits the length field.
        let err = encode(&picture).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
