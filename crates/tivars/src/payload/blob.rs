use crate::error::Result;

use super::{length_prefix, read_u16_prefix, take};

pub(super) fn encode(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(2 + data.len());
    out.extend_from_slice(&length_prefix("data", data.len())?);
    out.extend_from_slice(data);
    Ok(out)
}

pub(super) fn decode(context: &'static str, data: &[u8]) -> Result<Vec<u8>> {
    let len = usize::from(read_u16_prefix(context, data)?);
    Ok(take(context, data, 2, len)?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(encode(b"AB").unwrap(), vec![2, 0, b'A', b'B']);
        assert_eq!(decode("appvar", &[2, 0, b'A', b'B', 0]).unwrap(), b"AB");
        assert!(decode("appvar", &[3, 0, b'A', b'B']).is_err());
    }
}
