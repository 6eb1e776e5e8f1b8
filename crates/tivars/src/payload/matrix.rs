use crate::error::{Result, TiError};
use crate::float::{REAL_LENGTH, decode_number, encode_number};
use crate::types::Matrix;

use super::take;

pub(super) fn encode(matrix: &Matrix) -> Result<Vec<u8>> {
    if matrix.is_empty() {
        return Err(TiError::validation("matrix", "matrix must not be empty"));
    }
    let (rows, columns) = (matrix.rows(), matrix.columns());
    let dimension = |count: usize| {
        u8::try_from(count)
            .map_err(|_| TiError::validation("matrix", format!("dimension {count} exceeds 255")))
    };

    let mut out = Vec::with_capacity(2 + rows * columns * REAL_LENGTH);
    out.push(dimension(columns)?);
    out.push(dimension(rows)?);
    for row in matrix.row_data() {
        for value in row {
            out.extend_from_slice(&encode_number(Some(*value), None, false)?);
        }
    }
    Ok(out)
}

pub(super) fn decode(data: &[u8]) -> Result<Matrix> {
    let [columns, rows] = match data {
        [columns, rows, ..] => [usize::from(*columns), usize::from(*rows)],
        _ => return Err(TiError::out_of_bounds("matrix", 0, 2, data.len())),
    };
    let body = take("matrix elements", data, 2, columns * rows * REAL_LENGTH)?;

    let mut values = Vec::with_capacity(rows * columns);
    for (index, record) in body.chunks_exact(REAL_LENGTH).enumerate() {
        let (real, _) = decode_number(record)?;
        let real = real.ok_or_else(|| {
            TiError::invalid_format(format!("matrix element {index} is undefined"))
        })?;
        values.push(real);
    }
    if columns == 0 {
        return Ok(Matrix::new());
    }
    Matrix::from_rows(values.chunks(columns).map(<[f64]>::to_vec))
}
