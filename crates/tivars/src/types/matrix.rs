//! Rectangular real matrices.

use crate::error::{Result, TiError};

/// Grid of real values stored row-major.
///
/// Every row has the same number of columns; the mutators reject or repair
/// anything that would break that. Both dimensions are capped at
/// [`Matrix::MAX_DIMENSION`] because the payload stores them as single bytes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    rows: Vec<Vec<f64>>,
}

impl Matrix {
    /// Largest row or column count.
    pub const MAX_DIMENSION: usize = u8::MAX as usize;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from complete rows, checking rectangularity and limits.
    pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> Result<Self>
    where
        R: Into<Vec<f64>>,
    {
        let mut matrix = Self::new();
        for (index, row) in rows.into_iter().enumerate() {
            matrix.set_row(index, row)?;
        }
        Ok(matrix)
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (0 for an empty matrix).
    #[must_use]
    pub fn columns(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.columns() == 0
    }

    /// Rows in order.
    #[must_use]
    pub fn row_data(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Element at (`row`, `column`).
    pub fn get(&self, row: usize, column: usize) -> Result<f64> {
        self.rows
            .get(row)
            .and_then(|values| values.get(column))
            .copied()
            .ok_or_else(|| self.index_error(row, column))
    }

    /// Replace an existing element.
    pub fn set(&mut self, row: usize, column: usize, value: f64) -> Result<()> {
        let error = self.index_error(row, column);
        let slot = self
            .rows
            .get_mut(row)
            .and_then(|values| values.get_mut(column))
            .ok_or(error)?;
        *slot = value;
        Ok(())
    }

    /// Set an element, growing the grid with zeros so it stays rectangular.
    pub fn set_extending(&mut self, row: usize, column: usize, value: f64) -> Result<()> {
        if row >= Self::MAX_DIMENSION || column >= Self::MAX_DIMENSION {
            return Err(TiError::index_out_of_range(
                "matrix",
                format!("({row}, {column})"),
                format!("max {0}x{0}", Self::MAX_DIMENSION),
            ));
        }
        let columns = self.columns().max(column + 1);
        if row >= self.rows.len() {
            self.rows.resize_with(row + 1, Vec::new);
        }
        for values in &mut self.rows {
            values.resize(columns, 0.0);
        }
        self.rows[row][column] = value;
        Ok(())
    }

    /// Replace row `row`, or append it when `row == rows()`.
    ///
    /// The row width must match the existing column count unless it replaces
    /// the only row of the matrix.
    pub fn set_row(&mut self, row: usize, values: impl Into<Vec<f64>>) -> Result<()> {
        let values = values.into();
        if row > self.rows.len() || row >= Self::MAX_DIMENSION {
            return Err(TiError::index_out_of_range(
                "matrix row",
                row,
                format!("{} rows", self.rows.len()),
            ));
        }
        if values.len() > Self::MAX_DIMENSION {
            return Err(TiError::validation(
                "matrix",
                format!(
                    "row has {} columns, limit is {}",
                    values.len(),
                    Self::MAX_DIMENSION
                ),
            ));
        }
        let sole_row = self.rows.len() == 1 && row == 0;
        if !self.rows.is_empty() && !sole_row && values.len() != self.columns() {
            return Err(TiError::validation(
                "matrix",
                format!(
                    "row {row} has {} columns, expected {}",
                    values.len(),
                    self.columns()
                ),
            ));
        }
        if row == self.rows.len() {
            self.rows.push(values);
        } else {
            self.rows[row] = values;
        }
        Ok(())
    }

    /// Shrink to at most `rows` x `columns`.
    pub fn truncate(&mut self, rows: usize, columns: usize) {
        self.rows.truncate(rows);
        for values in &mut self.rows {
            values.truncate(columns);
        }
    }

    fn index_error(&self, row: usize, column: usize) -> TiError {
        TiError::index_out_of_range(
            "matrix",
            format!("({row}, {column})"),
            format!("{}x{}", self.rows(), self.columns()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_set_row_enforces_width() {
        let mut matrix = Matrix::new();
        matrix.set_row(0, vec![1.0, 2.0]).unwrap();
        let err = matrix.set_row(1, vec![1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        matrix.set_row(1, vec![3.0, 4.0]).unwrap();
        assert_eq!((matrix.rows(), matrix.columns()), (2, 2));
    }

    #[test]
    fn test_set_row_cannot_skip_rows() {
        let mut matrix = Matrix::new();
        assert_eq!(matrix.set_row(2, vec![1.0]).unwrap_err().kind(), ErrorKind::Bounds);
    }

    #[test]
    fn test_sole_row_may_change_width() {
        let mut matrix = Matrix::from_rows([vec![1.0]]).unwrap();
        matrix.set_row(0, vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(matrix.columns(), 3);
    }

    #[test]
    fn test_set_extending_keeps_rectangular() {
        let mut matrix = Matrix::from_rows([vec![1.0, 2.0]]).unwrap();
        matrix.set_extending(2, 3, 9.0).unwrap();
        assert_eq!((matrix.rows(), matrix.columns()), (3, 4));
        assert!(matrix.row_data().iter().all(|row| row.len() == 4));
        assert_eq!(matrix.get(0, 1).unwrap(), 2.0);
        assert_eq!(matrix.get(1, 0).unwrap(), 0.0);
        assert_eq!(matrix.get(2, 3).unwrap(), 9.0);
        assert!(matrix.set_extending(255, 0, 1.0).is_err());
    }

    #[test]
    fn test_get_set_bounds() {
        let mut matrix = Matrix::from_rows([[1.0, 2.0], [3.0, 4.0]]).unwrap();
        matrix.set(1, 1, 8.0).unwrap();
        assert_eq!(matrix.get(1, 1).unwrap(), 8.0);
        assert!(matrix.get(2, 0).is_err());
        assert!(matrix.set(0, 2, 1.0).is_err());
    }

    #[test]
    fn test_truncate() {
        let mut matrix = Matrix::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        matrix.truncate(1, 2);
        assert_eq!(matrix.row_data(), &[vec![1.0, 2.0]]);
        matrix.truncate(0, 0);
        assert!(matrix.is_empty());
    }
}
