//! Monochrome bitmap pictures.

use crate::error::{Result, TiError};

/// Pixel columns per row.
pub const PICTURE_COLUMNS: usize = 96;

/// Rows in a full-screen picture.
pub const DEFAULT_PICTURE_ROWS: u32 = 63;

/// Bytes per pixel row.
pub const ROW_BYTES: usize = PICTURE_COLUMNS / 8;

/// Bit-packed picture, one bit per pixel, MSB first, row-major.
///
/// The buffer always holds exactly `row_count * 12` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    row_count: u32,
    buffer: Vec<u8>,
}

impl Default for Picture {
    fn default() -> Self {
        Self {
            row_count: DEFAULT_PICTURE_ROWS,
            buffer: vec![0; DEFAULT_PICTURE_ROWS as usize * ROW_BYTES],
        }
    }
}

impl Picture {
    /// Most rows whose buffer still fits the `u16` payload length.
    pub const MAX_ROWS: u32 = ((u16::MAX as usize - 2) / ROW_BYTES) as u32;

    /// Most rows a stored buffer can span; the last row may be partial.
    const MAX_STORED_ROWS: usize = (u16::MAX as usize).div_ceil(ROW_BYTES);

    /// A blank full-screen picture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a pixel buffer, deriving the row count from its length.
    ///
    /// Any buffer whose length fits the `u16` payload field is accepted,
    /// even when rounding up to whole rows exceeds [`Self::MAX_ROWS`].
    pub fn from_buffer(buffer: Vec<u8>) -> Result<Self> {
        let rows = buffer.len().div_ceil(ROW_BYTES);
        let row_count = u32::try_from(rows)
            .ok()
            .filter(|_| rows <= Self::MAX_STORED_ROWS)
            .ok_or_else(|| too_many_rows(rows))?;
        let mut picture = Self {
            row_count,
            buffer,
        };
        picture.buffer.resize(picture.byte_len(), 0);
        Ok(picture)
    }

    #[must_use]
    pub const fn row_count(&self) -> u32 {
        self.row_count
    }

    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Change the row count, zero-padding or truncating the buffer.
    pub fn set_row_count(&mut self, rows: u32) -> Result<()> {
        if rows > Self::MAX_ROWS {
            return Err(too_many_rows(rows as usize));
        }
        self.row_count = rows;
        self.buffer.resize(self.byte_len(), 0);
        Ok(())
    }

    /// Replace the pixel data, zero-padding or truncating to the current size.
    pub fn set_buffer(&mut self, bytes: &[u8]) {
        let len = self.byte_len();
        self.buffer.clear();
        self.buffer
            .extend_from_slice(&bytes[..bytes.len().min(len)]);
        self.buffer.resize(len, 0);
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Whether the pixel at (`row`, `column`) is on.
    pub fn pixel(&self, row: u32, column: usize) -> Result<bool> {
        let (index, mask) = self.locate(row, column)?;
        Ok(self.buffer[index] & mask != 0)
    }

    /// Turn the pixel at (`row`, `column`) on or off.
    pub fn set_pixel(&mut self, row: u32, column: usize, on: bool) -> Result<()> {
        let (index, mask) = self.locate(row, column)?;
        if on {
            self.buffer[index] |= mask;
        } else {
            self.buffer[index] &= !mask;
        }
        Ok(())
    }

    fn byte_len(&self) -> usize {
        self.row_count as usize * ROW_BYTES
    }

    fn locate(&self, row: u32, column: usize) -> Result<(usize, u8)> {
        if row >= self.row_count || column >= PICTURE_COLUMNS {
            return Err(TiError::index_out_of_range(
                "picture",
                format!("({row}, {column})"),
                format!("{}x{PICTURE_COLUMNS}", self.row_count),
            ));
        }
        let index = row as usize * ROW_BYTES + column / 8;
        Ok((index, 0x80 >> (column % 8)))
    }
}

fn too_many_rows(rows: usize) -> TiError {
    TiError::validation(
        "picture",
        format!("{rows} rows exceeds limit of {}", Picture::MAX_ROWS),
    )
}
