//! Core types for calculator variables and flash applications.
//!
//! This module provides the typed values (numbers, lists, matrices,
//! pictures and byte strings), the named [`Variable`] wrapper, the
//! [`FlashApplication`] model and the reader/writer options.

mod blob;
mod flash;
mod list;
mod matrix;
mod name;
mod number;
mod options;
mod picture;
mod tags;
mod variable;

pub use blob::{AppVar, Program, UnknownVariable};
pub use flash::{APP_NAME_LENGTH, FlashApplication, MAX_PAGE_SIZE, Revision};
pub use list::ListVariable;
pub use matrix::Matrix;
pub use name::{LIST_TOKEN, MATRIX_TOKEN, NAME_LENGTH, PICTURE_TOKEN, THETA, VarName};
pub use number::Number;
pub use options::{COMMENT_LENGTH, DEFAULT_HEX_LINE_LENGTH, ReaderOptions, WriterOptions};
pub use picture::{DEFAULT_PICTURE_ROWS, PICTURE_COLUMNS, Picture, ROW_BYTES};
pub use tags::{FlashSeries, RecordType, Series, TypeTag, VariableKind};
pub use variable::{ARCHIVED_FLAG, Variable, VariableValue};
