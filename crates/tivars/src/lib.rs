//! Reader and writer for graphing-calculator variable and flash files.
//!
//! This crate encodes and decodes the binary files calculators use to store
//! user variables (numbers, lists, matrices, pictures, programs and
//! application variables) and flash applications.
//!
//! # Features
//!
//! - 9-byte BCD floating point with complex pairs and the undefined sentinel
//! - Legacy (`**TI83**`) and enhanced (`**TI83F*`) variable containers
//! - Entries with unknown type tags survive a read/write round trip
//! - Flash application files with Intel-hex page contents
//! - A structural validator that reports every problem in a file
//!
//! # Example
//!
//! ```
//! use tivars::{ListVariable, Variable, read_variables, write_variables};
//!
//! let list = Variable::named("L1", ListVariable::from_elements([1.0, 2.5])).unwrap();
//! let bytes = write_variables(&[list], "saved").unwrap();
//!
//! let variables = read_variables(&bytes).unwrap();
//! assert_eq!(variables[0].display_name(), "L1");
//! ```
//!
//! # Flash applications
//!
//! ```
//! use tivars::{FlashApplication, read_flash_application, write_flash_application};
//!
//! let mut app = FlashApplication::new("DEMO").unwrap();
//! app.set_page(0, vec![0xAA, 0xBB]).unwrap();
//!
//! let bytes = write_flash_application(&app).unwrap();
//! let parsed = read_flash_application(&bytes).unwrap();
//! assert_eq!(parsed.page(0), Some(&[0xAA, 0xBB][..]));
//! ```

mod error;
pub mod float;
pub mod header;
pub mod hex;
pub mod payload;
mod reader;
pub mod types;
pub mod validate;
mod writer;

// Re-export error types
pub use error::{ErrorKind, Result, TiError};

// Re-export core types
pub use types::{
    AppVar, FlashApplication, FlashSeries, ListVariable, Matrix, Number, Picture, Program,
    ReaderOptions, RecordType, Revision, Series, TypeTag, UnknownVariable, VarName, Variable,
    VariableKind, VariableValue, WriterOptions,
};

// Re-export reader functionality
pub use reader::{
    FlashReader, VariableReader, read_flash_application, read_variables,
    read_variables_with_options,
};

// Re-export writer functionality
pub use writer::{
    FlashWriter, VariableWriter, write_flash_application, write_flash_application_with_options,
    write_variables, write_variables_with_options,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
