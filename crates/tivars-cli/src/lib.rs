//! CLI library components for the `tivars` tool.

pub mod inspect;
pub mod logging;
pub mod pack;
pub mod types;
