//! Shared utilities: simulator program lookup and duration parsing.

pub mod binary;
pub mod duration;

pub use binary::{resolve_program, validate_binary, validate_program, BinaryError};
pub use duration::parse_timeout;
