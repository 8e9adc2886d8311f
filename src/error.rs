//! Error types for handle operations
//!
//! Only precondition violations travel through [`HandleError`]. Operating
//! system failures during open, read, write or truncate are reported through
//! the return value (`false` or `None`) and logged, never raised.

use thiserror::Error;

/// Errors raised when a handle is used incorrectly
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// A read, write, truncate or end-of-file check was attempted on a
    /// handle that holds no open file
    #[error("File is not open.")]
    NotOpen,

    /// A negative default read length was supplied
    #[error("Read length is invalid: {0}")]
    InvalidReadLength(i64),
}

/// Result type for handle operations
pub type Result<T> = std::result::Result<T, HandleError>;
