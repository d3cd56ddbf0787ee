// src/error.rs

use std::fmt;
use std::io;

/// Errors raised by the layers hosting ring buffers.
///
/// Short reads and writes are never errors; they are reported through the
/// returned byte count.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// No hosted buffer has the requested id.
    UnknownBuffer(String),
    /// Captures OS-specific error codes.
    OsError(u32),
    /// Represents any unexpected error.
    Unexpected,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownBuffer(id) => write!(f, "No ring buffer with id '{}'", id),
            Error::OsError(code) => write!(f, "OS error with code: {}", code),
            Error::Unexpected => write!(f, "Unexpected error occurred"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::OsError(e.raw_os_error().unwrap_or(0) as u32)
    }
}

impl Error {
    /// Maps the error to the status returned over D-Bus. Success is 0.
    pub fn to_status(&self) -> i32 {
        match self {
            Error::OsError(_) => -1,
            Error::UnknownBuffer(_) => -2,
            Error::Unexpected => -3,
        }
    }
}
