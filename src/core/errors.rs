// src/core/errors.rs

//! Defines the primary error type for the entire application.

use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the server.
///
/// The `Display` output of every variant is the reason text that follows
/// `Error: ` on the wire, so it must stay human readable.
#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Invalid action: {0}")]
    UnknownCommand(String),

    #[error("Invalid {0} request format.")]
    WrongArgumentCount(String),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Request line exceeds {0} bytes")]
    LineTooLong(usize),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

// `std::io::Error` is not cloneable, so the Io variant shares it through an Arc.
impl Clone for TimetableError {
    fn clone(&self) -> Self {
        match self {
            TimetableError::Io(e) => TimetableError::Io(Arc::clone(e)),
            TimetableError::UnknownCommand(s) => TimetableError::UnknownCommand(s.clone()),
            TimetableError::WrongArgumentCount(s) => TimetableError::WrongArgumentCount(s.clone()),
            TimetableError::EmptyField(f) => TimetableError::EmptyField(f),
            TimetableError::InvalidTime(s) => TimetableError::InvalidTime(s.clone()),
            TimetableError::LineTooLong(n) => TimetableError::LineTooLong(*n),
            TimetableError::Internal(s) => TimetableError::Internal(s.clone()),
        }
    }
}

impl PartialEq for TimetableError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TimetableError::Io(a), TimetableError::Io(b)) => a.kind() == b.kind(),
            (TimetableError::UnknownCommand(a), TimetableError::UnknownCommand(b)) => a == b,
            (TimetableError::WrongArgumentCount(a), TimetableError::WrongArgumentCount(b)) => {
                a == b
            }
            (TimetableError::EmptyField(a), TimetableError::EmptyField(b)) => a == b,
            (TimetableError::InvalidTime(a), TimetableError::InvalidTime(b)) => a == b,
            (TimetableError::LineTooLong(a), TimetableError::LineTooLong(b)) => a == b,
            (TimetableError::Internal(a), TimetableError::Internal(b)) => a == b,
            _ => false,
        }
    }
}

impl From<std::io::Error> for TimetableError {
    fn from(e: std::io::Error) -> Self {
        TimetableError::Io(Arc::new(e))
    }
}

impl TimetableError {
    /// Returns true for I/O errors that simply mean the peer went away.
    pub fn is_normal_disconnect(&self) -> bool {
        matches!(self, TimetableError::Io(e) if matches!(
            e.kind(),
            std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::BrokenPipe
                | std::io::ErrorKind::UnexpectedEof
                | std::io::ErrorKind::ConnectionAborted
        ))
    }
}
