use std::io;

use crate::h1::parser::ParseError;

/// An error that can occur while reading a request from a connection.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// Request is malformed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    /// Connection closed before the request is complete.
    #[error("unexpected eof")]
    UnexpectedEof,
    /// Request line, header line or body exceed the configured limit.
    #[error("excessive request size, limit is {limit} bytes")]
    TooLarge {
        limit: usize,
    },
    /// IO error.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ReadError {
    /// Returns `true` if the error is caused by what the client sent.
    ///
    /// Disconnection and IO errors are not client errors, there is no one to reply to.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::TooLarge { .. })
    }
}
