use crate::headers::HeaderError;

/// HTTP request parsing error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Request line is not exactly three space separated tokens.
    #[error("invalid request line")]
    InvalidRequestLine,
    /// Method contains non alphabetic character.
    #[error("invalid method")]
    InvalidMethod,
    /// Version is not `HTTP/1.1`.
    #[error("unsupported http version")]
    UnsupportedVersion,
    /// Invalid header field line.
    #[error("header error: {0}")]
    Header(#[from] HeaderError),
    /// `Content-Length` is not a non negative integer.
    #[error("invalid content length")]
    InvalidContentLength,
    /// Body is longer than the declared `Content-Length`.
    #[error("body overflow, expected {expected} bytes, received {received}")]
    BodyOverflow {
        expected: usize,
        received: usize,
    },
    /// Data fed into a request that is already done.
    #[error("trying to read data in a done state")]
    Done,
}
