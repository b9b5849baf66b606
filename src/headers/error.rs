//! Error types that can occur during header related operation.

/// An error that can occur while parsing a header field line.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    /// Field line has no colon, or whitespace right before the colon.
    #[error("malformed header")]
    Malformed,
    /// Field name is empty.
    #[error("header name cannot be empty")]
    Empty,
    /// Field name contains a non token character.
    #[error("header name contains invalid byte")]
    InvalidToken,
    /// Field value is not valid UTF-8.
    #[error("header value is not valid utf-8")]
    InvalidValue,
}
