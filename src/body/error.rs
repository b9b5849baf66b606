use crate::headers::HeaderError;

/// An error that can occur while decoding a chunked body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChunkedError {
    /// Chunk size line is not a hexadecimal number.
    #[error("invalid chunk size")]
    InvalidSize,
    /// Chunk data is not followed by CRLF.
    #[error("invalid chunk separator")]
    InvalidSeparator,
    /// Chunk size does not fit in memory.
    #[error("chunk too large")]
    TooLarge,
    /// Trailer field is malformed.
    #[error("invalid trailer: {0}")]
    Trailer(#[from] HeaderError),
    /// Stream ended before the last chunk.
    #[error("incomplete chunked body")]
    Incomplete,
}
