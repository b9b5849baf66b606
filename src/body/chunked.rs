//! Chunked Transfer Decoding.
use bytes::{Buf, Bytes, BytesMut};

use super::ChunkedError;
use crate::common::ParseResult;
use crate::headers::{Headers, Parsed, find_crlf};

/// Unwrap `ParseResult::Ok` into `Some`, `Pending` into `None`, return early on error.
macro_rules! tri {
    ($e:expr) => {
        match $e {
            ParseResult::Ok(ok) => Some(ok),
            ParseResult::Pending => None,
            ParseResult::Err(err) => return ParseResult::Err(err),
        }
    };
}

/// Maximum hex digits of a chunk size.
const MAX_SIZE_DIGITS: usize = size_of::<u64>() * 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Waiting for `<hex>[;ext]\r\n`.
    Size,
    /// Remaining bytes of the current chunk.
    Data(u64),
    /// Waiting for CRLF after chunk data.
    DataEnd,
    /// Last chunk seen, reading trailer fields.
    Trailers,
    /// Body complete.
    Done,
}

/// Incremental chunked body decoder.
///
/// Bytes are read from a caller owned buffer, decoded bytes are removed from it.
///
/// ```rust
/// use bytes::BytesMut;
/// use httpfromtcp::{ParseResult, body::ChunkedDecoder};
///
/// let mut buffer = BytesMut::from(&b"3\r\nfoo\r\n0\r\n\r\n"[..]);
/// let mut decoder = ChunkedDecoder::new();
///
/// let ParseResult::Ok(Some(chunk)) = decoder.decode(&mut buffer) else {
///     unreachable!()
/// };
/// assert_eq!(chunk, "foo");
/// assert_eq!(decoder.decode(&mut buffer), ParseResult::Ok(None));
/// assert!(decoder.is_done());
/// ```
#[derive(Clone, Debug)]
pub struct ChunkedDecoder {
    phase: Phase,
    trailers: Headers,
}

impl Default for ChunkedDecoder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkedDecoder {
    /// Create new [`ChunkedDecoder`] waiting for the first chunk.
    pub fn new() -> Self {
        Self {
            phase: Phase::Size,
            trailers: Headers::new(),
        }
    }

    /// Returns `true` if the last chunk and the trailer section are decoded.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Returns the trailer fields decoded so far.
    #[inline]
    pub fn trailers(&self) -> &Headers {
        &self.trailers
    }

    /// Consumes the decoder, returning the trailer fields.
    #[inline]
    pub fn into_trailers(self) -> Headers {
        self.trailers
    }

    /// Decode the next piece of chunk data from `buffer`.
    ///
    /// Returns `Ok(Some(data))` for chunk data, which may be only part of a chunk, and `Ok(None)`
    /// once the body is complete. `Pending` means more bytes are required in `buffer`.
    pub fn decode(&mut self, buffer: &mut BytesMut) -> ParseResult<Option<Bytes>, ChunkedError> {
        loop {
            match self.phase {
                Phase::Size => {
                    let Some((size, read)) = tri!(parse_size(buffer)) else {
                        return ParseResult::Pending;
                    };
                    buffer.advance(read);
                    self.phase = match size {
                        0 => Phase::Trailers,
                        n => Phase::Data(n),
                    };
                }
                Phase::Data(remaining) => {
                    if buffer.is_empty() {
                        return ParseResult::Pending;
                    }
                    let len = remaining.min(buffer.len() as u64);
                    let data = buffer.split_to(len as usize).freeze();
                    self.phase = match remaining - len {
                        0 => Phase::DataEnd,
                        n => Phase::Data(n),
                    };
                    return ParseResult::Ok(Some(data));
                }
                Phase::DataEnd => {
                    let Some(crlf) = buffer.first_chunk::<2>() else {
                        return ParseResult::Pending;
                    };
                    if crlf != b"\r\n" {
                        return ParseResult::Err(ChunkedError::InvalidSeparator);
                    }
                    buffer.advance(2);
                    self.phase = Phase::Size;
                }
                Phase::Trailers => {
                    let Some(parsed) = tri!(self.trailers.parse(buffer).map_err(ChunkedError::from))
                    else {
                        return ParseResult::Pending;
                    };
                    buffer.advance(parsed.consumed());
                    if let Parsed::End = parsed {
                        self.phase = Phase::Done;
                    }
                }
                Phase::Done => return ParseResult::Ok(None),
            }
        }
    }

    /// Signal that the stream reached eof with the remaining `buffer`.
    ///
    /// A stream that ends right after the last chunk line, without trailer section, is accepted.
    ///
    /// # Errors
    ///
    /// Returns error if the body is not complete.
    pub fn finish(&mut self, buffer: &[u8]) -> Result<(), ChunkedError> {
        match self.phase {
            Phase::Done => Ok(()),
            Phase::Trailers if buffer.is_empty() && self.trailers.is_empty() => {
                self.phase = Phase::Done;
                Ok(())
            }
            _ => Err(ChunkedError::Incomplete),
        }
    }
}

/// Parse `<hex>[;ext]\r\n`, returns the chunk size and the line length.
fn parse_size(bytes: &[u8]) -> ParseResult<(u64, usize), ChunkedError> {
    let Some(digits) = bytes.iter().position(|b| !b.is_ascii_hexdigit()) else {
        if bytes.len() > MAX_SIZE_DIGITS {
            return ParseResult::Err(ChunkedError::TooLarge);
        }
        return ParseResult::Pending;
    };
    if digits == 0 {
        return ParseResult::Err(ChunkedError::InvalidSize);
    }

    let mut size = 0u64;
    for &b in &bytes[..digits] {
        let Some(n) = size.checked_mul(16) else {
            return ParseResult::Err(ChunkedError::TooLarge);
        };
        // `is_ascii_hexdigit` checked above
        size = n | (b as char).to_digit(16).unwrap_or_default() as u64;
    }
    if size > usize::MAX as u64 {
        return ParseResult::Err(ChunkedError::TooLarge);
    }

    let line_end = match bytes[digits] {
        b'\r' => match bytes.get(digits + 1) {
            Some(b'\n') => digits + 2,
            Some(_) => return ParseResult::Err(ChunkedError::InvalidSize),
            None => return ParseResult::Pending,
        },
        b';' => match find_crlf(&bytes[digits..]) {
            Some(crlf) => digits + crlf + 2,
            None => return ParseResult::Pending,
        },
        _ => return ParseResult::Err(ChunkedError::InvalidSize),
    };

    ParseResult::Ok((size, line_end))
}
