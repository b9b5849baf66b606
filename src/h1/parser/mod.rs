//! HTTP/1.1 Request Parser.
//!
//! [`Request::parse`] works on chunked bytes. Given any length of bytes, the parser consumes as
//! much as it can and reports how many bytes it consumed. Bytes that are not consumed must be
//! given again, followed by more bytes, in the next call. Feeding a request one byte at a time or
//! all at once yields the same [`Request`].
//!
//! Parsing progresses through [`State`], which only ever moves forward:
//!
//! ```not_rust
//! Initialized -> ParsingHeaders -> ParsingBody -> Done
//! ```
mod reqline;
mod error;

pub use reqline::RequestLine;
pub use error::ParseError;

use bytes::{Bytes, BytesMut};

use crate::headers::{Headers, Parsed};

#[cfg(test)]
mod test;

/// Parse progress of a [`Request`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum State {
    /// Waiting for the request line.
    Initialized,
    /// Request line parsed, waiting for header fields.
    ParsingHeaders,
    /// Header section ended, waiting for `Content-Length` bytes of body.
    ParsingBody,
    /// Request is complete.
    Done,
}

/// HTTP Request.
///
/// Constructed empty, filled by [`Request::parse`], then handed to the handler once its
/// [`state`][Request::state] is [`State::Done`].
#[derive(Debug, Clone)]
pub struct Request {
    request_line: RequestLine,
    headers: Headers,
    body: BytesMut,
    content_length: Option<usize>,
    state: State,
}

impl Default for Request {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    /// Create new empty [`Request`] waiting for its request line.
    pub fn new() -> Self {
        Self {
            request_line: RequestLine::default(),
            headers: Headers::with_capacity(8),
            body: BytesMut::new(),
            content_length: None,
            state: State::Initialized,
        }
    }

    /// Returns the request line.
    #[inline]
    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    /// Returns the request method.
    #[inline]
    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    /// Returns the request target.
    #[inline]
    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    /// Returns the request headers.
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the body received so far.
    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consumes the request, returning the body.
    #[inline]
    pub fn into_body(self) -> Bytes {
        self.body.freeze()
    }

    /// Returns the declared `Content-Length`, available once the header section is parsed.
    #[inline]
    pub fn content_length(&self) -> Option<usize> {
        self.content_length
    }

    /// Returns the current parse progress.
    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns `true` if the request is complete.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Consume as much of `bytes` as possible, returns the number of consumed bytes.
    ///
    /// Returning `0` without error means more bytes are required.
    ///
    /// # Errors
    ///
    /// Returns error if the request is malformed, or if the request is already done.
    pub fn parse(&mut self, bytes: &[u8]) -> Result<usize, ParseError> {
        if self.is_done() {
            return Err(ParseError::Done);
        }

        let mut total = 0;
        while !self.is_done() {
            let read = self.parse_single(&bytes[total..])?;
            if read == 0 {
                break;
            }
            total += read;
        }
        Ok(total)
    }

    fn parse_single(&mut self, bytes: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            State::Initialized => {
                let Some((reqline, read)) = reqline::parse_request_line(bytes).into_result()? else {
                    return Ok(0);
                };
                self.request_line = reqline;
                self.advance(State::ParsingHeaders);
                Ok(read)
            }
            State::ParsingHeaders => {
                let Some(parsed) = self.headers.parse(bytes).into_result()? else {
                    return Ok(0);
                };
                if let Parsed::End = parsed {
                    self.content_length = self.parse_content_length()?;
                    self.advance(State::ParsingBody);
                }
                Ok(parsed.consumed())
            }
            State::ParsingBody => {
                let Some(expected) = self.content_length else {
                    self.advance(State::Done);
                    return Ok(0);
                };

                if self.body.len() == expected {
                    self.advance(State::Done);
                    return Ok(0);
                }

                let received = self.body.len() + bytes.len();
                if received > expected {
                    return Err(ParseError::BodyOverflow { expected, received });
                }

                self.body.extend_from_slice(bytes);
                if self.body.len() == expected {
                    self.advance(State::Done);
                }
                Ok(bytes.len())
            }
            State::Done => Err(ParseError::Done),
        }
    }

    fn parse_content_length(&self) -> Result<Option<usize>, ParseError> {
        match self.headers.get("content-length") {
            Some(value) => match value.parse() {
                Ok(len) => Ok(Some(len)),
                Err(_) => Err(ParseError::InvalidContentLength),
            },
            None => Ok(None),
        }
    }

    fn advance(&mut self, state: State) {
        debug_assert!(state > self.state, "parse state regress from {:?} to {state:?}", self.state);
        self.state = state;
    }
}
