use bytes::{BufMut, BytesMut};
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::StatusCode;
use crate::headers::Headers;

const DEFAULT_BUFFER_CAP: usize = 256;

/// Progress of a [`Writer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum WriterState {
    /// Nothing written yet.
    Initial,
    /// Status line written.
    StatusLine,
    /// Header section written.
    Headers,
    /// Some body written, either plain or chunked.
    Body,
    /// Trailer section written, the response is complete.
    Trailers,
}

/// HTTP/1.1 response writer.
///
/// Calls must be made in order:
///
/// 1. [`write_status_line`][Writer::write_status_line]
/// 2. [`write_headers`][Writer::write_headers]
/// 3. either [`write_body`][Writer::write_body], or any number of
///    [`write_chunked_body`][Writer::write_chunked_body] followed by
///    [`write_chunked_body_done`][Writer::write_chunked_body_done] and
///    [`write_trailers`][Writer::write_trailers]
///
/// Out of order calls are a bug in the caller and panic in debug builds.
///
/// Every call writes straight to the underlying IO. An IO error leaves the response incomplete,
/// nothing is retried.
pub struct Writer<IO> {
    io: IO,
    buffer: BytesMut,
    state: WriterState,
}

impl<IO> Writer<IO> {
    /// Create new [`Writer`] over given IO.
    pub fn new(io: IO) -> Self {
        Self {
            io,
            buffer: BytesMut::with_capacity(DEFAULT_BUFFER_CAP),
            state: WriterState::Initial,
        }
    }

    /// Returns current writer progress.
    #[inline]
    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Returns a reference to the underlying IO.
    #[inline]
    pub fn get_ref(&self) -> &IO {
        &self.io
    }

    /// Consumes the writer, returning the underlying IO.
    #[inline]
    pub fn into_inner(self) -> IO {
        self.io
    }

    fn transition(&mut self, allowed: &[WriterState], next: WriterState) {
        debug_assert!(
            allowed.contains(&self.state),
            "response written out of order, {:?} after {:?}",
            next,
            self.state,
        );
        self.state = next;
    }
}

impl<IO> Writer<IO>
where
    IO: AsyncWrite + Unpin,
{
    async fn flush_buffer(&mut self) -> io::Result<()> {
        let result = self.io.write_all_buf(&mut self.buffer).await;
        self.buffer.clear();
        result
    }

    /// Write `HTTP/1.1 <code> <reason>\r\n`.
    pub async fn write_status_line(&mut self, status: StatusCode) -> io::Result<()> {
        self.transition(&[WriterState::Initial], WriterState::StatusLine);

        match status.static_line() {
            Some(line) => self.buffer.put_slice(line.as_bytes()),
            None => {
                self.buffer.put_slice(b"HTTP/1.1 ");
                self.buffer.put_slice(itoa::Buffer::new().format(status.as_u16()).as_bytes());
                self.buffer.put_u8(b' ');
                self.buffer.put_slice(status.reason_or_unknown().as_bytes());
                self.buffer.put_slice(b"\r\n");
            }
        }

        self.flush_buffer().await
    }

    /// Write every header as `name: value\r\n` followed by a blank line.
    pub async fn write_headers(&mut self, headers: &Headers) -> io::Result<()> {
        self.transition(&[WriterState::StatusLine], WriterState::Headers);
        headers.write_to(&mut self.buffer);
        self.flush_buffer().await
    }

    /// Write raw body bytes.
    ///
    /// Caller is responsible for the `Content-Length` header to match.
    pub async fn write_body(&mut self, body: &[u8]) -> io::Result<usize> {
        self.transition(&[WriterState::Headers, WriterState::Body], WriterState::Body);
        self.io.write_all(body).await?;
        Ok(body.len())
    }

    /// Write a single chunk of a chunked body, returns the payload length.
    ///
    /// Empty chunk is a no-op, use [`write_chunked_body_done`] to end the body.
    ///
    /// [`write_chunked_body_done`]: Writer::write_chunked_body_done
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> io::Result<usize> {
        if chunk.is_empty() {
            return Ok(0);
        }
        self.transition(&[WriterState::Headers, WriterState::Body], WriterState::Body);

        put_hex(&mut self.buffer, chunk.len());
        self.buffer.put_slice(b"\r\n");
        self.buffer.put_slice(chunk);
        self.buffer.put_slice(b"\r\n");
        self.flush_buffer().await?;

        Ok(chunk.len())
    }

    /// Write the last chunk, `0\r\n`.
    ///
    /// The chunked body is only complete after [`write_trailers`][Writer::write_trailers], which
    /// writes the trailer section and its terminating blank line. Call it with empty headers when
    /// there is no trailer.
    pub async fn write_chunked_body_done(&mut self) -> io::Result<usize> {
        self.transition(&[WriterState::Headers, WriterState::Body], WriterState::Body);
        self.io.write_all(b"0\r\n").await?;
        Ok(3)
    }

    /// Write trailer fields after a chunked body, followed by a blank line.
    pub async fn write_trailers(&mut self, trailers: &Headers) -> io::Result<()> {
        self.transition(&[WriterState::Body], WriterState::Trailers);
        trailers.write_to(&mut self.buffer);
        self.flush_buffer().await
    }

    /// Flush the underlying IO.
    pub async fn flush(&mut self) -> io::Result<()> {
        self.io.flush().await
    }

    /// Flush and shutdown the write side of the underlying IO.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.io.shutdown().await
    }
}

impl<IO> std::fmt::Debug for Writer<IO> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Writer")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Write `n` as lowercase hexadecimal without leading zeros.
fn put_hex(buffer: &mut BytesMut, mut n: usize) {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut hex = [0u8; size_of::<usize>() * 2];
    let mut at = hex.len();
    loop {
        at -= 1;
        hex[at] = DIGITS[n & 0xf];
        n >>= 4;
        if n == 0 {
            break;
        }
    }
    buffer.put_slice(&hex[at..]);
}

/// Baseline response headers for a plain body of `content_length` bytes.
///
/// Contains `Content-Length`, `Content-Type: text/plain` and `Connection: close`. Use
/// [`Headers::overwrite`] to replace any of them.
pub fn default_headers(content_length: usize) -> Headers {
    let mut headers = Headers::with_capacity(4);
    headers.set("Content-Length", itoa::Buffer::new().format(content_length));
    headers.set("Content-Type", "text/plain");
    headers.set("Connection", "close");
    headers
}
