//! Reading a request from a connection.
use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::{error::ReadError, parser::Request};
use crate::config::Config;

/// Read a single [`Request`] from `io`.
///
/// Read bytes accumulate in a receive buffer. After every read the parser runs against the
/// buffer and the consumed prefix is dropped, so the unparsed bytes always stay at the start of
/// the buffer. The buffer doubles its capacity when it is full before the next read, and a single
/// read never fills it past [`Config::max_buffer_size`].
///
/// # Errors
///
/// Returns error if the request is malformed, exceed the configured limits, or the connection
/// is closed before the request is complete.
pub async fn read_request<IO>(io: &mut IO, config: &Config) -> Result<Request, ReadError>
where
    IO: AsyncRead + Unpin,
{
    let mut buffer = BytesMut::with_capacity(config.initial_buffer_size.max(1));
    let mut request = Request::new();

    while !request.is_done() {
        if buffer.len() >= config.max_buffer_size {
            return Err(ReadError::TooLarge { limit: config.max_buffer_size });
        }
        if buffer.len() == buffer.capacity() {
            let additional = buffer.capacity().min(config.max_buffer_size - buffer.len());
            buffer.reserve(additional);
        }

        let limit = (config.max_buffer_size - buffer.len()) as u64;
        let read = (&mut *io).take(limit).read_buf(&mut buffer).await?;
        if read == 0 {
            return Err(ReadError::UnexpectedEof);
        }

        let consumed = request.parse(&buffer)?;
        buffer.advance(consumed);

        if request.content_length().is_some_and(|len| len > config.max_body_size) {
            return Err(ReadError::TooLarge { limit: config.max_body_size });
        }
    }

    Ok(request)
}
