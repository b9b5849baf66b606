//! Connection Handling.
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

use super::io::read_request;
use crate::config::Config;
use crate::log::{debug, trace, warning};
use crate::response::{StatusCode, Writer, default_headers};
use crate::server::Handler;

const BAD_REQUEST_BODY: &[u8] = b"Bad Request\n";

/// Serve exactly one request on `io`.
///
/// The request is read to completion before the handler is called. On malformed request, the
/// connection is dropped without a response, unless [`Config::reply_bad_request`] is set.
///
/// The handler owns the [`Writer`], thus the connection is closed once the handler returns.
pub async fn serve_connection<IO, H>(mut io: IO, handler: Arc<H>, config: Arc<Config>)
where
    IO: AsyncRead + AsyncWrite + Unpin,
    H: Handler<IO>,
{
    let request = match read_request(&mut io, &config).await {
        Ok(ok) => ok,
        Err(err) => {
            debug!("failed to read request: {err}");
            if config.reply_bad_request
                && err.is_client_error()
                && let Err(err) = write_bad_request(Writer::new(io)).await
            {
                debug!("failed to write bad request: {err}");
            }
            return;
        }
    };

    trace!("> {} {} HTTP/{}", request.method(), request.target(), request.request_line().version);

    if let Err(err) = handler.call(Writer::new(io), request).await {
        warning!("failed to write response: {err}");
    }
}

async fn write_bad_request<IO>(mut writer: Writer<IO>) -> std::io::Result<()>
where
    IO: AsyncWrite + Unpin,
{
    writer.write_status_line(StatusCode::BAD_REQUEST).await?;
    writer.write_headers(&default_headers(BAD_REQUEST_BODY.len())).await?;
    writer.write_body(BAD_REQUEST_BODY).await?;
    writer.shutdown().await
}
