//! HTTP/1.1 Response.
//!
//! - [`StatusCode`] maps status codes to their reason phrase.
//! - [`Writer`] emits the status line, headers, body and trailers in order.
mod status;
mod writer;

pub use status::{StatusCode, UNKNOWN_REASON};
pub use writer::{Writer, WriterState, default_headers};
