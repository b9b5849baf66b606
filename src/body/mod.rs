//! HTTP Message Body.
//!
//! Request bodies are framed by `Content-Length` and collected by the [request parser].
//! This module holds [`ChunkedDecoder`], the reading side of the chunked bodies written by
//! [`Writer::write_chunked_body`].
//!
//! [request parser]: crate::h1::parser
//! [`Writer::write_chunked_body`]: crate::Writer::write_chunked_body
pub mod chunked;
mod error;

pub use chunked::ChunkedDecoder;
pub use error::ChunkedError;
