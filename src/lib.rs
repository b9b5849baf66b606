//! HTTP/1.1 Server over Raw TCP
//!
//! - [`headers`] contains the header collection shared by requests and responses.
//! - [`h1`] contains the incremental request parser and connection handling.
//! - [`response`] contains the status line table and the ordered response writer.
//! - [`body`] contains the chunked body decoder.
//! - [`server`] contains the concurrent accept loop and graceful shutdown.
#![warn(missing_debug_implementations)]

mod log;
mod common;

pub mod config;
pub mod headers;
pub mod h1;
pub mod body;
pub mod response;
pub mod server;

pub use common::ParseResult;
pub use config::Config;
pub use h1::parser::{ParseError, Request, RequestLine};
pub use headers::Headers;
pub use response::{StatusCode, Writer};
pub use server::{Handler, Server};
