//! HTTP/1.1 Protocol.
//!
//! - [`parser`] contains the incremental request parser.
//! - [`io`] contains the receive buffer loop that drives the parser from a connection.
//! - [`connection`] serves a single request on a connection, then closes it.
pub mod parser;
pub mod io;
pub mod connection;
mod error;

pub use error::ReadError;
pub use io::read_request;

#[cfg(test)]
mod test;
