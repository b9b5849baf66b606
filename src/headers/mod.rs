//! HTTP Header Collection.
mod matches;
mod map;
mod error;

pub use map::{Headers, Iter, Parsed};
pub use error::HeaderError;
pub use matches::{is_token, is_token_str};

pub(crate) use matches::find_crlf;
