use super::error::ParseError;
use crate::{common::ParseResult, headers::find_crlf};

const VERSION: &str = "HTTP/1.1";

/// Request line, the first line of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    /// Request method, e.g: `GET`.
    pub method: String,
    /// Request target as sent by the client, e.g: `/index.html?q=1`.
    pub target: String,
    /// Version number without the `HTTP/` prefix, always `1.1`.
    pub version: String,
}

/// Parse the request line at the start of `bytes`.
///
/// On success, returns the request line and the consumed length including the CRLF.
pub(super) fn parse_request_line(bytes: &[u8]) -> ParseResult<(RequestLine, usize), ParseError> {
    let Some(crlf) = find_crlf(bytes) else {
        return ParseResult::Pending;
    };

    let Ok(line) = str::from_utf8(&bytes[..crlf]) else {
        return ParseResult::Err(ParseError::InvalidRequestLine);
    };

    let mut parts = line.split(' ');
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return ParseResult::Err(ParseError::InvalidRequestLine);
    };

    if method.is_empty() || !method.bytes().all(|b| b.is_ascii_alphabetic()) {
        return ParseResult::Err(ParseError::InvalidMethod);
    }

    if target.is_empty() {
        return ParseResult::Err(ParseError::InvalidRequestLine);
    }

    if version != VERSION {
        return ParseResult::Err(ParseError::UnsupportedVersion);
    }

    let reqline = RequestLine {
        method: method.to_owned(),
        target: target.to_owned(),
        version: VERSION["HTTP/".len()..].to_owned(),
    };

    ParseResult::Ok((reqline, crlf + 2))
}
