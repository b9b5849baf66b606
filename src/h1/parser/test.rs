use crate::h1::parser::{ParseError, Request, State};
use crate::headers::HeaderError;

/// Feed `input` in pieces of at most `size` bytes, the way a read loop does.
fn parse_chunked(input: &[u8], size: usize) -> Result<Request, ParseError> {
    let mut request = Request::new();
    let mut buffer = Vec::new();
    let mut input = input;

    while !request.is_done() {
        if input.is_empty() {
            panic!("input exhausted before request is done, state: {:?}", request.state());
        }
        let (chunk, rest) = input.split_at(size.min(input.len()));
        buffer.extend_from_slice(chunk);
        input = rest;

        let consumed = request.parse(&buffer)?;
        buffer.drain(..consumed);
    }

    Ok(request)
}

macro_rules! test {
    (#[error($err:pat)] $input:expr) => {
        for size in [1, 3, 1024] {
            match parse_chunked($input, size) {
                Err($err) => {}
                Err(err) => panic!("chunk size {size}, unexpected error: {err:?}"),
                Ok(ok) => panic!("chunk size {size}, expected `Err` but returns `Ok` with {ok:?}"),
            }
        }
    };
    {
        $input:expr;
        $m:literal $t:literal $v:literal;
        [$($name:literal: $value:literal),*];
        $body:expr
    } => {
        for size in [1, 2, 3, 7, 1024] {
            let request = parse_chunked($input, size).unwrap();
            assert_eq!(request.method(), $m);
            assert_eq!(request.target(), $t);
            assert_eq!(request.request_line().version, $v);
            let headers: Vec<(&str, &str)> = request.headers().iter().collect();
            let expected: &[(&str, &str)] = &[$(($name, $value)),*];
            assert_eq!(headers, expected);
            assert_eq!(request.body(), $body);
            assert_eq!(request.state(), State::Done);
        }
    };
}

#[test]
fn request_line() {
    test! {
        b"GET / HTTP/1.1\r\nHost: localhost:42069\r\nUser-Agent: curl/7.81.0\r\nAccept: */*\r\n\r\n";
        "GET" "/" "1.1";
        ["host": "localhost:42069", "user-agent": "curl/7.81.0", "accept": "*/*"];
        b""
    };
    test! {
        b"GET /coffee HTTP/1.1\r\nHost: localhost:42069\r\n\r\n";
        "GET" "/coffee" "1.1";
        ["host": "localhost:42069"];
        b""
    };
    test! {
        b"POST /search?search=adequate&filter=available HTTP/1.1\r\n\r\n";
        "POST" "/search?search=adequate&filter=available" "1.1";
        [];
        b""
    };
    test! {
        b"OPTIONS * HTTP/1.1\r\n\r\n";
        "OPTIONS" "*" "1.1";
        [];
        b""
    };

    test!(#[error(ParseError::InvalidRequestLine)] b"/coffee HTTP/1.1\r\nHost: localhost:42069\r\n\r\n");
    test!(#[error(ParseError::InvalidRequestLine)] b"GET  / HTTP/1.1\r\n\r\n");
    test!(#[error(ParseError::InvalidRequestLine)] b"GET / HTTP/1.1 extra\r\n\r\n");
    test!(#[error(ParseError::InvalidRequestLine)] b"GET  HTTP/1.1\r\n\r\n");
    test!(#[error(ParseError::InvalidRequestLine)] b"\r\n\r\n");
    test!(#[error(ParseError::InvalidMethod)] b"G3T / HTTP/1.1\r\n\r\n");
    test!(#[error(ParseError::InvalidMethod)] b"get-it / HTTP/1.1\r\n\r\n");
    test!(#[error(ParseError::UnsupportedVersion)] b"GET / HTTP/1.0\r\n\r\n");
    test!(#[error(ParseError::UnsupportedVersion)] b"GET / HTTP/2\r\n\r\n");
    test!(#[error(ParseError::UnsupportedVersion)] b"GET / http/1.1\r\n\r\n");
}

#[test]
fn headers() {
    test! {
        b"GET / HTTP/1.1\r\nHost: localhost:42069\r\nX-Person: lane\r\nx-person: prime\r\n\r\n";
        "GET" "/" "1.1";
        ["host": "localhost:42069", "x-person": "lane, prime"];
        b""
    };
    test! {
        b"GET / HTTP/1.1\r\n\r\n";
        "GET" "/" "1.1";
        [];
        b""
    };

    test!(#[error(ParseError::Header(HeaderError::Malformed))] b"GET / HTTP/1.1\r\nHost localhost:42069\r\n\r\n");
    test!(#[error(ParseError::Header(HeaderError::Malformed))] b"GET / HTTP/1.1\r\nHost : localhost:42069\r\n\r\n");
    test!(#[error(ParseError::Header(HeaderError::InvalidToken))] b"GET / HTTP/1.1\r\nH\xc2\xa9st: localhost\r\n\r\n");
}

#[test]
fn body() {
    test! {
        b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 13\r\n\r\nhello world!\n";
        "POST" "/submit" "1.1";
        ["host": "localhost:42069", "content-length": "13"];
        b"hello world!\n"
    };
    test! {
        b"POST /submit HTTP/1.1\r\nContent-Length: 0\r\n\r\n";
        "POST" "/submit" "1.1";
        ["content-length": "0"];
        b""
    };
    test! {
        b"POST /submit HTTP/1.1\r\nContent-Length: 4\r\n\r\n\r\n\r\n";
        "POST" "/submit" "1.1";
        ["content-length": "4"];
        b"\r\n\r\n"
    };

    test!(#[error(ParseError::InvalidContentLength)] b"POST /submit HTTP/1.1\r\nContent-Length: -1\r\n\r\n");
    test!(#[error(ParseError::InvalidContentLength)] b"POST /submit HTTP/1.1\r\nContent-Length: ten\r\n\r\n");
    test!(#[error(ParseError::InvalidContentLength)] b"POST /submit HTTP/1.1\r\nContent-Length: 1\r\nContent-Length: 1\r\n\r\n");
}

#[test]
fn missing_content_length_ignores_body() {
    let request = parse_chunked(b"POST /submit HTTP/1.1\r\n\r\nhello world!\n", 1024).unwrap();
    assert!(request.body().is_empty());
    assert_eq!(request.content_length(), None);
}

#[test]
fn short_body_waits_for_more() {
    let mut request = Request::new();
    let input = b"POST /submit HTTP/1.1\r\nContent-Length: 20\r\n\r\npartial content";

    assert_eq!(request.parse(input).unwrap(), input.len());
    assert_eq!(request.state(), State::ParsingBody);
    assert_eq!(request.body(), b"partial content");
    assert_eq!(request.content_length(), Some(20));

    assert_eq!(request.parse(b"").unwrap(), 0);
    assert_eq!(request.parse(b"12345").unwrap(), 5);
    assert!(request.is_done());
    assert_eq!(request.body(), b"partial content12345");
}

#[test]
fn partial_progress() {
    let mut request = Request::new();

    assert_eq!(request.parse(b"GET / HT").unwrap(), 0);
    assert_eq!(request.state(), State::Initialized);

    assert_eq!(request.parse(b"GET / HTTP/1.1\r\nHost: loc").unwrap(), 16);
    assert_eq!(request.state(), State::ParsingHeaders);

    assert_eq!(request.parse(b"Host: localhost\r\n").unwrap(), 17);
    assert_eq!(request.state(), State::ParsingHeaders);

    assert_eq!(request.parse(b"\r\n").unwrap(), 2);
    assert_eq!(request.state(), State::Done);
}

#[test]
fn parse_after_done() {
    let mut request = Request::new();
    request.parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
    assert!(request.is_done());
    assert_eq!(request.parse(b"GET / HTTP/1.1\r\n\r\n"), Err(ParseError::Done));
}

#[test]
fn body_overflow() {
    let input = b"POST /submit HTTP/1.1\r\nContent-Length: 13\r\n\r\nhello world!\nmore";

    // bytes past the body only count when they arrive in the same read as the body end
    for size in [3, 1024] {
        let err = parse_chunked(input, size).unwrap_err();
        assert!(matches!(err, ParseError::BodyOverflow { expected: 13, .. }), "{err:?}");
    }

    let request = parse_chunked(input, 1).unwrap();
    assert_eq!(request.body(), b"hello world!\n");

    let mut request = Request::new();
    assert_eq!(
        request.parse(input),
        Err(ParseError::BodyOverflow { expected: 13, received: 17 })
    );
}
