use std::{io, pin::Pin, sync::Arc, task::Poll};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, DuplexStream, ReadBuf};

use crate::config::Config;
use crate::h1::{ReadError, connection::serve_connection, parser::ParseError, read_request};
use crate::h1::parser::Request;
use crate::response::{StatusCode, Writer, default_headers};

/// Yields at most `size` bytes per read, then eof.
struct ChunkReader {
    data: &'static [u8],
    size: usize,
    /// Largest read buffer offered by the caller.
    offered: usize,
}

impl ChunkReader {
    fn new(data: &'static [u8], size: usize) -> Self {
        Self { data, size, offered: 0 }
    }
}

impl AsyncRead for ChunkReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _: &mut std::task::Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.offered = self.offered.max(buf.remaining());
        let len = self.size.min(self.data.len()).min(buf.remaining());
        let (chunk, rest) = self.data.split_at(len);
        buf.put_slice(chunk);
        self.data = rest;
        Poll::Ready(Ok(()))
    }
}

const GET: &[u8] = b"GET /coffee HTTP/1.1\r\nHost: localhost:42069\r\nUser-Agent: curl/7.81.0\r\nAccept: */*\r\n\r\n";
const POST: &[u8] = b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 13\r\n\r\nhello world!\n";

#[tokio::test]
async fn read_in_chunks() {
    for size in [1, 3, 8, 1024] {
        let request = read_request(&mut ChunkReader::new(GET, size), &Config::default()).await.unwrap();
        assert_eq!(request.method(), "GET");
        assert_eq!(request.target(), "/coffee");
        assert_eq!(request.headers().get("host"), Some("localhost:42069"));
        assert_eq!(request.headers().get("accept"), Some("*/*"));
        assert!(request.body().is_empty());

        let request = read_request(&mut ChunkReader::new(POST, size), &Config::default()).await.unwrap();
        assert_eq!(request.method(), "POST");
        assert_eq!(request.body(), b"hello world!\n");
    }
}

#[tokio::test]
async fn buffer_growth() {
    let config = Config {
        initial_buffer_size: 8,
        ..Config::default()
    };
    let request = read_request(&mut ChunkReader::new(GET, 1024), &config).await.unwrap();
    assert_eq!(request.headers().get("user-agent"), Some("curl/7.81.0"));

    let config = Config {
        initial_buffer_size: 0,
        ..Config::default()
    };
    let request = read_request(&mut ChunkReader::new(POST, 5), &config).await.unwrap();
    assert_eq!(request.body(), b"hello world!\n");
}

#[tokio::test]
async fn unexpected_eof() {
    let inputs: &[&'static [u8]] = &[
        b"",
        b"GET /coffee HTTP/1.1\r\nHost: local",
        b"GET /coffee HTTP/1.1\r\nHost: localhost:42069\r\n",
        b"POST /submit HTTP/1.1\r\nContent-Length: 13\r\n\r\nhello",
    ];

    for &input in inputs {
        let err = read_request(&mut ChunkReader::new(input, 4), &Config::default()).await.unwrap_err();
        assert!(matches!(err, ReadError::UnexpectedEof), "{err:?}");
        assert!(!err.is_client_error());
    }
}

#[tokio::test]
async fn line_too_large() {
    let config = Config {
        initial_buffer_size: 4,
        max_buffer_size: 16,
        ..Config::default()
    };

    let input = b"GET /a/very/long/target/that/never/fits HTTP/1.1\r\n\r\n";
    let err = read_request(&mut ChunkReader::new(input, 4), &config).await.unwrap_err();
    assert!(matches!(err, ReadError::TooLarge { limit: 16 }), "{err:?}");
    assert!(err.is_client_error());

    // every line fits even though the whole request does not
    let input = b"GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\nC: 3\r\nD: 4\r\n\r\n";
    let request = read_request(&mut ChunkReader::new(input, 4), &config).await.unwrap();
    assert_eq!(request.headers().len(), 4);
}

#[tokio::test]
async fn read_stops_at_buffer_limit() {
    let config = Config {
        max_buffer_size: 16,
        ..Config::default()
    };

    let mut reader = ChunkReader::new(b"GET /a/very/long/target HTTP/1.1\r\n\r\n", 1024);
    let err = read_request(&mut reader, &config).await.unwrap_err();
    assert!(matches!(err, ReadError::TooLarge { limit: 16 }), "{err:?}");
    assert_eq!(reader.offered, 16);

    let mut reader = ChunkReader::new(b"GET / HTTP/1.1\r\nHost: local\r\n\r\n", 1024);
    let request = read_request(&mut reader, &config).await.unwrap();
    assert_eq!(request.headers().get("host"), Some("local"));
    assert!(reader.offered <= 16);
}

#[tokio::test]
async fn body_too_large() {
    let config = Config {
        max_body_size: 4,
        ..Config::default()
    };
    let err = read_request(&mut ChunkReader::new(POST, 1024), &config).await.unwrap_err();
    assert!(matches!(err, ReadError::TooLarge { limit: 4 }), "{err:?}");
}

#[tokio::test]
async fn malformed() {
    let err = read_request(&mut ChunkReader::new(b"GET / HTTP/1.0\r\n\r\n", 3), &Config::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ReadError::Parse(ParseError::UnsupportedVersion)), "{err:?}");
    assert!(err.is_client_error());
}

// ===== Connection =====

async fn hello(mut writer: Writer<DuplexStream>, request: Request) -> io::Result<()> {
    let body = format!("{} {}\n", request.method(), request.target());
    writer.write_status_line(StatusCode::OK).await?;
    writer.write_headers(&default_headers(body.len())).await?;
    writer.write_body(body.as_bytes()).await?;
    Ok(())
}

async fn roundtrip(input: &[u8], config: Config) -> Vec<u8> {
    let (mut client, server) = tokio::io::duplex(1024);
    let task = tokio::spawn(serve_connection(server, Arc::new(hello), Arc::new(config)));

    client.write_all(input).await.unwrap();
    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    task.await.unwrap();
    response
}

#[tokio::test]
async fn serve_single_request() {
    let response = roundtrip(GET, Config::default()).await;
    assert_eq!(
        response,
        b"HTTP/1.1 200 OK\r\n\
        content-length: 12\r\n\
        content-type: text/plain\r\n\
        connection: close\r\n\
        \r\n\
        GET /coffee\n"
    );
}

#[tokio::test]
async fn malformed_closes_silently() {
    let response = roundtrip(b"garbage\r\n\r\n", Config::default()).await;
    assert!(response.is_empty());
}

#[tokio::test]
async fn malformed_replies_bad_request() {
    let config = Config {
        reply_bad_request: true,
        ..Config::default()
    };
    let response = roundtrip(b"garbage\r\n\r\n", config).await;
    assert_eq!(
        response,
        b"HTTP/1.1 400 Bad Request\r\n\
        content-length: 12\r\n\
        content-type: text/plain\r\n\
        connection: close\r\n\
        \r\n\
        Bad Request\n"
    );
}

#[tokio::test]
async fn eof_never_replies() {
    let config = Config {
        reply_bad_request: true,
        ..Config::default()
    };
    let (mut client, server) = tokio::io::duplex(1024);
    let task = tokio::spawn(serve_connection(server, Arc::new(hello), Arc::new(config)));

    client.write_all(b"GET / HTTP/1.1\r\n").await.unwrap();
    client.shutdown().await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    task.await.unwrap();
    assert!(response.is_empty());
}
