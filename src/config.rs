//! Server configuration.
use std::net::{Ipv4Addr, SocketAddr};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 42069;

/// Server and connection settings.
///
/// ```rust
/// use httpfromtcp::Config;
///
/// let config = Config {
///     reply_bad_request: true,
///     ..Config::with_port(8080)
/// };
/// assert_eq!(config.addr.port(), 8080);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address [`Server::bind`][crate::Server::bind] listens on (default: `0.0.0.0:42069`).
    pub addr: SocketAddr,
    /// Receive buffer capacity allocated per connection (default: 1KB).
    ///
    /// The buffer doubles whenever it is full before the next read.
    pub initial_buffer_size: usize,
    /// Maximum bytes held in the receive buffer without being parsed (default: 1MB).
    ///
    /// This bounds the request line and every single header line.
    pub max_buffer_size: usize,
    /// Maximum accepted `Content-Length` (default: 10MB).
    pub max_body_size: usize,
    /// Reply `400 Bad Request` when a request is malformed, instead of closing the connection
    /// without a response (default: `false`).
    pub reply_bad_request: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            initial_buffer_size: 1024,
            max_buffer_size: 1024 * 1024,
            max_body_size: 10 * 1024 * 1024,
            reply_bad_request: false,
        }
    }
}

impl Config {
    /// Create default config listening on all interfaces at given `port`.
    pub fn with_port(port: u16) -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            ..Self::default()
        }
    }

    /// Create default config listening on given address.
    pub fn with_addr(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            ..Self::default()
        }
    }
}
