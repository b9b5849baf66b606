//! Concurrent Server.
//!
//! [`Server`] runs an accept loop on its own task. Every accepted connection is served on a newly
//! spawned task, so a slow client never blocks the others.
use std::{
    future::poll_fn,
    io,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    task::Poll,
};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{TcpListener, TcpStream},
    sync::Notify,
    task::JoinHandle,
};

#[cfg(unix)]
use tokio::net::{UnixListener, UnixStream};

use crate::config::Config;
use crate::h1::connection::serve_connection;
use crate::h1::parser::Request;
use crate::log::{error, info};
use crate::response::Writer;

// ===== Handler =====

/// Produce a response for a parsed request.
///
/// The handler receives the [`Writer`] bound to the connection and the complete [`Request`]. It
/// may write a full response through the writer. The connection is closed once the returned
/// future completes.
///
/// Implemented for any `Fn(Writer<IO>, Request) -> impl Future<Output = io::Result<()>>`.
pub trait Handler<IO>: Send + Sync + 'static {
    /// The future response writing.
    type Future: Future<Output = io::Result<()>> + Send + 'static;

    /// Handle the request.
    fn call(&self, writer: Writer<IO>, request: Request) -> Self::Future;
}

impl<F, Fut, IO> Handler<IO> for F
where
    F: Fn(Writer<IO>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = io::Result<()>> + Send + 'static,
{
    type Future = Fut;

    #[inline]
    fn call(&self, writer: Writer<IO>, request: Request) -> Self::Future {
        self(writer, request)
    }
}

// ===== Listener =====

/// A source of inbound connections.
pub trait Listener: Send + Sync + 'static {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    type Addr;

    fn poll_accept(
        &self,
        cx: &mut std::task::Context,
    ) -> Poll<io::Result<(Self::Stream, Self::Addr)>>;

    fn local_addr(&self) -> io::Result<Self::Addr>;
}

impl Listener for TcpListener {
    type Stream = TcpStream;

    type Addr = SocketAddr;

    #[inline]
    fn poll_accept(
        &self,
        cx: &mut std::task::Context,
    ) -> Poll<io::Result<(Self::Stream, Self::Addr)>> {
        TcpListener::poll_accept(self, cx)
    }

    #[inline]
    fn local_addr(&self) -> io::Result<Self::Addr> {
        TcpListener::local_addr(self)
    }
}

#[cfg(unix)]
impl Listener for UnixListener {
    type Stream = UnixStream;

    type Addr = tokio::net::unix::SocketAddr;

    #[inline]
    fn poll_accept(
        &self,
        cx: &mut std::task::Context,
    ) -> Poll<io::Result<(Self::Stream, Self::Addr)>> {
        UnixListener::poll_accept(self, cx)
    }

    #[inline]
    fn local_addr(&self) -> io::Result<Self::Addr> {
        UnixListener::local_addr(self)
    }
}

// ===== Server =====

/// Handle to a running server.
///
/// Dropping the handle closes the server.
#[derive(Debug)]
pub struct Server<A = SocketAddr> {
    local_addr: A,
    shutdown: Arc<Shutdown>,
    accept: Option<JoinHandle<()>>,
}

#[derive(Debug, Default)]
struct Shutdown {
    closed: AtomicBool,
    notify: Notify,
}

impl Shutdown {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Server {
    /// Bind a TCP listener on [`Config::addr`] and start serving.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns error if binding the address fails.
    pub async fn bind<H>(config: Config, handler: H) -> io::Result<Server>
    where
        H: Handler<TcpStream>,
    {
        let listener = TcpListener::bind(config.addr).await?;
        Server::serve(listener, config, handler)
    }
}

impl<A> Server<A> {
    /// Start serving connections from `listener`.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns error if the listener local address cannot be retrieved.
    pub fn serve<L, H>(listener: L, config: Config, handler: H) -> io::Result<Self>
    where
        L: Listener<Addr = A>,
        H: Handler<L::Stream>,
    {
        let local_addr = listener.local_addr()?;
        let shutdown = Arc::new(Shutdown::default());
        let accept = tokio::spawn(accept_loop(
            listener,
            Arc::clone(&shutdown),
            Arc::new(config),
            Arc::new(handler),
        ));

        Ok(Self {
            local_addr,
            shutdown,
            accept: Some(accept),
        })
    }

    /// Returns the address the server is listening on.
    #[inline]
    pub fn local_addr(&self) -> &A {
        &self.local_addr
    }

    /// Returns `true` if [`close`][Server::close] has been called.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.shutdown.is_closed()
    }

    /// Stop accepting new connections.
    ///
    /// Connections already accepted are served to completion. Calling this more than once has no
    /// effect.
    pub fn close(&self) {
        if self.shutdown.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.shutdown.notify.notify_one();
    }

    /// Wait for the accept loop to exit, after which the listener is released.
    ///
    /// Returns immediately if the accept loop has already been waited for.
    pub async fn wait(&mut self) {
        let Some(accept) = self.accept.take() else {
            return;
        };
        if let Err(err) = accept.await {
            error!("accept loop failed: {err}");
        }
    }

    /// Close the server and wait for the accept loop to exit.
    pub async fn shutdown(mut self) {
        self.close();
        self.wait().await;
    }
}

impl<A> Drop for Server<A> {
    fn drop(&mut self) {
        self.close();
    }
}

async fn accept_loop<L, H>(listener: L, shutdown: Arc<Shutdown>, config: Arc<Config>, handler: Arc<H>)
where
    L: Listener,
    H: Handler<L::Stream>,
{
    info!("server listening");

    loop {
        let accepted = tokio::select! {
            biased;
            () = shutdown.notify.notified() => break,
            accepted = poll_fn(|cx| listener.poll_accept(cx)) => accepted,
        };

        match accepted {
            Ok((io, _)) => {
                tokio::spawn(serve_connection(io, Arc::clone(&handler), Arc::clone(&config)));
            }
            Err(err) => {
                if shutdown.is_closed() {
                    break;
                }
                error!("failed to accept connection: {err}");
            }
        }
    }

    info!("server closed");
}
