//! Listener ownership and bounded graceful shutdown.
//!
//! ```text
//!   Idle ──bind ok──▶ Serving ──cancel / listener error──▶ Draining ──▶ Stopped
//!     │
//!     └──bind failed──▶ Stopped (ServerError::Startup)
//! ```
//!
//! Exactly two activities race while serving: the accept loop and the
//! caller's cancellation future. Whichever resolves first decides the
//! outcome; in-flight connections are then given `shutdown_timeout` to
//! finish.

use axum::Router;
use core_config::server::ServerConfig;
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server::{conn::auto, graceful::GracefulShutdown},
    service::TowerToHyperService,
};
use std::fmt::Display;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Slow clients get this long to finish sending request headers.
pub const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause after an accept failure caused by resource exhaustion (out of file
/// descriptors, buffers or memory) before accepting again.
pub const ACCEPT_BACKOFF: Duration = Duration::from_secs(1);

/// Source of inbound connections for [`LifecycleController::serve`].
///
/// Implemented for [`TcpListener`]. An accept error is classified by the
/// controller: per-connection failures are skipped, resource exhaustion backs
/// off for [`ACCEPT_BACKOFF`], and anything else ends serving with
/// [`ServerError::Listener`].
pub trait Acceptor: Send {
    type Io: AsyncRead + AsyncWrite + Unpin + Send + 'static;
    type Addr: Display + Send + 'static;

    fn accept(&mut self) -> impl Future<Output = io::Result<(Self::Io, Self::Addr)>> + Send;

    fn local_addr(&self) -> io::Result<Self::Addr>;
}

impl Acceptor for TcpListener {
    type Io = TcpStream;
    type Addr = SocketAddr;

    fn accept(&mut self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send {
        TcpListener::accept(self)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        TcpListener::local_addr(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Startup {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("listener failed: {0}")]
    Listener(#[source] io::Error),

    #[error("in-flight connections did not drain within {0:?}")]
    ShutdownTimeout(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Serving,
    Draining,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    pub shutdown_timeout: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(core_config::server::DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }
}

impl From<&ServerConfig> for LifecycleConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            shutdown_timeout: config.shutdown_timeout(),
        }
    }
}

/// Owns one listener from bind to drained shutdown.
///
/// State transitions are published on a `watch` channel so callers (and
/// tests) can observe them with [`LifecycleController::subscribe`].
pub struct LifecycleController {
    config: LifecycleConfig,
    state: watch::Sender<LifecycleState>,
}

impl LifecycleController {
    pub fn new(config: LifecycleConfig) -> Self {
        let (state, _) = watch::channel(LifecycleState::Idle);
        Self { config, state }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Bind `addr` and serve `router` until `shutdown` resolves.
    ///
    /// A bind failure is reported immediately as [`ServerError::Startup`].
    pub async fn run<F>(&self, router: Router, addr: &str, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(source) => {
                error!(%addr, error = %source, "Failed to bind listener");
                self.state.send_replace(LifecycleState::Stopped);
                return Err(ServerError::Startup {
                    addr: addr.to_string(),
                    source,
                });
            }
        };

        self.serve(listener, router, shutdown).await
    }

    /// Serve an already-bound listener until `shutdown` resolves or the
    /// listener fails, then drain.
    pub async fn serve<L, F>(
        &self,
        mut listener: L,
        router: Router,
        shutdown: F,
    ) -> Result<(), ServerError>
    where
        L: Acceptor,
        F: Future<Output = ()> + Send,
    {
        let mut builder = auto::Builder::new(TokioExecutor::new());
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(HEADER_READ_TIMEOUT);

        let graceful = GracefulShutdown::new();

        match listener.local_addr() {
            Ok(addr) => info!(%addr, "Server listening"),
            Err(e) => warn!(error = %e, "Server listening on unknown address"),
        }
        self.state.send_replace(LifecycleState::Serving);

        tokio::pin!(shutdown);

        let outcome = loop {
            let accepted = tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break Ok(());
                }
                accepted = listener.accept() => accepted,
            };

            match accepted {
                Ok((stream, peer)) => {
                    let conn = builder
                        .serve_connection(TokioIo::new(stream), TowerToHyperService::new(router.clone()))
                        .into_owned();
                    let conn = graceful.watch(conn);

                    tokio::spawn(async move {
                        if let Err(e) = conn.await {
                            debug!(%peer, error = %e, "Connection closed with error");
                        }
                    });
                }
                Err(e) => match classify_accept_error(&e) {
                    AcceptFailure::Connection => {
                        debug!(error = %e, "Skipping failed accept");
                    }
                    AcceptFailure::Exhausted => {
                        warn!(error = %e, backoff = ?ACCEPT_BACKOFF, "Accept failed, backing off");
                        tokio::select! {
                            _ = &mut shutdown => {
                                info!("Shutdown requested");
                                break Ok(());
                            }
                            _ = tokio::time::sleep(ACCEPT_BACKOFF) => {}
                        }
                    }
                    AcceptFailure::Fatal => {
                        error!(error = %e, "Listener failed");
                        break Err(ServerError::Listener(e));
                    }
                },
            }
        };

        drop(listener);
        self.state.send_replace(LifecycleState::Draining);

        let deadline = self.config.shutdown_timeout;
        info!(timeout = ?deadline, "Draining in-flight connections");
        let drained = tokio::time::timeout(deadline, graceful.shutdown()).await;

        self.state.send_replace(LifecycleState::Stopped);

        match (outcome, drained) {
            (Err(e), _) => Err(e),
            (Ok(()), Err(_)) => {
                warn!(timeout = ?deadline, "Forced shutdown with connections still open");
                Err(ServerError::ShutdownTimeout(deadline))
            }
            (Ok(()), Ok(())) => {
                info!("Server stopped");
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AcceptFailure {
    /// One client went away before the handshake finished
    Connection,
    /// The listener is healthy but the process is short on fds or memory
    Exhausted,
    /// The listener itself is unusable
    Fatal,
}

fn classify_accept_error(e: &io::Error) -> AcceptFailure {
    match e.kind() {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::Interrupted
        | io::ErrorKind::WouldBlock => AcceptFailure::Connection,
        io::ErrorKind::InvalidInput | io::ErrorKind::Unsupported | io::ErrorKind::NotConnected => {
            AcceptFailure::Fatal
        }
        // EMFILE, ENFILE, ENOBUFS and ENOMEM land here; they clear once
        // other connections close.
        _ => AcceptFailure::Exhausted,
    }
}
