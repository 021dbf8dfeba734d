//! Connection factories.
//!
//! A factory dials a new connection on demand. The pool calls it to fill
//! itself at construction and whenever acquire takes the create path.
//!
//! Any async closure returning `io::Result<C>` is a factory:
//!
//! ```ignore
//! let pool = ConnectionPool::new(3, 5, || async {
//!     TcpStream::connect("127.0.0.1:7777").await
//! })
//! .await?;
//! ```
//!
//! [`TcpFactory`] covers the common case of dialing one fixed address.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::io::{Error as IoError, ErrorKind, Result as IoResult};
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

use super::Connection;

// ============================================================================
// ConnectionFactory
// ============================================================================

/// Produces new connections for a pool.
///
/// Must be safe to call concurrently; the pool may invoke it from several
/// tasks without external synchronization. Retry policy is the factory's
/// own business, the pool never retries.
#[async_trait]
pub trait ConnectionFactory<C: Connection>: Send + Sync + 'static {
    /// Dials a new connection.
    async fn connect(&self) -> IoResult<C>;
}

#[async_trait]
impl<C, F, Fut> ConnectionFactory<C> for F
where
    C: Connection,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = IoResult<C>> + Send + 'static,
{
    #[inline]
    async fn connect(&self) -> IoResult<C> {
        (self)().await
    }
}

// ============================================================================
// TcpFactory
// ============================================================================

/// Where a [`TcpFactory`] dials.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    /// A resolved socket address.
    Addr(SocketAddr),
    /// A `host:port` string, resolved again on every dial.
    Host(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addr(addr) => write!(f, "{addr}"),
            Self::Host(host) => f.write_str(host),
        }
    }
}

/// Dials TCP connections to a fixed remote endpoint.
///
/// The endpoint is either a [`SocketAddr`] or a `host:port` string.
///
/// # Example
///
/// ```ignore
/// let factory = TcpFactory::new(addr)
///     .with_connect_timeout(Duration::from_secs(2))
///     .with_nodelay(true);
/// let pool = ConnectionPool::new(3, 5, factory).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpFactory {
    /// Remote endpoint to dial.
    target: Target,
    /// Upper bound on a single dial.
    connect_timeout: Option<Duration>,
    /// Whether to set `TCP_NODELAY` on new sockets.
    nodelay: bool,
}

impl TcpFactory {
    /// Creates a factory dialing `addr` with no connect timeout.
    #[inline]
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            target: Target::Addr(addr),
            connect_timeout: None,
            nodelay: false,
        }
    }

    /// Creates a factory dialing a `host:port` string.
    ///
    /// The name is resolved on every dial, so DNS changes are picked up by
    /// new connections. A name that fails to resolve surfaces as the dial's
    /// io error.
    #[inline]
    #[must_use]
    pub fn from_host(host: impl Into<String>) -> Self {
        Self {
            target: Target::Host(host.into()),
            connect_timeout: None,
            nodelay: false,
        }
    }

    /// Bounds each dial by `connect_timeout`.
    ///
    /// A dial that exceeds it fails with [`ErrorKind::TimedOut`].
    #[inline]
    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }

    /// Sets `TCP_NODELAY` on every dialed socket.
    #[inline]
    #[must_use]
    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }

    /// Returns the remote address, if built with [`new`](Self::new).
    #[inline]
    #[must_use]
    pub fn addr(&self) -> Option<SocketAddr> {
        match &self.target {
            Target::Addr(addr) => Some(*addr),
            Target::Host(_) => None,
        }
    }

    /// Returns the `host:port` string, if built with [`from_host`](Self::from_host).
    #[inline]
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        match &self.target {
            Target::Addr(_) => None,
            Target::Host(host) => Some(host),
        }
    }

    /// Returns the connect timeout, if any.
    #[inline]
    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    async fn connect_target(&self) -> IoResult<TcpStream> {
        match &self.target {
            Target::Addr(addr) => TcpStream::connect(*addr).await,
            Target::Host(host) => TcpStream::connect(host.as_str()).await,
        }
    }

    async fn dial(&self) -> IoResult<TcpStream> {
        let stream = match self.connect_timeout {
            Some(limit) => timeout(limit, self.connect_target())
                .await
                .map_err(|_| {
                    IoError::new(
                        ErrorKind::TimedOut,
                        format!(
                            "connect to {} timed out after {}ms",
                            self.target,
                            limit.as_millis()
                        ),
                    )
                })??,
            None => self.connect_target().await?,
        };

        if self.nodelay {
            stream.set_nodelay(true)?;
        }

        trace!(remote = %self.target, "TCP connection dialed");
        Ok(stream)
    }
}

#[async_trait]
impl ConnectionFactory<TcpStream> for TcpFactory {
    async fn connect(&self) -> IoResult<TcpStream> {
        self.dial().await
    }
}

// ============================================================================
// Tests
// ============================================================================
