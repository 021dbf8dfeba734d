//! Connection capability trait.
//!
//! The pool treats connections as opaque handles. It only needs to be
//! able to close them; `read` and `write` are what callers do with a
//! connection between acquire and release.
//!
//! # Lifecycle
//!
//! 1. Created by a [`ConnectionFactory`](super::ConnectionFactory)
//! 2. Handed out by acquire, handed back by release (any number of times)
//! 3. Closed exactly once by the pool, then dropped

// ============================================================================
// Imports
// ============================================================================

use std::io::Result as IoResult;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

// ============================================================================
// Connection
// ============================================================================

/// A pooled network connection.
///
/// # Thread Safety
///
/// Connections move between tasks as they are acquired and released,
/// so implementors must be `Send`.
#[async_trait]
pub trait Connection: Send + 'static {
    /// Reads into `buf`, returning the number of bytes read.
    async fn read(&mut self, buf: &mut [u8]) -> IoResult<usize>;

    /// Writes from `buf`, returning the number of bytes written.
    async fn write(&mut self, buf: &[u8]) -> IoResult<usize>;

    /// Closes the connection.
    ///
    /// The pool calls this at most once per connection and drops the
    /// handle afterwards, whatever the outcome.
    async fn close(&mut self) -> IoResult<()>;
}

// ============================================================================
// TcpStream
// ============================================================================

#[async_trait]
impl Connection for TcpStream {
    #[inline]
    async fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        AsyncReadExt::read(self, buf).await
    }

    #[inline]
    async fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        AsyncWriteExt::write(self, buf).await
    }

    /// Shuts down the write half. The socket itself is released on drop.
    async fn close(&mut self) -> IoResult<()> {
        AsyncWriteExt::shutdown(self).await
    }
}

// ============================================================================
// Tests
// ============================================================================
