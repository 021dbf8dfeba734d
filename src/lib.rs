//! netpool - Bounded async pool of reusable network connections.
//!
//! This library keeps a capped set of idle connections ready for reuse
//! while capping the total number of open connections, so callers pay the
//! dial cost up front and the remote peer is never flooded.
//!
//! # Architecture
//!
//! - **Factory**: dials new connections on demand ([`ConnectionFactory`])
//! - **Connection**: opaque read/write/close handle ([`Connection`])
//! - **Pool**: the acquire/release/shutdown state machine ([`ConnectionPool`])
//!
//! Key design principles:
//!
//! - Capacity decisions are serialized under one lock; waiting is not
//! - `max_idle` connections are dialed eagerly at construction
//! - Surplus connections are closed on release, trimming back to `max_idle`
//! - Shutdown wakes every waiter and drains every idle connection
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use netpool::{ConnectionPool, Result, TcpFactory};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let factory = TcpFactory::new("127.0.0.1:7777".parse().unwrap())
//!         .with_connect_timeout(Duration::from_secs(2));
//!
//!     // Three ready connections, never more than five open
//!     let pool = ConnectionPool::new(3, 5, factory).await?;
//!
//!     let conn = pool.acquire_with_timeout(Duration::from_secs(1)).await?;
//!     // ... use the connection ...
//!     pool.release(conn).await?;
//!
//!     pool.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error types and [`Result`] alias |
//! | [`pool`] | Pool, builder and configuration |
//! | [`transport`] | Connection and factory traits |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Connection pool.
///
/// Use [`ConnectionPool::new()`] or [`ConnectionPool::builder()`] to create one.
pub mod pool;

/// Connection and factory traits.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Error types
pub use error::{Error, Result};

// Pool types
pub use pool::{ConnectionPool, PoolBuilder, PoolConfig};

// Transport types
pub use transport::{Connection, ConnectionFactory, TcpFactory};

// Cancellation
pub use tokio_util::sync::CancellationToken;
