//! Connection pool module.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ConnectionPool`] | Bounded pool state machine |
//! | [`PoolBuilder`] | Fluent configuration builder |
//! | [`PoolConfig`] | Capacity settings |
//!
//! # Example
//!
//! ```no_run
//! use netpool::{ConnectionPool, Result, TcpFactory};
//!
//! # async fn example() -> Result<()> {
//! let factory = TcpFactory::new("127.0.0.1:7777".parse().unwrap());
//! let pool = ConnectionPool::new(3, 5, factory).await?;
//!
//! let conn = pool.acquire().await?;
//! pool.release(conn).await?;
//! pool.shutdown().await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for pool configuration.
pub mod builder;

/// Capacity configuration.
pub mod config;

/// Core pool implementation.
pub mod core;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::PoolBuilder;
pub use config::PoolConfig;
pub use core::ConnectionPool;
