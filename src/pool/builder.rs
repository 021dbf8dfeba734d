//! Builder pattern for pool configuration.
//!
//! Provides a fluent API for configuring and creating [`ConnectionPool`]
//! instances.
//!
//! # Example
//!
//! ```no_run
//! use netpool::{ConnectionPool, TcpFactory};
//! use tokio::net::TcpStream;
//!
//! # async fn example() -> netpool::Result<()> {
//! let pool = ConnectionPool::<TcpStream>::builder()
//!     .max_idle(3)
//!     .max_open(5)
//!     .factory(TcpFactory::new("127.0.0.1:7777".parse().unwrap()))
//!     .build()
//!     .await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::transport::{Connection, ConnectionFactory};

use super::config::PoolConfig;
use super::core::ConnectionPool;

// ============================================================================
// PoolBuilder
// ============================================================================

/// Builder for configuring a [`ConnectionPool`].
///
/// Use [`ConnectionPool::builder()`] to create a new builder.
pub struct PoolBuilder<C: Connection> {
    /// Capacity settings.
    config: PoolConfig,
    /// Connection factory.
    factory: Option<Box<dyn ConnectionFactory<C>>>,
}

impl<C: Connection> Default for PoolBuilder<C> {
    fn default() -> Self {
        Self {
            config: PoolConfig::default(),
            factory: None,
        }
    }
}

impl<C: Connection> fmt::Debug for PoolBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolBuilder")
            .field("config", &self.config)
            .field("has_factory", &self.factory.is_some())
            .finish()
    }
}

// ============================================================================
// PoolBuilder Implementation
// ============================================================================

impl<C: Connection> PoolBuilder<C> {
    /// Creates a new builder with default capacity and no factory.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the idle floor.
    ///
    /// # Arguments
    ///
    /// * `max_idle` - Connections kept ready, also dialed up front (> 0)
    #[inline]
    #[must_use]
    pub fn max_idle(mut self, max_idle: usize) -> Self {
        self.config.max_idle = max_idle;
        self
    }

    /// Sets the open-connection cap.
    ///
    /// # Arguments
    ///
    /// * `max_open` - Cap on idle plus checked-out connections, 0 for unlimited
    #[inline]
    #[must_use]
    pub fn max_open(mut self, max_open: usize) -> Self {
        self.config.max_open = max_open;
        self
    }

    /// Replaces both capacity settings.
    #[inline]
    #[must_use]
    pub fn config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the connection factory.
    #[inline]
    #[must_use]
    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: ConnectionFactory<C>,
    {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Builds the pool, dialing its idle floor.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`] if no factory is set or the
    ///   capacity settings are rejected
    /// - [`Error::Factory`] if an eager dial fails
    pub async fn build(self) -> Result<Arc<ConnectionPool<C>>> {
        let factory = self.factory.ok_or_else(|| {
            Error::invalid_configuration(
                "Connection factory is required. Use .factory() to set it.\n\
                 Example: ConnectionPool::builder().factory(TcpFactory::new(addr))",
            )
        })?;

        ConnectionPool::open(self.config, factory).await
    }
}

// ============================================================================
// Tests
// ============================================================================
