//! Error types for netpool.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use netpool::{Error, Result};
//!
//! async fn example(pool: &ConnectionPool<TcpStream>) -> Result<()> {
//!     let conn = pool.acquire().await?;
//!     pool.release(conn).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::InvalidConfiguration`], [`Error::Json`] |
//! | Lifecycle | [`Error::PoolClosed`], [`Error::Timeout`] |
//! | Arguments | [`Error::InvalidArgument`] |
//! | Connection | [`Error::Factory`], [`Error::Io`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid pool configuration.
    ///
    /// Returned when capacity settings are rejected at construction.
    /// No connections are created when this is returned.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the rejected setting.
        message: String,
    },

    /// JSON configuration could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// The pool has been shut down.
    ///
    /// Returned by acquire and shutdown after shutdown, and to any
    /// waiter that was blocked when shutdown ran.
    #[error("Pool is closed")]
    PoolClosed,

    /// Cancellation fired before a connection became available.
    #[error("Timed out waiting for a connection")]
    Timeout,

    // ========================================================================
    // Argument Errors
    // ========================================================================
    /// Invalid argument passed to a pool operation.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// The factory failed while filling the pool at construction.
    #[error("Factory is not able to fill the pool: {source}")]
    Factory {
        /// Underlying factory failure.
        #[source]
        source: IoError,
    },

    /// IO error from the factory (create path) or from closing a connection.
    ///
    /// Carries the underlying error without added context.
    #[error(transparent)]
    Io(#[from] IoError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an invalid configuration error.
    #[inline]
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a factory error wrapping the underlying cause.
    #[inline]
    pub fn factory(source: IoError) -> Self {
        Self::Factory { source }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if the pool was closed.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::PoolClosed)
    }

    /// Returns `true` if this is a configuration error.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. } | Self::Json(_))
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors may succeed if the caller retries.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Io(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
