//! Connection transport layer.
//!
//! This module defines what the pool manages ([`Connection`]) and how it
//! obtains new ones ([`ConnectionFactory`]). Both are external
//! collaborators of the pool: it never interprets connection contents.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐   connect()   ┌─────────────────┐
//! │ ConnectionPool  │──────────────►│ ConnectionFactory│
//! │                 │◄──────────────│  (TcpFactory,   │
//! │  idle queue     │   Connection  │   closures)     │
//! └─────────────────┘               └─────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Connection capability trait |
//! | `factory` | Connection factories |

// ============================================================================
// Submodules
// ============================================================================

/// Connection capability trait.
pub mod connection;

/// Factories that dial new connections.
pub mod factory;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::Connection;
pub use factory::{ConnectionFactory, TcpFactory};
