//! Pool capacity configuration.
//!
//! Provides a type-safe description of the pool's two capacity knobs:
//! the idle floor and the open-connection cap.
//!
//! # Example
//!
//! ```ignore
//! use netpool::PoolConfig;
//!
//! let config = PoolConfig::new(3, 5);
//! config.validate()?;
//!
//! let from_file = PoolConfig::from_json(r#"{ "max_idle": 3, "max_open": 5 }"#)?;
//! assert_eq!(config, from_file);
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default number of idle connections kept ready.
const DEFAULT_MAX_IDLE: usize = 2;

/// Default open-connection cap (unbounded).
const DEFAULT_MAX_OPEN: usize = 0;

// ============================================================================
// PoolConfig
// ============================================================================

/// Capacity settings for a [`ConnectionPool`](super::ConnectionPool).
///
/// `max_idle` is both the number of connections dialed eagerly at
/// construction and the most that are ever kept idle. `max_open` caps idle
/// plus checked-out connections; `0` means no cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of idle connections (> 0).
    pub max_idle: usize,

    /// Maximum number of live connections, 0 for unlimited.
    pub max_open: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IDLE, DEFAULT_MAX_OPEN)
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl PoolConfig {
    /// Creates a configuration. Not validated until [`validate`](Self::validate).
    #[inline]
    #[must_use]
    pub const fn new(max_idle: usize, max_open: usize) -> Self {
        Self { max_idle, max_open }
    }

    /// Parses a configuration from JSON and validates it.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the input is not a valid config object
    /// - [`Error::InvalidConfiguration`] if the values are rejected
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl PoolConfig {
    /// Sets the idle floor.
    #[inline]
    #[must_use]
    pub const fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = max_idle;
        self
    }

    /// Sets the open-connection cap (0 for unlimited).
    #[inline]
    #[must_use]
    pub const fn with_max_open(mut self, max_open: usize) -> Self {
        self.max_open = max_open;
        self
    }
}

// ============================================================================
// Queries
// ============================================================================

impl PoolConfig {
    /// Returns `true` if there is no cap on open connections.
    #[inline]
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.max_open == 0
    }

    /// Returns `true` if `open` live connections have reached the cap.
    #[inline]
    #[must_use]
    pub const fn at_capacity(&self, open: usize) -> bool {
        !self.is_unbounded() && open >= self.max_open
    }

    /// Checks the capacity constraints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `max_idle` is 0 or exceeds
    /// a non-zero `max_open`.
    pub fn validate(&self) -> Result<()> {
        if self.max_idle == 0 {
            return Err(Error::invalid_configuration(
                "max_idle must be greater than 0",
            ));
        }

        if !self.is_unbounded() && self.max_idle > self.max_open {
            return Err(Error::invalid_configuration(format!(
                "max_idle ({}) cannot exceed max_open ({})",
                self.max_idle, self.max_open
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_default_is_valid() {
        let config = PoolConfig::default();
        assert_eq!(config.max_idle, DEFAULT_MAX_IDLE);
        assert!(config.is_unbounded());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = PoolConfig::default().with_max_idle(4).with_max_open(8);
        assert_eq!(config, PoolConfig::new(4, 8));
    }

    #[test]
    fn test_zero_max_idle_rejected() {
        let err = PoolConfig::new(0, 5).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("max_idle"));
    }

    #[test]
    fn test_idle_above_cap_rejected() {
        let err = PoolConfig::new(6, 5).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_unbounded_accepts_any_idle() {
        assert!(PoolConfig::new(100, 0).validate().is_ok());
    }

    #[test]
    fn test_at_capacity() {
        let capped = PoolConfig::new(3, 5);
        assert!(!capped.at_capacity(4));
        assert!(capped.at_capacity(5));

        let unbounded = PoolConfig::new(3, 0);
        assert!(!unbounded.at_capacity(usize::MAX));
    }

    #[test]
    fn test_from_json() {
        let config = PoolConfig::from_json(r#"{ "max_idle": 3, "max_open": 5 }"#).expect("valid");
        assert_eq!(config, PoolConfig::new(3, 5));
    }

    #[test]
    fn test_from_json_defaults_missing_fields() {
        let config = PoolConfig::from_json(r#"{ "max_open": 10 }"#).expect("valid");
        assert_eq!(config, PoolConfig::new(DEFAULT_MAX_IDLE, 10));
    }

    #[test]
    fn test_from_json_rejects_invalid_values() {
        let err = PoolConfig::from_json(r#"{ "max_idle": 9, "max_open": 5 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_from_json_rejects_negative() {
        let err = PoolConfig::from_json(r#"{ "max_idle": 3, "max_open": -1 }"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    proptest! {
        #[test]
        fn prop_idle_within_cap_is_valid(max_idle in 1usize..64, extra in 0usize..64) {
            let config = PoolConfig::new(max_idle, max_idle + extra);
            prop_assert!(config.validate().is_ok());
        }

        #[test]
        fn prop_idle_above_cap_is_invalid(max_open in 1usize..64, extra in 1usize..64) {
            let config = PoolConfig::new(max_open + extra, max_open);
            prop_assert!(config.validate().is_err());
        }
    }
}
