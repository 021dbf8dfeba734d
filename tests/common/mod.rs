//! Shared test harness: an in-memory connection and its factory.

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use std::collections::HashSet;
use std::io::{Error as IoError, ErrorKind, Result as IoResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use netpool::{Connection, ConnectionFactory};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Logging
// ============================================================================

/// Installs a test subscriber once. Filter with `RUST_LOG=netpool=debug`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Registry
// ============================================================================

/// Records what happened to every mock connection.
#[derive(Debug, Default)]
pub struct Registry {
    dialed: AtomicUsize,
    closed: Mutex<Vec<usize>>,
    fail_close: Mutex<HashSet<usize>>,
}

impl Registry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of connections the factory produced.
    pub fn dialed(&self) -> usize {
        self.dialed.load(Ordering::SeqCst)
    }

    /// Ids of connections closed successfully, in close order.
    pub fn closed(&self) -> Vec<usize> {
        self.closed.lock().clone()
    }

    pub fn is_closed(&self, id: usize) -> bool {
        self.closed.lock().contains(&id)
    }

    /// Makes every close of connection `id` fail.
    pub fn fail_close_of(&self, id: usize) {
        self.fail_close.lock().insert(id);
    }

    fn next_id(&self) -> usize {
        self.dialed.fetch_add(1, Ordering::SeqCst)
    }
}

// ============================================================================
// MockConnection
// ============================================================================

/// In-memory connection. Ids are assigned in dial order starting at 0.
#[derive(Debug)]
pub struct MockConnection {
    id: usize,
    registry: Arc<Registry>,
}

impl MockConnection {
    pub fn id(&self) -> usize {
        self.id
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn read(&mut self, _buf: &mut [u8]) -> IoResult<usize> {
        Ok(0)
    }

    async fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        Ok(buf.len())
    }

    async fn close(&mut self) -> IoResult<()> {
        if self.registry.fail_close.lock().contains(&self.id) {
            return Err(IoError::other(format!("close of {} failed", self.id)));
        }

        let mut closed = self.registry.closed.lock();
        assert!(!closed.contains(&self.id), "connection {} closed twice", self.id);
        closed.push(self.id);
        Ok(())
    }
}

// ============================================================================
// MockFactory
// ============================================================================

/// Factory producing [`MockConnection`]s.
#[derive(Debug, Clone)]
pub struct MockFactory {
    registry: Arc<Registry>,
    /// Dials numbered at or above this fail.
    fail_from: Option<usize>,
    /// Dials numbered at or above this sleep before completing.
    slow_from: Option<(usize, Duration)>,
}

impl MockFactory {
    pub fn new(registry: &Arc<Registry>) -> Self {
        Self {
            registry: Arc::clone(registry),
            fail_from: None,
            slow_from: None,
        }
    }

    pub fn failing_from(mut self, attempt: usize) -> Self {
        self.fail_from = Some(attempt);
        self
    }

    pub fn slow_from(mut self, attempt: usize, delay: Duration) -> Self {
        self.slow_from = Some((attempt, delay));
        self
    }
}

#[async_trait]
impl ConnectionFactory<MockConnection> for MockFactory {
    async fn connect(&self) -> IoResult<MockConnection> {
        let attempt = self.registry.dialed();

        if let Some((from, delay)) = self.slow_from
            && attempt >= from
        {
            tokio::time::sleep(delay).await;
        }

        if let Some(from) = self.fail_from
            && attempt >= from
        {
            return Err(IoError::new(ErrorKind::ConnectionRefused, "dial refused"));
        }

        Ok(MockConnection {
            id: self.registry.next_id(),
            registry: Arc::clone(&self.registry),
        })
    }
}
