//! Bounded connection pool.
//!
//! The [`ConnectionPool`] keeps up to `max_idle` connections ready for
//! reuse and caps idle plus checked-out connections at `max_open`.
//!
//! # Locking
//!
//! ```text
//! acquire ──► lock ──► closed? ──► idle available or at cap? ──► unlock ──► wait on idle queue
//!                                  │
//!                                  └─► dial (lock held) ──► open += 1 ──► unlock
//! ```
//!
//! Capacity decisions and every change to `open` or `closed` happen under
//! `gate`. The idle queue is itself safe for concurrent push/pop, so waiters
//! drop the lock before suspending on it. Closing the queue at shutdown wakes
//! every waiter at once.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::{Future, pending};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_channel::{Receiver, Sender};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::transport::{Connection, ConnectionFactory};

use super::builder::PoolBuilder;
use super::config::PoolConfig;

// ============================================================================
// ConnectionPool
// ============================================================================

/// A bounded pool of reusable connections.
///
/// Thread-safe; share it as `Arc<ConnectionPool<C>>` across tasks.
///
/// # Example
///
/// ```ignore
/// let pool = ConnectionPool::new(3, 5, TcpFactory::new(addr)).await?;
///
/// let mut conn = pool.acquire_with_timeout(Duration::from_secs(1)).await?;
/// conn.write(b"ping").await?;
/// pool.release(conn).await?;
///
/// pool.shutdown().await?;
/// ```
pub struct ConnectionPool<C: Connection> {
    /// Validated capacity settings.
    config: PoolConfig,

    /// Dials new connections.
    factory: Box<dyn ConnectionFactory<C>>,

    /// Intake side of the idle queue. Closed at shutdown.
    idle_tx: Sender<C>,

    /// Hand-out side of the idle queue.
    idle_rx: Receiver<C>,

    /// Serializes capacity decisions and lifecycle transitions.
    gate: Mutex<()>,

    /// Live connections, idle plus checked out. Written only under `gate`.
    open: AtomicUsize,

    /// Shutdown flag. Written only under `gate`, never reset.
    closed: AtomicBool,
}

// ============================================================================
// ConnectionPool - Constructor
// ============================================================================

impl<C: Connection> ConnectionPool<C> {
    /// Creates a configuration builder for a pool.
    #[inline]
    #[must_use]
    pub fn builder() -> PoolBuilder<C> {
        PoolBuilder::new()
    }

    /// Creates a pool and fills it with `max_idle` connections.
    ///
    /// # Arguments
    ///
    /// * `max_idle` - Idle floor, also the number dialed up front (> 0)
    /// * `max_open` - Cap on live connections, 0 for unlimited
    /// * `factory` - Dials new connections
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`] if the capacity settings are rejected
    /// - [`Error::Factory`] if any eager dial fails
    pub async fn new<F>(max_idle: usize, max_open: usize, factory: F) -> Result<Arc<Self>>
    where
        F: ConnectionFactory<C>,
    {
        Self::with_config(PoolConfig::new(max_idle, max_open), factory).await
    }

    /// Creates a pool from a [`PoolConfig`].
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub async fn with_config<F>(config: PoolConfig, factory: F) -> Result<Arc<Self>>
    where
        F: ConnectionFactory<C>,
    {
        Self::open(config, Box::new(factory)).await
    }

    /// Validates `config`, dials the idle floor and assembles the pool.
    ///
    /// On a failed dial every connection created so far is closed
    /// best-effort before the factory error is returned.
    pub(crate) async fn open(
        config: PoolConfig,
        factory: Box<dyn ConnectionFactory<C>>,
    ) -> Result<Arc<Self>> {
        config.validate()?;

        let (idle_tx, idle_rx) = async_channel::bounded::<C>(config.max_idle);
        for _ in 0..config.max_idle {
            let conn = match factory.connect().await {
                Ok(conn) => conn,
                Err(e) => {
                    debug!(
                        error = %e,
                        created = idle_tx.len(),
                        "Eager fill failed, closing created connections"
                    );
                    idle_tx.close();
                    while let Ok(mut conn) = idle_rx.try_recv() {
                        if let Err(close_err) = conn.close().await {
                            debug!(error = %close_err, "Rollback close failed");
                        }
                    }
                    return Err(Error::factory(e));
                }
            };

            // Fewer than max_idle sends so far, so the queue has room.
            if let Err(rejected) = idle_tx.try_send(conn) {
                if let Err(close_err) = rejected.into_inner().close().await {
                    debug!(error = %close_err, "Close of unqueued connection failed");
                }
                break;
            }
        }

        let pool = Arc::new(Self {
            open: AtomicUsize::new(idle_tx.len()),
            config,
            factory,
            idle_tx,
            idle_rx,
            gate: Mutex::new(()),
            closed: AtomicBool::new(false),
        });

        info!(
            max_idle = config.max_idle,
            max_open = config.max_open,
            "ConnectionPool ready"
        );

        Ok(pool)
    }
}

// ============================================================================
// ConnectionPool - Accessors
// ============================================================================

impl<C: Connection> ConnectionPool<C> {
    /// Returns the number of idle connections.
    ///
    /// A snapshot that may be stale by the time it is used.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.idle_rx.len()
    }

    /// Returns `true` if no connection is idle.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.idle_rx.is_empty()
    }

    /// Returns the number of live connections, idle plus checked out.
    #[inline]
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open.load(Ordering::Acquire)
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) has run.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Returns the idle floor.
    #[inline]
    #[must_use]
    pub fn max_idle(&self) -> usize {
        self.config.max_idle
    }

    /// Returns the open-connection cap (0 for unlimited).
    #[inline]
    #[must_use]
    pub fn max_open(&self) -> usize {
        self.config.max_open
    }

    /// Returns the validated configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }
}

// ============================================================================
// ConnectionPool - Acquire
// ============================================================================

impl<C: Connection> ConnectionPool<C> {
    /// Acquires a connection, waiting as long as it takes.
    ///
    /// # Errors
    ///
    /// - [`Error::PoolClosed`] if the pool is or becomes shut down
    /// - [`Error::Io`] if a new connection had to be dialed and the factory failed
    pub async fn acquire(&self) -> Result<C> {
        self.acquire_until(pending()).await
    }

    /// Acquires a connection, giving up when `token` is cancelled.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if `token` is cancelled first
    /// - otherwise as [`acquire`](Self::acquire)
    pub async fn acquire_with_cancel(&self, token: &CancellationToken) -> Result<C> {
        self.acquire_until(token.cancelled()).await
    }

    /// Acquires a connection, giving up after `limit`.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if `limit` elapses first
    /// - otherwise as [`acquire`](Self::acquire)
    pub async fn acquire_with_timeout(&self, limit: Duration) -> Result<C> {
        self.acquire_until(tokio::time::sleep(limit)).await
    }

    /// Acquires a connection, giving up when `signal` completes.
    ///
    /// Reuses an idle connection when one is available. Below the cap and
    /// with nothing idle, dials a new one. At the cap, waits for a release.
    /// The signal also aborts a dial that is still in flight.
    ///
    /// # Errors
    ///
    /// - [`Error::PoolClosed`] if the pool is or becomes shut down
    /// - [`Error::Timeout`] if `signal` completes first
    /// - [`Error::Io`] carrying the factory's own error if a dial fails
    pub async fn acquire_until<S>(&self, signal: S) -> Result<C>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(signal);

        let guard = tokio::select! {
            biased;
            guard = self.gate.lock() => guard,
            () = &mut signal => return Err(Error::Timeout),
        };

        if self.is_closed() {
            return Err(Error::PoolClosed);
        }

        let open = self.open.load(Ordering::Acquire);
        if !self.idle_rx.is_empty() || self.config.at_capacity(open) {
            drop(guard);
            return self.wait_idle(signal).await;
        }

        debug!(open, max_open = self.config.max_open, "Dialing new connection");

        let conn = tokio::select! {
            biased;
            result = self.factory.connect() => result?,
            () = &mut signal => return Err(Error::Timeout),
        };

        self.open.fetch_add(1, Ordering::AcqRel);
        drop(guard);

        Ok(conn)
    }

    /// Waits for an idle connection without holding the lock.
    async fn wait_idle<S>(&self, signal: S) -> Result<C>
    where
        S: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            received = self.idle_rx.recv() => match received {
                Ok(conn) => {
                    trace!(idle = self.len(), "Reusing idle connection");
                    Ok(conn)
                }
                // Queue closed by shutdown
                Err(_) => Err(Error::PoolClosed),
            },
            () = signal => Err(Error::Timeout),
        }
    }
}

// ============================================================================
// ConnectionPool - Release
// ============================================================================

impl<C: Connection> ConnectionPool<C> {
    /// Returns a connection to the pool.
    ///
    /// Accepts a plain `C` or an `Option<C>`. The connection goes back into
    /// the idle queue when there is room. When the queue is full, or the
    /// pool has been shut down, it is closed instead.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if given `None`
    /// - [`Error::Io`] if closing a surplus or late connection fails
    pub async fn release(&self, conn: impl Into<Option<C>>) -> Result<()> {
        let Some(conn) = conn.into() else {
            return Err(Error::invalid_argument("connection is empty, rejecting"));
        };

        let _guard = self.gate.lock().await;

        if self.is_closed() {
            debug!("Released into closed pool, closing connection");
            return self.discard(conn).await;
        }

        match self.idle_tx.try_send(conn) {
            Ok(()) => {
                trace!(idle = self.len(), "Connection returned to pool");
                Ok(())
            }
            Err(rejected) => {
                debug!(
                    open = self.open_count(),
                    max_idle = self.config.max_idle,
                    "Idle queue full, closing surplus connection"
                );
                self.discard(rejected.into_inner()).await
            }
        }
    }

    /// Closes a connection the pool will not keep. Caller holds `gate`.
    async fn discard(&self, mut conn: C) -> Result<()> {
        conn.close().await?;
        self.decrement_open();
        Ok(())
    }

    /// Decrements `open`, saturating at zero. Caller holds `gate`.
    fn decrement_open(&self) {
        let _ = self
            .open
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }
}

// ============================================================================
// ConnectionPool - Lifecycle
// ============================================================================

impl<C: Connection> ConnectionPool<C> {
    /// Shuts down the pool.
    ///
    /// Wakes every blocked waiter with [`Error::PoolClosed`] and closes every
    /// idle connection. Checked-out connections stay open until released.
    /// Draining continues past a failing close; the first failure is
    /// returned once every idle connection has been attempted.
    ///
    /// # Errors
    ///
    /// - [`Error::PoolClosed`] if already shut down
    /// - [`Error::Io`] with the first close failure during draining
    pub async fn shutdown(&self) -> Result<()> {
        let _guard = self.gate.lock().await;

        if self.is_closed() {
            return Err(Error::PoolClosed);
        }

        info!(
            idle = self.len(),
            open = self.open_count(),
            "ConnectionPool shutting down"
        );

        self.closed.store(true, Ordering::Release);
        self.idle_tx.close();

        let mut first_error = None;
        let mut drained = 0usize;

        while let Ok(mut conn) = self.idle_rx.try_recv() {
            match conn.close().await {
                Ok(()) => {
                    self.decrement_open();
                    drained += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to close idle connection during shutdown");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        info!(
            drained,
            open = self.open_count(),
            "ConnectionPool shutdown complete"
        );

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

// ============================================================================
// ConnectionPool - Display
// ============================================================================

impl<C: Connection> fmt::Debug for ConnectionPool<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("max_idle", &self.config.max_idle)
            .field("max_open", &self.config.max_open)
            .field("idle", &self.len())
            .field("open", &self.open_count())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
