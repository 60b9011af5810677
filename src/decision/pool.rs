//! Redis connection pool.
//!
//! # Responsibilities
//! - Derive pool bounds from the configured pool size
//! - Open the minimum number of connections up front
//! - Grow lazily up to the maximum, one connection per slot
//! - Hand out connections round-robin
//! - Reconnect a slot after its connection drops

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use tokio::sync::OnceCell;
use tokio::time::timeout;

use crate::decision::types::BackendError;

/// Connections opened eagerly when a pool size is configured.
pub const MIN_POOL_CONNECTIONS: usize = 1;

/// Reconnect attempts a slot makes before surfacing the failure.
const RECONNECT_RETRIES: usize = 2;

/// Pool bounds handed to the connection layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    pub min: usize,
    pub max: usize,
}

impl PoolOptions {
    /// Bounds for a configured pool size; `None` means no pool sizing at all.
    pub fn from_pool_size(pool_size: Option<u32>) -> Option<Self> {
        let max = usize::try_from(pool_size?).ok().filter(|max| *max > 0)?;
        Some(Self {
            min: MIN_POOL_CONNECTIONS.min(max),
            max,
        })
    }
}

/// Round-robin pool of self-healing multiplexed connections.
pub struct ConnectionPool {
    client: redis::Client,
    slots: Vec<OnceCell<ConnectionManager>>,
    counter: AtomicUsize,
    connect_timeout: Duration,
}

impl ConnectionPool {
    /// Open a pool. Without options a single connection is used.
    pub async fn open(
        client: redis::Client,
        options: Option<PoolOptions>,
        connect_timeout: Duration,
    ) -> Result<Self, BackendError> {
        let PoolOptions { min, max } = options.unwrap_or(PoolOptions { min: 1, max: 1 });
        if max == 0 {
            return Err(BackendError::Config("pool must allow at least one connection".into()));
        }

        let pool = Self {
            client,
            slots: (0..max).map(|_| OnceCell::new()).collect(),
            counter: AtomicUsize::new(0),
            connect_timeout,
        };

        for slot in pool.slots.iter().take(min.max(1)) {
            slot.get_or_try_init(|| pool.connect()).await?;
        }

        tracing::debug!(min, max, "Redis connection pool opened");
        Ok(pool)
    }

    /// Next connection in rotation, connecting the slot on first use.
    pub async fn get(&self) -> Result<ConnectionManager, BackendError> {
        let index = self.counter.fetch_add(1, Ordering::Relaxed) % self.slots.len();
        let conn = self.slots[index].get_or_try_init(|| self.connect()).await?;
        Ok(conn.clone())
    }

    /// Number of slots that hold an open connection.
    pub fn open_connections(&self) -> usize {
        self.slots.iter().filter(|slot| slot.initialized()).count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    async fn connect(&self) -> Result<ConnectionManager, BackendError> {
        let config = ConnectionManagerConfig::new()
            .set_connection_timeout(self.connect_timeout)
            .set_number_of_retries(RECONNECT_RETRIES);
        let manager = ConnectionManager::new_with_config(self.client.clone(), config);

        match timeout(self.connect_timeout, manager).await {
            Ok(Ok(conn)) => {
                tracing::debug!("Redis connection established");
                Ok(conn)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Redis connection failed");
                Err(BackendError::Redis(e))
            }
            Err(_) => {
                tracing::warn!(timeout_ms = self.connect_timeout.as_millis() as u64, "Redis connection timed out");
                Err(BackendError::Timeout)
            }
        }
    }
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("capacity", &self.capacity())
            .field("open", &self.open_connections())
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
