//! Redis-backed decision client.
//!
//! # Responsibilities
//! - Connect to Redis with a bounded connect timeout
//! - Register the evaluator with `SCRIPT LOAD`
//! - Run it per request with `EVALSHA`
//! - Write the optional startup announcement

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use crate::decision::backend::{ClientMetadata, DecisionBackend, ScriptHandle};
use crate::decision::pool::{ConnectionPool, PoolOptions};
use crate::decision::types::BackendError;

/// Hash key prefix for startup announcements.
pub const ANNOUNCE_KEY_PREFIX: &str = "waf-gate:clients";

/// Decision backend that evaluates a Lua script inside Redis.
#[derive(Debug)]
pub struct RedisBackend {
    pool: ConnectionPool,
}

impl RedisBackend {
    /// Connect to Redis.
    ///
    /// # Arguments
    /// * `url` - Redis connection URL
    /// * `connect_timeout` - Deadline for each connection attempt
    /// * `pool` - Pool bounds, or `None` for a single connection
    pub async fn connect(
        url: &str,
        connect_timeout: Duration,
        pool: Option<PoolOptions>,
    ) -> Result<Self, BackendError> {
        let client = redis::Client::open(url)
            .map_err(|e| BackendError::Config(format!("invalid Redis URL '{}': {}", url, e)))?;
        let pool = ConnectionPool::open(client, pool, connect_timeout).await?;

        tracing::info!(
            url = %redact(url),
            connect_timeout_ms = connect_timeout.as_millis() as u64,
            pool_capacity = pool.capacity(),
            "Redis decision backend connected"
        );
        Ok(Self { pool })
    }
}

#[async_trait]
impl DecisionBackend for RedisBackend {
    async fn register(&self, source: &str, deadline: Duration) -> Result<ScriptHandle, BackendError> {
        let sha: String = bounded(deadline, async {
            let mut conn = self.pool.get().await?;
            let sha: String = redis::cmd("SCRIPT")
                .arg("LOAD")
                .arg(source)
                .query_async(&mut conn)
                .await?;
            Ok::<_, BackendError>(sha)
        })
        .await?;

        if sha.is_empty() {
            return Err(BackendError::UnexpectedReply("empty script SHA".into()));
        }
        tracing::info!(sha = %sha, "Evaluator script registered");
        Ok(ScriptHandle::new(sha))
    }

    async fn evaluate(
        &self,
        handle: &ScriptHandle,
        args: &[String],
        deadline: Duration,
    ) -> Result<String, BackendError> {
        bounded(deadline, async {
            let mut conn = self.pool.get().await?;
            let mut cmd = redis::cmd("EVALSHA");
            cmd.arg(handle.as_str()).arg(0);
            for arg in args {
                cmd.arg(arg);
            }
            let reply: String = cmd.query_async(&mut conn).await?;
            Ok::<_, BackendError>(reply)
        })
        .await
    }

    async fn announce(&self, metadata: &ClientMetadata, deadline: Duration) -> Result<(), BackendError> {
        let key = format!("{}:{}", ANNOUNCE_KEY_PREFIX, metadata.name);
        bounded(deadline, async {
            let mut conn = self.pool.get().await?;
            let _: () = redis::cmd("HSET")
                .arg(&key)
                .arg("name")
                .arg(&metadata.name)
                .arg("version")
                .arg(&metadata.version)
                .arg("started_at")
                .arg(metadata.started_at.to_string())
                .query_async(&mut conn)
                .await?;
            Ok::<_, BackendError>(())
        })
        .await
    }
}

/// Run a backend call under a deadline; expiry is a timeout-class failure.
async fn bounded<T, F>(deadline: Duration, call: F) -> Result<T, BackendError>
where
    F: Future<Output = Result<T, BackendError>>,
{
    match timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(BackendError::Timeout),
    }
}

/// Strip credentials from a connection URL before logging it.
fn redact(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            let _ = parsed.set_password(Some("***"));
            parsed.to_string()
        }
        Ok(parsed) => parsed.to_string(),
        Err(_) => url.to_string(),
    }
}
