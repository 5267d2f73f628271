use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::{AppError, AppResult};
use crate::models::{MovieId, TrendingWindow};

/// Keys for cached upstream movie-data payloads
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Search(String),
    Trending(TrendingWindow),
    Details(MovieId),
    Popular,
    Recommendations(MovieId),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Search(query) => write!(f, "tmdb:search:{}", query.trim().to_lowercase()),
            CacheKey::Trending(window) => write!(f, "tmdb:trending:{}", window),
            CacheKey::Details(id) => write!(f, "tmdb:movie:{}", id),
            CacheKey::Popular => write!(f, "tmdb:popular"),
            CacheKey::Recommendations(id) => write!(f, "tmdb:recs:{}", id),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Pending write handed to the background writer
struct CacheWrite {
    key: String,
    value: String,
    ttl: u64,
}

/// Redis-backed cache for upstream payloads
///
/// Reads go straight to Redis; writes are queued on a channel and applied by
/// a background task so a slow cache never delays a response. Both share one
/// multiplexed connection that reconnects on failure.
#[derive(Clone)]
pub struct Cache {
    conn: ConnectionManager,
    write_tx: mpsc::UnboundedSender<CacheWrite>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    writer: tokio::task::JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer to flush queued writes and waits for it to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.writer.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

impl Cache {
    /// Connects to Redis and spawns the background writer
    pub async fn new(redis_client: Client) -> AppResult<(Self, CacheWriterHandle)> {
        let conn = ConnectionManager::new(redis_client).await?;
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let writer = tokio::spawn(Self::writer_task(conn.clone(), write_rx, shutdown_rx));

        let cache = Self { conn, write_tx };

        Ok((cache, CacheWriterHandle { shutdown_tx, writer }))
    }

    async fn writer_task(
        mut conn: ConnectionManager,
        mut write_rx: mpsc::UnboundedReceiver<CacheWrite>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");
        let mut failed_writes: u64 = 0;

        loop {
            tokio::select! {
                Some(write) = write_rx.recv() => {
                    if let Err(e) = Self::apply(&mut conn, write).await {
                        failed_writes += 1;
                        tracing::warn!(error = %e, failed_writes, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    // Senders live as long as any Cache clone, so drain what is
                    // already queued rather than waiting for the channel to close.
                    let mut flushed = 0usize;
                    while let Ok(write) = write_rx.try_recv() {
                        if let Err(e) = Self::apply(&mut conn, write).await {
                            tracing::warn!(
                                error = %e,
                                "Failed to flush cache write during shutdown"
                            );
                        } else {
                            flushed += 1;
                        }
                    }

                    tracing::info!(flushed, failed_writes, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn apply(conn: &mut ConnectionManager, write: CacheWrite) -> AppResult<()> {
        let _: () = conn.set_ex(write.key, write.value, write.ttl).await?;
        Ok(())
    }

    /// Looks up a cached payload, returning `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.conn.clone();
        let cached: Option<String> = conn.get(key.to_string()).await?;

        cached
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })
            })
            .transpose()
    }

    /// Queues a payload for caching without waiting for Redis
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let value = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        let write = CacheWrite {
            key: key.to_string(),
            value,
            ttl,
        };

        if self.write_tx.send(write).is_err() {
            tracing::warn!(key = %key, "Cache writer stopped, dropping write");
        }
    }
}
