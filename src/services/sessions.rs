//! Session store service backed by Redis.
//!
//! The only per-session state is the landing-page visit counter, kept as an
//! explicit Redis key per session identifier rather than hidden process
//! state.

use redis::{AsyncCommands, Client};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct SessionService {
    client: Client,
}

impl SessionService {
    /// Create a new session service
    pub async fn new(url: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        // Test connection
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(Self { client })
    }

    /// Record one visit for a session and return the count of *prior* visits.
    ///
    /// A fresh session sees 0; after N visits the stored counter holds N.
    pub async fn record_visit(&self, session_id: &str) -> AppResult<i64> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))?;

        let key = format!("visits:{}", session_id);
        let stored: i64 = conn
            .incr(&key, 1)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to increment visit counter: {}", e)))?;

        Ok(stored - 1)
    }

    /// Read a session's visit counter without touching it
    pub async fn visit_count(&self, session_id: &str) -> AppResult<i64> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))?;

        let key = format!("visits:{}", session_id);
        let stored: Option<i64> = conn
            .get(&key)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read visit counter: {}", e)))?;

        Ok(stored.unwrap_or(0))
    }
}
