use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tokio::sync::RwLock;

/// Sliding-window limiter for login attempts, keyed by client IP.
#[derive(Clone)]
pub struct RateLimiter {
    max_attempts: usize,
    window_secs: i64,
    attempts: Arc<RwLock<HashMap<String, Vec<i64>>>>,
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window_secs: i64) -> Self {
        Self {
            max_attempts,
            window_secs,
            attempts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Record an attempt; false once the key is over its budget.
    pub async fn check(&self, key: &str) -> bool {
        self.check_at(key, Utc::now().timestamp()).await
    }

    pub async fn check_at(&self, key: &str, now: i64) -> bool {
        let mut attempts = self.attempts.write().await;

        // Evict expired attempts and forget keys with none left,
        // so memory follows the number of active clients.
        attempts.retain(|_, hits| {
            hits.retain(|at| now - *at < self.window_secs);
            !hits.is_empty()
        });

        let hits = attempts.entry(key.to_string()).or_default();
        if hits.len() >= self.max_attempts {
            return false;
        }
        hits.push(now);
        true
    }

    /// Forget a key's history after a successful login.
    pub async fn reset(&self, key: &str) {
        self.attempts.write().await.remove(key);
    }
}
