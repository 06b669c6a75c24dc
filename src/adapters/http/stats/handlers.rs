//! HTTP handler for service statistics.
//!
//! Counters are expensive full-table scans, so they sit behind an
//! explicit TTL cache owned by the HTTP state. Uptime is recomputed on
//! every request; only the counters are cached.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::adapters::http::ErrorResponse;
use crate::domain::foundation::Timestamp;
use crate::ports::{ServiceStats, StatsReader};

/// How long cached counters stay fresh.
pub const STATS_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Process-wide counter cache with explicit TTL invalidation.
pub struct StatsCache {
    ttl: Duration,
    slot: RwLock<Option<(Instant, ServiceStats)>>,
}

impl StatsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Returns cached counters while they are within the TTL.
    pub async fn get(&self) -> Option<ServiceStats> {
        let slot = self.slot.read().await;
        match slot.as_ref() {
            Some((cached_at, stats)) if cached_at.elapsed() < self.ttl => Some(stats.clone()),
            _ => None,
        }
    }

    /// Replaces the cached counters.
    pub async fn put(&self, stats: ServiceStats) {
        *self.slot.write().await = Some((Instant::now(), stats));
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct StatsState {
    reader: Arc<dyn StatsReader>,
    cache: Arc<StatsCache>,
    started_at: Instant,
}

impl StatsState {
    pub fn new(reader: Arc<dyn StatsReader>, cache: Arc<StatsCache>) -> Self {
        Self {
            reader,
            cache,
            started_at: Instant::now(),
        }
    }
}

/// Statistics response body.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub counters: ServiceStats,
    pub server_uptime: UptimeResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct UptimeResponse {
    pub seconds: u64,
    pub formatted: String,
}

impl UptimeResponse {
    fn since(started_at: Instant) -> Self {
        let seconds = started_at.elapsed().as_secs();
        let days = seconds / 86_400;
        let hours = (seconds % 86_400) / 3_600;
        let minutes = (seconds % 3_600) / 60;
        let secs = seconds % 60;
        Self {
            seconds,
            formatted: format!("{}d {}h {}m {}s", days, hours, minutes, secs),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/v1/stats - Service-wide statistics (counters cached)
pub async fn get_stats(State(state): State<StatsState>) -> Response {
    let counters = match state.cache.get().await {
        Some(cached) => cached,
        None => {
            let today_start = Timestamp::start_of_today();
            match state.reader.service_stats(&today_start).await {
                Ok(fresh) => {
                    state.cache.put(fresh.clone()).await;
                    fresh
                }
                Err(e) => {
                    tracing::error!("Failed to collect stats: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse::internal("Failed to collect stats")),
                    )
                        .into_response();
                }
            }
        }
    };

    let response = StatsResponse {
        counters,
        server_uptime: UptimeResponse::since(state.started_at),
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_cache_misses() {
        let cache = StatsCache::new(Duration::from_secs(60));
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn cache_hits_within_ttl() {
        let cache = StatsCache::new(Duration::from_secs(60));
        cache
            .put(ServiceStats {
                total_rolls: 7,
                ..Default::default()
            })
            .await;
        assert_eq!(cache.get().await.unwrap().total_rolls, 7);
    }

    #[tokio::test]
    async fn cache_expires_after_ttl() {
        let cache = StatsCache::new(Duration::from_millis(10));
        cache.put(ServiceStats::default()).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(cache.get().await.is_none());
    }

    #[test]
    fn uptime_formats_components() {
        let uptime = UptimeResponse::since(Instant::now());
        assert!(uptime.formatted.ends_with('s'));
        assert!(uptime.seconds < 5);
    }
}
