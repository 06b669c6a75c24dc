//! HTTP adapter for service statistics.

mod handlers;
mod routes;

pub use handlers::{StatsCache, StatsState, STATS_CACHE_TTL};
pub use routes::stats_routes;
