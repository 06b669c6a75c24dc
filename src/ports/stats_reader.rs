//! Service statistics read port.

use crate::domain::foundation::{DomainError, Timestamp};
use async_trait::async_trait;
use serde::Serialize;

/// Aggregate counters for the whole service.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceStats {
    pub total_users: u64,
    pub guest_users: u64,
    pub registered_users: u64,
    pub total_decisions: u64,
    pub total_rolls: u64,
    pub new_users_today: u64,
    pub rolls_today: u64,
}

/// Read-only counters over the whole store.
#[async_trait]
pub trait StatsReader: Send + Sync {
    /// Collect service-wide counters. "Today" counters are measured from
    /// `today_start`.
    async fn service_stats(&self, today_start: &Timestamp) -> Result<ServiceStats, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_reader_is_object_safe() {
        fn _accepts_dyn(_r: &dyn StatsReader) {}
    }

    #[test]
    fn service_stats_serializes_to_json() {
        let stats = ServiceStats {
            total_users: 10,
            guest_users: 4,
            registered_users: 6,
            total_decisions: 25,
            total_rolls: 300,
            new_users_today: 1,
            rolls_today: 12,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_rolls"], 300);
    }
}
