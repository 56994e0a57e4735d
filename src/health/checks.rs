use super::models::{ComponentHealth, HealthReport};
use crate::store::ConversationStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const SLOW_RESPONSE_THRESHOLD_MS: u64 = 1000;

pub struct HealthChecker {
    store: Arc<dyn ConversationStore>,
    start_time: Instant,
}

impl HealthChecker {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }

    pub async fn check_all(&self) -> HealthReport {
        let version = env!("CARGO_PKG_VERSION").to_string();
        let uptime = self.start_time.elapsed().as_secs();
        let mut report = HealthReport::new(version, uptime);

        let database = timeout(CHECK_TIMEOUT, self.check_database())
            .await
            .unwrap_or_else(|_| ComponentHealth::unhealthy("Timeout".to_string()));
        report.add_component("database", database);

        report
    }

    #[tracing::instrument(name = "Check database health", skip(self))]
    async fn check_database(&self) -> ComponentHealth {
        let start = Instant::now();

        match self.store.ping().await {
            Ok(()) => {
                let elapsed = start.elapsed().as_millis() as u64;
                if elapsed > SLOW_RESPONSE_THRESHOLD_MS {
                    ComponentHealth::degraded("Database responding slowly".to_string(), elapsed)
                } else {
                    ComponentHealth::healthy(elapsed)
                }
            }
            Err(e) => {
                tracing::error!("Database health check failed: {:?}", e);
                ComponentHealth::unhealthy(format!("Database error: {}", e))
            }
        }
    }
}
