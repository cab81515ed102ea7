//! Shared application state for request handlers.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::config::{AppConfig, MetricsSourceKind};
use crate::dependencies::DependencyProbes;
use crate::metrics::{FixedMetricsSource, MetricsSource, SystemMetricsSource};
use crate::ratelimit::RateLimiter;
use crate::readiness::{AlwaysReady, ReadinessCheck};

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Everything here is built once at process entry and threaded into the
/// router: configuration, the process start time, the metrics source, the
/// readiness check, dependency probes, and the rate limiter. Nothing mutates
/// after startup except the limiter's counters.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Wall-clock start time, reported as `startedAt`
    pub started_at: DateTime<Utc>,
    /// Monotonic start time, the basis for uptime
    start_instant: Instant,
    pub metrics: Arc<dyn MetricsSource>,
    pub readiness: Arc<dyn ReadinessCheck>,
    pub probes: Arc<DependencyProbes>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Creates application state with the capability implementations selected
    /// by configuration.
    pub fn new(config: AppConfig) -> Self {
        let metrics: Arc<dyn MetricsSource> = match config.metrics.source {
            MetricsSourceKind::System => Arc::new(SystemMetricsSource::new()),
            MetricsSourceKind::Fixed => Arc::new(FixedMetricsSource::new(&config.metrics)),
        };
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));

        Self {
            config: Arc::new(config),
            started_at: Utc::now(),
            start_instant: Instant::now(),
            metrics,
            readiness: Arc::new(AlwaysReady),
            probes: Arc::new(DependencyProbes::default()),
            limiter,
        }
    }

    /// Replace the readiness check (startup barriers, tests).
    pub fn with_readiness(mut self, readiness: Arc<dyn ReadinessCheck>) -> Self {
        self.readiness = readiness;
        self
    }

    /// Replace the metrics source (deterministic tests).
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSource>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Inject real dependency probes.
    pub fn with_probes(mut self, probes: DependencyProbes) -> Self {
        self.probes = Arc::new(probes);
        self
    }

    /// Elapsed wall-clock seconds since process start; monotonically
    /// non-decreasing for the process lifetime.
    pub fn uptime_seconds(&self) -> f64 {
        self.start_instant.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_monotonic() {
        let state = AppState::new(AppConfig::default());
        let first = state.uptime_seconds();
        let second = state.uptime_seconds();
        assert!(first >= 0.0);
        assert!(second >= first);
    }
}
