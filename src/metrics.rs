//! System metrics snapshots for the health report.
//!
//! `MetricsSource` is the injectable capability behind `/health`: the default
//! `SystemMetricsSource` samples the host via sysinfo, while
//! `FixedMetricsSource` serves deterministic values so tests can assert exact
//! numbers instead of ranges. Selection happens once at startup from
//! `[metrics]` config.
//!
//! Snapshots must never fail or block: any unreadable indicator degrades to
//! zero, because a health endpoint that errors on a metrics read defeats its
//! own purpose.

use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use sysinfo::{Disks, System};

use crate::config::MetricsConfig;

/// Ephemeral per-request view of host resource usage.
///
/// All percentages are in `[0, 100]`. `load_avg` is the 1/5/15-minute load
/// average triple; platforms without the concept report zeros.
#[derive(Debug, Clone, Serialize)]
pub struct SystemMetricsSnapshot {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
    #[serde(rename = "loadAvg")]
    pub load_avg: [f64; 3],
}

/// Capability interface for producing metric snapshots.
pub trait MetricsSource: Send + Sync {
    fn snapshot(&self) -> SystemMetricsSnapshot;
}

/// Real host sampling via sysinfo.
///
/// Keeps one `System` for the process lifetime so CPU usage is measured as a
/// delta since the previous refresh rather than always reading zero on a
/// freshly constructed `System`.
pub struct SystemMetricsSource {
    sys: Mutex<System>,
}

impl SystemMetricsSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        // Prime the CPU counters so the first request already has a baseline.
        sys.refresh_cpu_usage();
        Self { sys: Mutex::new(sys) }
    }
}

impl Default for SystemMetricsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSource for SystemMetricsSource {
    fn snapshot(&self) -> SystemMetricsSnapshot {
        let mut sys = self.sys.lock().unwrap_or_else(PoisonError::into_inner);
        sys.refresh_memory();
        sys.refresh_cpu_usage();

        let total = sys.total_memory();
        let free = sys.free_memory();
        let memory = if total == 0 {
            0.0
        } else {
            round2((total - free) as f64 / total as f64 * 100.0)
        };

        let cpu = clamp_pct(sys.global_cpu_usage() as f64);
        drop(sys);

        let load = System::load_average();

        SystemMetricsSnapshot {
            cpu,
            memory: clamp_pct(memory),
            disk: disk_usage_pct(),
            load_avg: [load.one, load.five, load.fifteen],
        }
    }
}

/// Aggregate used-space percentage across all mounted disks.
fn disk_usage_pct() -> f64 {
    let disks = Disks::new_with_refreshed_list();
    let (mut total, mut available) = (0u64, 0u64);
    for disk in disks.list() {
        total = total.saturating_add(disk.total_space());
        available = available.saturating_add(disk.available_space());
    }
    if total == 0 {
        return 0.0;
    }
    clamp_pct(round2((total - available) as f64 / total as f64 * 100.0))
}

/// Deterministic source for tests and demos; values come straight from config.
pub struct FixedMetricsSource {
    cpu: f64,
    memory: f64,
    disk: f64,
}

impl FixedMetricsSource {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            cpu: clamp_pct(config.fixed_cpu),
            memory: clamp_pct(config.fixed_memory),
            disk: clamp_pct(config.fixed_disk),
        }
    }
}

impl MetricsSource for FixedMetricsSource {
    fn snapshot(&self) -> SystemMetricsSnapshot {
        SystemMetricsSnapshot {
            cpu: self.cpu,
            memory: self.memory,
            disk: self.disk,
            load_avg: [0.0, 0.0, 0.0],
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn clamp_pct(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_snapshot_stays_in_range() {
        let source = SystemMetricsSource::new();
        let snapshot = source.snapshot();
        assert!((0.0..=100.0).contains(&snapshot.cpu));
        assert!((0.0..=100.0).contains(&snapshot.memory));
        assert!((0.0..=100.0).contains(&snapshot.disk));
        for load in snapshot.load_avg {
            assert!(load >= 0.0);
        }
    }

    #[test]
    fn fixed_source_returns_configured_values() {
        let config = MetricsConfig {
            fixed_cpu: 12.5,
            fixed_memory: 48.2,
            fixed_disk: 73.0,
            ..MetricsConfig::default()
        };
        let snapshot = FixedMetricsSource::new(&config).snapshot();
        assert_eq!(snapshot.cpu, 12.5);
        assert_eq!(snapshot.memory, 48.2);
        assert_eq!(snapshot.disk, 73.0);
        assert_eq!(snapshot.load_avg, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn fixed_source_clamps_out_of_range_config() {
        let config = MetricsConfig {
            fixed_cpu: 250.0,
            fixed_memory: -4.0,
            ..MetricsConfig::default()
        };
        let snapshot = FixedMetricsSource::new(&config).snapshot();
        assert_eq!(snapshot.cpu, 100.0);
        assert_eq!(snapshot.memory, 0.0);
    }

    #[test]
    fn rounding_is_two_decimals() {
        assert_eq!(round2(66.66666), 66.67);
        assert_eq!(round2(0.004), 0.0);
    }

    #[test]
    fn non_finite_values_degrade_to_zero() {
        assert_eq!(clamp_pct(f64::NAN), 0.0);
        assert_eq!(clamp_pct(f64::INFINITY), 0.0);
    }

    #[test]
    fn snapshot_serializes_with_wire_field_names() {
        let snapshot = SystemMetricsSnapshot {
            cpu: 1.0,
            memory: 2.0,
            disk: 3.0,
            load_avg: [0.1, 0.2, 0.3],
        };
        let value = serde_json::to_value(&snapshot).expect("serialize");
        assert!(value.get("loadAvg").is_some());
        assert_eq!(value["cpu"], 1.0);
    }
}
