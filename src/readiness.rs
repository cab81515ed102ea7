//! Readiness as an injectable capability.
//!
//! The default build has no startup barrier, so readiness is a constant
//! `Ready`. The trait exists so a real gating condition (migrations applied,
//! caches warmed, upstream reachable) can be plugged in later without
//! touching the HTTP surface.

/// Trinary readiness verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Degraded,
    NotReady,
}

impl Readiness {
    /// Wire-level status keyword for `/health/ready`.
    pub fn as_str(self) -> &'static str {
        match self {
            Readiness::Ready => "ready",
            Readiness::Degraded => "degraded",
            Readiness::NotReady => "not_ready",
        }
    }

    /// A not-ready instance must be taken out of rotation; degraded still serves.
    pub fn is_serving(self) -> bool {
        !matches!(self, Readiness::NotReady)
    }
}

/// Capability interface consulted by `/health/ready`.
pub trait ReadinessCheck: Send + Sync {
    fn check(&self) -> Readiness;
}

/// Default check: the process is ready as soon as it can answer HTTP.
pub struct AlwaysReady;

impl ReadinessCheck for AlwaysReady {
    fn check(&self) -> Readiness {
        Readiness::Ready
    }
}
