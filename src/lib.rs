//! Agent Health API: liveness, readiness, and aggregate health reporting
//! for a single service instance.
//!
//! The crate is a set of stateless request handlers over axum. Process
//! start time, configuration, and the capability implementations (metrics
//! source, readiness check, dependency probes) are built once at process
//! entry, held in [`state::AppState`], and threaded into the router, so the
//! core is testable without a network listener.

pub mod config;
pub mod dependencies;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod ratelimit;
pub mod readiness;
pub mod report;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod state;
