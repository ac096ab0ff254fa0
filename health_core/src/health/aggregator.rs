//! Concurrent probe execution and report assembly

use crate::error::AppError;
use crate::health::probe::Probe;
use crate::health::registry::Registry;
use crate::health::report::{HealthStatus, ProbeResult, Report};
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Runs every registered probe and combines the results into a [`Report`].
///
/// Each probe executes as its own task, bounded by its configured timeout
/// (or the aggregator default). A probe that times out, returns an error,
/// or panics is recorded as `Unhealthy` in the report; it never aborts the
/// run, so `run` is infallible.
pub struct Aggregator {
    registry: Arc<Registry>,
    default_timeout: Duration,
}

impl Aggregator {
    pub fn new(registry: Arc<Registry>, default_timeout: Duration) -> Self {
        Self {
            registry,
            default_timeout,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub async fn run(&self) -> Report {
        let started = Instant::now();
        let probes = self.registry.list();

        info!("running health checks for {} probes", probes.len());

        let mut names = Vec::with_capacity(probes.len());
        let mut handles = Vec::with_capacity(probes.len());
        for probe in probes {
            let probe = Arc::clone(probe);
            let deadline = probe.timeout().unwrap_or(self.default_timeout);
            names.push(probe.name().to_string());
            handles.push(tokio::spawn(Self::run_one(probe, deadline)));
        }

        // join_all preserves future order, so entries land in registration order.
        let outcomes = join_all(handles).await;

        let mut report = Report::new();
        for (name, outcome) in names.into_iter().zip(outcomes) {
            let result = match outcome {
                Ok(result) => result,
                Err(e) => ProbeResult::unhealthy(format!("probe task failed: {e}")),
            };

            match result.status {
                HealthStatus::Healthy => {
                    info!(probe = %name, duration_ms = result.duration_ms, "probe healthy");
                }
                HealthStatus::Degraded => {
                    warn!(
                        probe = %name,
                        duration_ms = result.duration_ms,
                        "probe degraded: {}",
                        result.description.as_deref().unwrap_or("")
                    );
                }
                HealthStatus::Unhealthy => {
                    error!(
                        probe = %name,
                        duration_ms = result.duration_ms,
                        "probe unhealthy: {}",
                        result.error.as_deref().unwrap_or("")
                    );
                }
            }

            report.push(name, result);
        }

        report.total_duration_ms = started.elapsed().as_millis() as u64;
        info!(
            "health checks finished in {}ms, overall status: {}",
            report.total_duration_ms, report.overall_status
        );

        report
    }

    /// Runs a single probe by name. `None` when no such probe is registered.
    pub async fn run_probe(&self, name: &str) -> Option<ProbeResult> {
        let probe = self.registry.get(name)?;
        let deadline = probe.timeout().unwrap_or(self.default_timeout);
        Some(Self::run_one(Arc::clone(probe), deadline).await)
    }

    async fn run_one(probe: Arc<dyn Probe>, deadline: Duration) -> ProbeResult {
        let start = Instant::now();

        match tokio::time::timeout(deadline, probe.check()).await {
            Ok(Ok(result)) => result.with_duration(start.elapsed()),
            Ok(Err(e)) => ProbeResult::unhealthy(e.to_string()).with_duration(start.elapsed()),
            Err(_) => {
                let timeout = AppError::ProbeTimeout {
                    elapsed_ms: deadline.as_millis() as u64,
                };
                ProbeResult::unhealthy(timeout.to_string()).with_duration(start.elapsed())
            }
        }
    }
}
