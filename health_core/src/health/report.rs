//! Health statuses, probe results, and aggregated reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Severity-ordered health verdict. The derived `Ord` gives
/// `Healthy < Degraded < Unhealthy`, which is what report aggregation
/// relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded => write!(f, "degraded"),
            HealthStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Outcome of a single probe invocation. Immutable once produced; the
/// aggregator stamps `duration_ms` when the check resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub status: HealthStatus,
    pub description: Option<String>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl ProbeResult {
    pub fn healthy(description: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            description: Some(description.into()),
            error: None,
            duration_ms: 0,
        }
    }

    pub fn degraded(description: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Degraded,
            description: Some(description.into()),
            error: None,
            duration_ms: 0,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            description: None,
            error: Some(error.into()),
            duration_ms: 0,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis() as u64;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub result: ProbeResult,
}

/// Combined verdict for one aggregation cycle. Entries keep registration
/// order; `overall_status` is always the worst status seen so far, and an
/// empty report is healthy.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub overall_status: HealthStatus,
    pub entries: Vec<ReportEntry>,
    pub generated_at: DateTime<Utc>,
    pub total_duration_ms: u64,
}

impl Report {
    pub fn new() -> Self {
        Self {
            overall_status: HealthStatus::Healthy,
            entries: Vec::new(),
            generated_at: Utc::now(),
            total_duration_ms: 0,
        }
    }

    pub fn push(&mut self, name: impl Into<String>, result: ProbeResult) {
        self.overall_status = self.overall_status.max(result.status);
        self.entries.push(ReportEntry {
            name: name.into(),
            result,
        });
    }

    pub fn get(&self, name: &str) -> Option<&ProbeResult> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.result)
    }

    pub fn is_healthy(&self) -> bool {
        self.overall_status == HealthStatus::Healthy
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}
