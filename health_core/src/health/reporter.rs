//! Report serialization for machine and dashboard consumers
//!
//! Both functions are pure: they take a finished [`Report`] and produce a
//! JSON string, leaving status codes and headers to the HTTP layer. The two
//! shapes are deliberately separate so each contract can evolve on its own.

use crate::error::Result;
use crate::health::report::{HealthStatus, Report};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UI_SCHEMA_VERSION: u32 = 1;

/// Stable machine-readable contract:
/// `{"status": "...", "entries": [{"key", "status", "error"}]}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MachineReport {
    pub status: HealthStatus,
    pub entries: Vec<MachineEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MachineEntry {
    pub key: String,
    pub status: HealthStatus,
    pub error: Option<String>,
}

/// Versioned dashboard payload, richer than the machine contract.
#[derive(Debug, Serialize, Deserialize)]
pub struct UiReport {
    pub schema_version: u32,
    pub status: HealthStatus,
    pub generated_at: DateTime<Utc>,
    pub total_duration_ms: u64,
    pub probes: Vec<UiProbe>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UiProbe {
    pub name: String,
    pub status: HealthStatus,
    pub description: Option<String>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

pub fn to_machine_readable(report: &Report) -> Result<String> {
    let machine = MachineReport {
        status: report.overall_status,
        entries: report
            .entries
            .iter()
            .map(|entry| MachineEntry {
                key: entry.name.clone(),
                status: entry.result.status,
                error: entry.result.error.clone(),
            })
            .collect(),
    };

    Ok(serde_json::to_string(&machine)?)
}

pub fn to_ui_format(report: &Report) -> Result<String> {
    let ui = UiReport {
        schema_version: UI_SCHEMA_VERSION,
        status: report.overall_status,
        generated_at: report.generated_at,
        total_duration_ms: report.total_duration_ms,
        probes: report
            .entries
            .iter()
            .map(|entry| UiProbe {
                name: entry.name.clone(),
                status: entry.result.status,
                description: entry.result.description.clone(),
                error: entry.result.error.clone(),
                duration_ms: entry.result.duration_ms,
            })
            .collect(),
    };

    Ok(serde_json::to_string(&ui)?)
}
