// Canonical host model and status derivation

use serde::{Deserialize, Serialize};

use super::{RawHostGroup, RawMetrics, RawTelemetryRecord};

/// Group name used when a host reports no group membership.
pub const UNGROUPED: &str = "Ungrouped";

/// Placeholder for missing ip / uptime.
pub const NOT_AVAILABLE: &str = "N/A";

/// Raw status code of an administratively disabled host.
pub const DISABLED_STATUS_CODE: &str = "1";

const CRITICAL_THRESHOLD: f64 = 90.0;
const WARNING_THRESHOLD: f64 = 70.0;

/// Health classification; serializes to lowercase JSON (e.g. "critical").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    Healthy,
    Warning,
    Critical,
    Unknown,
}

impl HostStatus {
    /// Derive status from metrics and raw status code.
    ///
    /// A disabled host is critical whatever its metrics say. Without metrics the
    /// status is unknown. Otherwise cpu/memory (0 when missing) are compared with
    /// strict `>` against 90 (critical) and 70 (warning). Disk and uptime are
    /// informational only.
    pub fn derive(metrics: Option<&RawMetrics>, raw_status: Option<&str>) -> Self {
        if raw_status == Some(DISABLED_STATUS_CODE) {
            return HostStatus::Critical;
        }
        let Some(metrics) = metrics else {
            return HostStatus::Unknown;
        };
        let cpu = metrics.cpu.unwrap_or(0.0);
        let memory = metrics.memory.unwrap_or(0.0);
        if cpu > CRITICAL_THRESHOLD || memory > CRITICAL_THRESHOLD {
            HostStatus::Critical
        } else if cpu > WARNING_THRESHOLD || memory > WARNING_THRESHOLD {
            HostStatus::Warning
        } else {
            HostStatus::Healthy
        }
    }
}

/// Name of the first group membership, or [`UNGROUPED`] when there is none or it
/// has no name. Further memberships are dropped.
pub fn primary_group(groups: Option<&[RawHostGroup]>) -> String {
    groups
        .and_then(|g| g.first())
        .and_then(|g| g.name.clone())
        .unwrap_or_else(|| UNGROUPED.to_string())
}

/// Normalized, UI-ready host record. `id` is the merge key across polls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalHost {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub ip: String,
    pub status: HostStatus,
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
    pub uptime: String,
    pub group: String,
    pub last_update: Option<String>,
}

impl CanonicalHost {
    pub fn from_raw(raw: RawTelemetryRecord) -> Self {
        let status = HostStatus::derive(raw.metrics.as_ref(), raw.status.as_deref());
        let group = primary_group(raw.hostgroups.as_deref());
        let metrics = raw.metrics.unwrap_or_default();
        Self {
            display_name: raw.name.unwrap_or_else(|| raw.host.clone()),
            id: raw.hostid,
            name: raw.host,
            ip: raw.ip.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            status,
            cpu: metrics.cpu.unwrap_or(0.0),
            memory: metrics.memory.unwrap_or(0.0),
            disk: metrics.disk.unwrap_or(0.0),
            uptime: metrics.uptime.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            group,
            last_update: raw.timestamp,
        }
    }
}
