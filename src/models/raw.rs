// Collector payload models (webhook-delivered host telemetry, untrusted)

use serde::{Deserialize, Serialize};

/// One host as delivered by the collector. Field names follow the collector's JSON.
///
/// `hostid` and `host` are required: a record missing either fails the whole
/// payload as malformed, and the poll keeps the previous hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTelemetryRecord {
    pub hostid: String,
    pub host: String,
    /// Visible name; the technical `host` name is used when absent.
    pub name: Option<String>,
    /// Raw status code: "0" enabled, "1" administratively disabled.
    pub status: Option<String>,
    pub ip: Option<String>,
    pub hostgroups: Option<Vec<RawHostGroup>>,
    pub metrics: Option<RawMetrics>,
    /// Collection timestamp as sent by the collector (not parsed).
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHostGroup {
    pub groupid: Option<String>,
    pub name: Option<String>,
}

/// Percentages for cpu/memory/disk; uptime is a preformatted string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetrics {
    pub cpu: Option<f64>,
    pub memory: Option<f64>,
    pub disk: Option<f64>,
    pub uptime: Option<String>,
}

/// Response body: either a bare record or an array of records.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPayload {
    Many(Vec<RawTelemetryRecord>),
    One(Box<RawTelemetryRecord>),
}

impl RawPayload {
    /// Flatten to a sequence; a single object becomes a one-element result set.
    pub fn into_records(self) -> Vec<RawTelemetryRecord> {
        match self {
            RawPayload::Many(records) => records,
            RawPayload::One(record) => vec![*record],
        }
    }
}
