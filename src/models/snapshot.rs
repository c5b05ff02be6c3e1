// Published dashboard model and derived aggregates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::{CanonicalHost, HostStatus, UNGROUPED};

/// Host count per status plus total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub healthy: usize,
    pub warning: usize,
    pub critical: usize,
    pub unknown: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn tally(hosts: &[Arc<CanonicalHost>]) -> Self {
        let mut counts = StatusCounts {
            total: hosts.len(),
            ..Default::default()
        };
        for host in hosts {
            match host.status {
                HostStatus::Healthy => counts.healthy += 1,
                HostStatus::Warning => counts.warning += 1,
                HostStatus::Critical => counts.critical += 1,
                HostStatus::Unknown => counts.unknown += 1,
            }
        }
        counts
    }
}

/// Sorted, distinct group names, without the "Ungrouped" placeholder.
pub fn distinct_groups(hosts: &[Arc<CanonicalHost>]) -> Vec<String> {
    hosts
        .iter()
        .map(|h| h.group.as_str())
        .filter(|g| *g != UNGROUPED)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Everything the UI renders; replaced as a whole on every publish.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// First-seen order; new hosts are appended.
    pub hosts: Vec<Arc<CanonicalHost>>,
    /// True while a non-silent fetch is unsettled.
    pub loading: bool,
    /// Only set when a fetch failed and there is nothing to show.
    pub error: Option<String>,
    pub counts: StatusCounts,
    pub groups: Vec<String>,
    pub is_connected: bool,
    /// Time of the last successful fetch.
    pub last_updated: Option<DateTime<Utc>>,
    /// Ids added or changed by the most recent successful merge. Carried over
    /// unchanged by later publishes (loading toggles, failures).
    #[serde(default)]
    pub changed: Vec<String>,
    /// Ids evicted by the most recent successful merge.
    #[serde(default)]
    pub removed: Vec<String>,
    /// Bumped on every successful merge; a consumer that already saw this value
    /// has already applied `changed`/`removed`.
    #[serde(default)]
    pub merge_generation: u64,
}

impl DashboardSnapshot {
    pub fn host(&self, id: &str) -> Option<&Arc<CanonicalHost>> {
        self.hosts.iter().find(|h| h.id == id)
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            counts: self.counts,
            groups: self.groups.clone(),
            is_connected: self.is_connected,
            last_updated: self.last_updated,
            error: self.error.clone(),
        }
    }
}

/// Aggregates and connectivity without the host list (GET /api/summary).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub counts: StatusCounts,
    pub groups: Vec<String>,
    pub is_connected: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub error: Option<String>,
}
