// Domain models: raw collector payload, canonical host, published snapshot

mod host;
mod raw;
mod snapshot;

pub use host::{
    CanonicalHost, DISABLED_STATUS_CODE, HostStatus, NOT_AVAILABLE, UNGROUPED, primary_group,
};
pub use raw::{RawHostGroup, RawMetrics, RawPayload, RawTelemetryRecord};
pub use snapshot::{DashboardSnapshot, DashboardSummary, StatusCounts, distinct_groups};
