// Domain models

mod container;
mod metrics;
mod snapshot;

pub use container::ContainerSummary;
pub use metrics::{DerivedMetrics, StatsRecord};
pub use snapshot::{BlkioEntry, CpuSample, NetworkCounters, StatsSnapshot};
