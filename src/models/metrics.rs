// Derived per-container metrics and the emitted log record

use serde::{Serialize, Serializer};

use super::ContainerSummary;

/// Point-in-time figures computed from one stats snapshot.
///
/// Serializes as the nested `stats` object of a log record: every figure is a
/// two-decimal string except `PIDS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedMetrics {
    #[serde(rename = "CPU_PCT", serialize_with = "two_places")]
    pub cpu_percent: f64,
    #[serde(rename = "MEM_MB", serialize_with = "two_places")]
    pub memory_mb: f64,
    #[serde(rename = "MEM_PCT", serialize_with = "two_places")]
    pub memory_percent: f64,
    #[serde(rename = "NET_READ_MB", serialize_with = "two_places")]
    pub net_read_mb: f64,
    #[serde(rename = "NET_WRITE_MB", serialize_with = "two_places")]
    pub net_write_mb: f64,
    #[serde(rename = "BLK_READ_MB", serialize_with = "two_places")]
    pub blk_read_mb: f64,
    #[serde(rename = "BLK_WRITE_MB", serialize_with = "two_places")]
    pub blk_write_mb: f64,
    #[serde(rename = "PIDS")]
    pub pids: u64,
}

fn two_places<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("{:.2}", v))
}

/// One container's result for one cycle: identity, runtime OS tag and metrics.
#[derive(Debug, Clone, Serialize)]
pub struct StatsRecord {
    #[serde(flatten)]
    pub container: ContainerSummary,
    pub os: String,
    pub stats: DerivedMetrics,
}

impl StatsRecord {
    /// The nested metrics object as JSON text.
    pub fn stats_json(&self) -> String {
        serde_json::to_string(&self.stats).unwrap_or_default()
    }

    /// Writes the record as a single INFO event. `names`, `labels` and `stats` are
    /// recorded as JSON text; the JSON log format nests them as real values
    /// (see `logging::JSON_VALUED_FIELDS`).
    pub fn emit(&self) {
        let names = serde_json::to_string(&self.container.names).unwrap_or_default();
        let labels = serde_json::to_string(&self.container.labels).unwrap_or_default();
        tracing::info!(
            container_id = %self.container.id,
            names = %names,
            image = %self.container.image,
            image_id = %self.container.image_id,
            labels = %labels,
            state = %self.container.state,
            status = %self.container.status,
            os = %self.os,
            stats = %self.stats_json(),
            "stats"
        );
    }
}
