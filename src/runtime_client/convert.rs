// bollard API responses -> domain models. Missing optional fields map to 0 / empty.

use crate::models::{BlkioEntry, ContainerSummary, CpuSample, NetworkCounters, StatsSnapshot};
use bollard::models::{ContainerCpuStats, ContainerStatsResponse};

pub(crate) fn summary_from_docker(c: &bollard::models::ContainerSummary) -> ContainerSummary {
    ContainerSummary {
        id: c.id.clone().unwrap_or_default(),
        names: c.names.clone().unwrap_or_default(),
        image: c.image.clone().unwrap_or_default(),
        image_id: c.image_id.clone().unwrap_or_default(),
        labels: c
            .labels
            .as_ref()
            .map(|l| l.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default(),
        state: c.state.as_ref().map(|s| s.to_string()).unwrap_or_default(),
        status: c.status.clone().unwrap_or_default(),
    }
}

fn cpu_sample(c: Option<&ContainerCpuStats>) -> CpuSample {
    let Some(c) = c else {
        return CpuSample::default();
    };
    let usage = c.cpu_usage.as_ref();
    CpuSample {
        total_usage: usage.and_then(|u| u.total_usage).unwrap_or(0),
        system_usage: c.system_cpu_usage.unwrap_or(0),
        online_cpus: c.online_cpus.map(|n| n as u32).unwrap_or(0),
        per_core_usage: usage
            .and_then(|u| u.percpu_usage.clone())
            .unwrap_or_default(),
    }
}

/// Convert a one-shot stats response. `os_type` comes from the daemon, not the stats body.
pub(crate) fn snapshot_from_docker(s: &ContainerStatsResponse, os_type: &str) -> StatsSnapshot {
    let memory = s.memory_stats.as_ref();

    let networks = s
        .networks
        .as_ref()
        .map(|n| {
            n.iter()
                .map(|(name, v)| {
                    (
                        name.clone(),
                        NetworkCounters {
                            rx_bytes: v.rx_bytes.unwrap_or(0),
                            tx_bytes: v.tx_bytes.unwrap_or(0),
                        },
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    let blkio = s
        .blkio_stats
        .as_ref()
        .and_then(|b| b.io_service_bytes_recursive.as_ref())
        .map(|entries| {
            entries
                .iter()
                .map(|e| BlkioEntry {
                    op: e.op.clone().unwrap_or_default(),
                    value: e.value.unwrap_or(0),
                })
                .collect()
        })
        .unwrap_or_default();

    StatsSnapshot {
        cpu: cpu_sample(s.cpu_stats.as_ref()),
        precpu: cpu_sample(s.precpu_stats.as_ref()),
        memory_usage: memory.and_then(|m| m.usage).unwrap_or(0),
        memory_limit: memory.and_then(|m| m.limit).unwrap_or(0),
        networks,
        blkio,
        pids: s.pids_stats.as_ref().and_then(|p| p.current).unwrap_or(0),
        os_type: os_type.to_string(),
    }
}
