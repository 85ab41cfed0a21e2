// Raw stats snapshot -> percentages and megabyte totals. Pure functions, no I/O.

use std::collections::HashMap;

use crate::models::{BlkioEntry, DerivedMetrics, NetworkCounters, StatsSnapshot};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// CPU utilization across all cores, in percent.
///
/// Zero whenever the container or system delta is not strictly positive
/// (first sample, counter reset), so the result is never negative or infinite.
pub fn cpu_percent(s: &StatsSnapshot) -> f64 {
    let cpu_delta = s.cpu.total_usage as f64 - s.precpu.total_usage as f64;
    let system_delta = s.cpu.system_usage as f64 - s.precpu.system_usage as f64;
    let online_cpus = if s.cpu.online_cpus > 0 {
        s.cpu.online_cpus as f64
    } else {
        s.cpu.per_core_usage.len() as f64
    };
    if system_delta > 0.0 && cpu_delta > 0.0 {
        (cpu_delta / system_delta) * online_cpus * 100.0
    } else {
        0.0
    }
}

/// Memory usage as a percentage of the limit. A zero limit yields 0.
pub fn memory_percent(usage: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    100.0 * usage as f64 / limit as f64
}

/// (read, write) bytes summed over entries whose op is "read" / "write", any case.
pub fn block_io(entries: &[BlkioEntry]) -> (u64, u64) {
    entries.iter().fold((0u64, 0u64), |(read, write), e| {
        if e.op.eq_ignore_ascii_case("read") {
            (read.saturating_add(e.value), write)
        } else if e.op.eq_ignore_ascii_case("write") {
            (read, write.saturating_add(e.value))
        } else {
            (read, write)
        }
    })
}

/// (received, transmitted) bytes summed over every interface.
pub fn network(interfaces: &HashMap<String, NetworkCounters>) -> (u64, u64) {
    interfaces.values().fold((0u64, 0u64), |(rx, tx), n| {
        (rx.saturating_add(n.rx_bytes), tx.saturating_add(n.tx_bytes))
    })
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

pub fn derive(s: &StatsSnapshot) -> DerivedMetrics {
    let (net_read, net_write) = network(&s.networks);
    let (blk_read, blk_write) = block_io(&s.blkio);
    DerivedMetrics {
        cpu_percent: cpu_percent(s),
        memory_mb: bytes_to_mb(s.memory_usage),
        memory_percent: memory_percent(s.memory_usage, s.memory_limit),
        net_read_mb: bytes_to_mb(net_read),
        net_write_mb: bytes_to_mb(net_write),
        blk_read_mb: bytes_to_mb(blk_read),
        blk_write_mb: bytes_to_mb(blk_write),
        pids: s.pids,
    }
}
