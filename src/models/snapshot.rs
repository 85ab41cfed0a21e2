// Raw stats snapshot models

use std::collections::HashMap;

/// Cumulative CPU counters from one sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuSample {
    /// Container CPU time (ns).
    pub total_usage: u64,
    /// Host-wide CPU time (ns).
    pub system_usage: u64,
    /// 0 when the runtime did not report it.
    pub online_cpus: u32,
    pub per_core_usage: Vec<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkCounters {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// One block-I/O service-bytes entry. `op` is free text ("Read", "write", "Sync", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlkioEntry {
    pub op: String,
    pub value: u64,
}

/// A single stats read for one container, paired with the runtime's previous CPU sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSnapshot {
    pub cpu: CpuSample,
    pub precpu: CpuSample,
    pub memory_usage: u64,
    pub memory_limit: u64,
    pub networks: HashMap<String, NetworkCounters>,
    pub blkio: Vec<BlkioEntry>,
    pub pids: u64,
    pub os_type: String,
}
