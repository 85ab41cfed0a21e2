// Shared test helpers: a scripted RuntimeClient

#![allow(dead_code)]

use async_trait::async_trait;
use docker_stats_agent::models::{ContainerSummary, CpuSample, StatsSnapshot};
use docker_stats_agent::runtime_client::{RuntimeClient, RuntimeError};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Default)]
pub struct StubClient {
    pub containers: Vec<ContainerSummary>,
    pub list_error: Option<String>,
    pub ping_error: Option<String>,
    /// Per-id snapshot; ids without one fail with `RuntimeError::EmptyStats`.
    pub snapshots: HashMap<String, StatsSnapshot>,
    pub list_calls: AtomicUsize,
    pub stats_calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl StubClient {
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn stats_calls(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    /// Highest number of `stats` calls that were in progress at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuntimeClient for StubClient {
    async fn list_running(&self) -> Result<Vec<ContainerSummary>, RuntimeError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match &self.list_error {
            Some(e) => Err(RuntimeError::Unavailable(e.clone())),
            None => Ok(self.containers.clone()),
        }
    }

    async fn stats(&self, id: &str) -> Result<StatsSnapshot, RuntimeError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        // Give sibling tasks a chance to start their own fetch.
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.snapshots
            .get(id)
            .cloned()
            .ok_or_else(|| RuntimeError::EmptyStats { id: id.to_string() })
    }

    async fn ping(&self) -> Result<(), RuntimeError> {
        match &self.ping_error {
            Some(e) => Err(RuntimeError::Unavailable(e.clone())),
            None => Ok(()),
        }
    }
}

pub fn container(id: &str, name: &str) -> ContainerSummary {
    ContainerSummary {
        id: id.to_string(),
        names: vec![format!("/{}", name)],
        image: "nginx:latest".to_string(),
        image_id: format!("sha256:{}", id),
        state: "running".to_string(),
        status: "Up 2 minutes".to_string(),
        ..Default::default()
    }
}

/// Snapshot whose CPU figure comes out at 40% (delta 100 / 1000 on 4 cpus).
pub fn busy_snapshot() -> StatsSnapshot {
    StatsSnapshot {
        cpu: CpuSample {
            total_usage: 200,
            system_usage: 2000,
            online_cpus: 4,
            per_core_usage: vec![],
        },
        precpu: CpuSample {
            total_usage: 100,
            system_usage: 1000,
            online_cpus: 4,
            per_core_usage: vec![],
        },
        memory_usage: 64 * 1024 * 1024,
        memory_limit: 256 * 1024 * 1024,
        pids: 3,
        os_type: "linux".to_string(),
        ..Default::default()
    }
}

/// In-memory log sink for a JSON-lines subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// A subscriber writing `JsonLines` output into this buffer. Install it with
    /// `tracing::subscriber::set_default` on a current-thread runtime.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + use<> {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .event_format(docker_stats_agent::logging::JsonLines)
            .finish()
    }

    pub fn lines(&self) -> Vec<serde_json::Value> {
        let out = String::from_utf8(self.0.lock().unwrap().clone()).unwrap();
        out.lines()
            .map(|l| serde_json::from_str(l).expect("log line is JSON"))
            .collect()
    }

    /// Lines whose message equals `message`.
    pub fn with_message(&self, message: &str) -> Vec<serde_json::Value> {
        self.lines()
            .into_iter()
            .filter(|v| v["message"] == message)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
