// One collection cycle: list running containers, fetch stats for each in its own
// task, derive metrics and emit one log record per container.
// Tasks are independent: a failed fetch only drops that container's record.

use crate::derive;
use crate::models::{ContainerSummary, StatsRecord};
use crate::runtime_client::{RuntimeClient, RuntimeError};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error};

#[derive(Clone)]
pub struct Collector {
    client: Arc<dyn RuntimeClient>,
    /// Caps concurrent stats fetches when set; `None` means one fetch per container at once.
    fetch_limit: Option<Arc<Semaphore>>,
}

impl Collector {
    pub fn new(client: Arc<dyn RuntimeClient>, max_concurrent_fetches: Option<usize>) -> Self {
        Self {
            client,
            fetch_limit: max_concurrent_fetches.map(|n| Arc::new(Semaphore::new(n))),
        }
    }

    /// Runs one cycle. Returns the per-container task handles; dropping them detaches
    /// the tasks. The handles carry no success signal, outcomes are only logged.
    pub async fn run_cycle(&self) -> Vec<JoinHandle<()>> {
        let containers = match self.client.list_running().await {
            Ok(c) => c,
            Err(e) => {
                error!(error = %e, "error getting container list");
                Vec::new()
            }
        };
        debug!(containers = containers.len(), "collection cycle started");

        containers
            .into_iter()
            .map(|container| {
                let this = self.clone();
                tokio::spawn(async move {
                    match this.collect_one(&container).await {
                        Ok(record) => record.emit(),
                        Err(e) => {
                            error!(
                                error = %e,
                                container = %container.display_name(),
                                "error getting container stats"
                            );
                        }
                    }
                })
            })
            .collect()
    }

    /// Fetch one container's snapshot and derive its record.
    pub async fn collect_one(
        &self,
        container: &ContainerSummary,
    ) -> Result<StatsRecord, RuntimeError> {
        let snapshot = match &self.fetch_limit {
            Some(limit) => {
                let _permit = limit
                    .acquire()
                    .await
                    .map_err(|e| RuntimeError::Unavailable(e.to_string()))?;
                self.client.stats(&container.id).await?
            }
            None => self.client.stats(&container.id).await?,
        };
        let stats = derive::derive(&snapshot);
        Ok(StatsRecord {
            container: container.clone(),
            os: snapshot.os_type,
            stats,
        })
    }
}
