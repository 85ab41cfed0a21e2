// Container runtime access: the RuntimeClient seam and its Docker implementation (bollard)

mod convert;

use crate::models::{ContainerSummary, StatsSnapshot};
use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{ListContainersOptions, StatsOptions};
use futures_util::StreamExt;
use std::collections::HashMap;
use tokio::sync::OnceCell;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Docker(#[from] bollard::errors::Error),
    #[error("no stats returned for container {id}")]
    EmptyStats { id: String },
    #[error("runtime unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to the container runtime.
///
/// Implementations are shared as `Arc<dyn RuntimeClient>` by the scheduler, every
/// per-container collection task and the HTTP layer at the same time, so every
/// method must be safe to call concurrently without external locking.
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// Currently running containers.
    async fn list_running(&self) -> Result<Vec<ContainerSummary>, RuntimeError>;

    /// One non-streaming stats read, including the runtime's previous CPU sample.
    async fn stats(&self, id: &str) -> Result<StatsSnapshot, RuntimeError>;

    /// Connectivity probe.
    async fn ping(&self) -> Result<(), RuntimeError>;
}

/// `RuntimeClient` over the Docker Engine API. `bollard::Docker` is a cloneable,
/// thread-safe handle, so one instance serves all callers.
pub struct DockerClient {
    docker: Docker,
    os_type: OnceCell<String>,
}

impl DockerClient {
    /// Connect using `DOCKER_HOST` or the platform's default socket.
    pub fn connect() -> Result<Self, RuntimeError> {
        let docker = Docker::connect_with_defaults()?;
        Ok(Self {
            docker,
            os_type: OnceCell::new(),
        })
    }

    /// Daemon OS ("linux", "windows"), fetched once. Empty when the daemon can't say.
    async fn os_type(&self) -> &str {
        let fetched = self
            .os_type
            .get_or_try_init(|| async {
                let v = self.docker.version().await?;
                Ok::<_, bollard::errors::Error>(v.os.unwrap_or_default())
            })
            .await;
        match fetched {
            Ok(os) => os.as_str(),
            Err(e) => {
                tracing::debug!(error = %e, "docker version lookup failed");
                ""
            }
        }
    }
}

#[async_trait]
impl RuntimeClient for DockerClient {
    async fn list_running(&self) -> Result<Vec<ContainerSummary>, RuntimeError> {
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["running".to_string()]);

        let options = ListContainersOptions {
            all: false,
            filters: Some(filters),
            ..Default::default()
        };
        let containers = self.docker.list_containers(Some(options)).await?;
        Ok(containers.iter().map(convert::summary_from_docker).collect())
    }

    async fn stats(&self, id: &str) -> Result<StatsSnapshot, RuntimeError> {
        let options = StatsOptions {
            stream: false,
            one_shot: false,
        };
        let mut stream = self.docker.stats(id, Some(options));
        let raw = match stream.next().await {
            Some(r) => r?,
            None => return Err(RuntimeError::EmptyStats { id: id.to_string() }),
        };
        let os_type = self.os_type().await;
        Ok(convert::snapshot_from_docker(&raw, os_type))
    }

    async fn ping(&self) -> Result<(), RuntimeError> {
        self.docker.ping().await?;
        Ok(())
    }
}
