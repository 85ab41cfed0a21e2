// Container listing models

use serde::Serialize;
use std::collections::BTreeMap;

/// One running container as reported by the runtime's list call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    pub id: String,
    pub names: Vec<String>,
    pub image: String,
    pub image_id: String,
    pub labels: BTreeMap<String, String>,
    /// Lifecycle state as the runtime reports it (e.g. "running").
    pub state: String,
    /// Human-readable status (e.g. "Up 5 minutes").
    pub status: String,
}

impl ContainerSummary {
    /// First name without the leading slash, or the id when unnamed.
    pub fn display_name(&self) -> &str {
        self.names
            .first()
            .map(|n| n.trim_start_matches('/'))
            .unwrap_or(&self.id)
    }
}
