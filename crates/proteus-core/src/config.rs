//! World configuration

use serde::{Deserialize, Serialize};

/// Configuration for a [`World`](crate::World)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Maximum nesting of sends and evaluations before the chain is aborted
    pub max_send_depth: usize,

    /// Number of entity cells reserved up front
    pub initial_capacity: usize,

    /// Nesting below which `inspect` stops expanding entities
    pub max_inspect_depth: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            // Each nested send costs several host frames; 256 levels fit a
            // 2 MiB thread stack in debug builds.
            max_send_depth: 256,
            initial_capacity: 64,
            max_inspect_depth: 64,
        }
    }
}
