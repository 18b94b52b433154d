//! Explicit initialization state of a cluster.

use super::runtime::RuntimeConfig;

/// Whether a cluster's runtime configuration has been synthesized.
///
/// Obtained from a single read of the persisted config location, never from
/// a separate existence check.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterState {
    /// No runtime configuration has been persisted for this cluster.
    Uninitialized,
    /// A runtime configuration exists and is authoritative.
    Provisioned(RuntimeConfig),
}

impl ClusterState {
    #[must_use]
    pub fn is_provisioned(&self) -> bool {
        matches!(self, ClusterState::Provisioned(_))
    }

    #[must_use]
    pub fn config(&self) -> Option<&RuntimeConfig> {
        match self {
            ClusterState::Provisioned(config) => Some(config),
            ClusterState::Uninitialized => None,
        }
    }

    #[must_use]
    pub fn into_config(self) -> Option<RuntimeConfig> {
        match self {
            ClusterState::Provisioned(config) => Some(config),
            ClusterState::Uninitialized => None,
        }
    }
}
