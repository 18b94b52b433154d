//! Cluster network provisioning.

use tracing::info;

use crate::domain::membership::ClusterMembership;
use crate::error::{Error, Result};
use crate::port::{ContainerRuntime, NetworkCreation};

/// Create the network named after `cluster`.
///
/// # Errors
///
/// [`Error::AlreadyProvisioned`] if the network exists; its consistency
/// with the current config cannot be verified, so it is never reused.
pub fn provision<R: ContainerRuntime>(runtime: &R, cluster: &str) -> Result<()> {
    match runtime.create_network(cluster)? {
        NetworkCreation::Created => {
            info!(cluster, "Created cluster network");
            Ok(())
        }
        NetworkCreation::AlreadyExists => Err(already_provisioned(cluster)),
    }
}

/// Fail early if the cluster network exists.
pub fn ensure_absent<R: ContainerRuntime>(runtime: &R, cluster: &str) -> Result<()> {
    match runtime.inspect_network(cluster)? {
        Some(_) => Err(already_provisioned(cluster)),
        None => Ok(()),
    }
}

/// Current members of the cluster network, if it exists.
pub fn membership<R: ContainerRuntime>(
    runtime: &R,
    cluster: &str,
) -> Result<Option<ClusterMembership>> {
    runtime.inspect_network(cluster)
}

fn already_provisioned(cluster: &str) -> Error {
    Error::AlreadyProvisioned {
        cluster: cluster.to_string(),
        resource: format!("network '{cluster}'"),
    }
}
