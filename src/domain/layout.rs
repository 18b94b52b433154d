//! Host to container path mapping for the execution container.
//!
//! The execution container always mounts the install tree at
//! [`CONTAINER_INSTALL_ROOT`]. Directories that already live inside the
//! install tree are reached through that mount; directories outside it get a
//! dedicated mount point.

use std::path::{Component, Path, PathBuf};

pub const CONTAINER_INSTALL_ROOT: &str = "/opt/clp";
pub const CONTAINER_INPUT_LOGS_DIR: &str = "/mnt/logs";
pub const CONTAINER_DATA_DIR: &str = "/mnt/data";
pub const CONTAINER_LOGS_DIR: &str = "/mnt/log";
pub const CONTAINER_ARCHIVES_DIR: &str = "/mnt/archives";

/// Where a host directory appears inside the execution container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Reachable through the install tree mount; no extra binding needed.
    InInstallTree(PathBuf),
    /// Needs its own binding at the given mount point.
    Mounted(PathBuf),
}

impl Placement {
    #[must_use]
    pub fn container_path(&self) -> &Path {
        match self {
            Placement::InInstallTree(path) | Placement::Mounted(path) => path,
        }
    }

    #[must_use]
    pub fn needs_binding(&self) -> bool {
        matches!(self, Placement::Mounted(_))
    }
}

/// Host install tree and its container-side counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    host_root: PathBuf,
}

impl InstallLayout {
    #[must_use]
    pub fn new(host_root: impl Into<PathBuf>) -> Self {
        Self {
            host_root: host_root.into(),
        }
    }

    #[must_use]
    pub fn host_root(&self) -> &Path {
        &self.host_root
    }

    #[must_use]
    pub fn container_root(&self) -> &'static Path {
        Path::new(CONTAINER_INSTALL_ROOT)
    }

    /// Place a host directory, falling back to `mount_point` when it is
    /// outside the install tree.
    #[must_use]
    pub fn place(&self, host_dir: &Path, mount_point: &str) -> Placement {
        match host_dir.strip_prefix(&self.host_root) {
            Ok(relative) => Placement::InInstallTree(self.container_root().join(relative)),
            Err(_) => Placement::Mounted(PathBuf::from(mount_point)),
        }
    }

    /// Path of an install-relative file inside the container.
    #[must_use]
    pub fn container_file(&self, relative: &str) -> PathBuf {
        self.container_root().join(relative)
    }
}

/// Map `host_path` into the container if it lies under `host_dir`, which is
/// visible at `container_dir`.
///
/// A path with any `..` component is never mapped, since it can climb out
/// of `host_dir` after the prefix check.
#[must_use]
pub fn rebase(host_path: &Path, host_dir: &Path, container_dir: &Path) -> Option<PathBuf> {
    if host_path
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return None;
    }
    host_path
        .strip_prefix(host_dir)
        .ok()
        .map(|relative| container_dir.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_in_tree_directories_through_install_mount() {
        let layout = InstallLayout::new("/home/u/clp");
        let placement = layout.place(Path::new("/home/u/clp/var/c1/data"), CONTAINER_DATA_DIR);
        assert_eq!(
            placement,
            Placement::InInstallTree(PathBuf::from("/opt/clp/var/c1/data"))
        );
        assert!(!placement.needs_binding());
    }

    #[test]
    fn places_out_of_tree_directories_on_mount_point() {
        let layout = InstallLayout::new("/home/u/clp");
        let placement = layout.place(Path::new("/srv/data"), CONTAINER_DATA_DIR);
        assert_eq!(placement.container_path(), Path::new("/mnt/data"));
        assert!(placement.needs_binding());
    }

    #[test]
    fn sibling_prefix_is_not_inside_tree() {
        let layout = InstallLayout::new("/home/u/clp");
        let placement = layout.place(Path::new("/home/u/clp-data"), CONTAINER_DATA_DIR);
        assert!(placement.needs_binding());
    }

    #[test]
    fn rebase_maps_nested_paths() {
        let mapped = rebase(
            Path::new("/srv/logs/app/a.log"),
            Path::new("/srv/logs"),
            Path::new("/mnt/logs"),
        );
        assert_eq!(mapped, Some(PathBuf::from("/mnt/logs/app/a.log")));
        assert_eq!(
            rebase(Path::new("/etc/passwd"), Path::new("/srv/logs"), Path::new("/mnt/logs")),
            None
        );
    }

    #[test]
    fn rebase_refuses_parent_components() {
        let escape = rebase(
            Path::new("/srv/logs/../../etc/shadow"),
            Path::new("/srv/logs"),
            Path::new("/mnt/logs"),
        );
        assert_eq!(escape, None);
        assert_eq!(
            rebase(Path::new("/srv/logs/a/../b"), Path::new("/srv/logs"), Path::new("/mnt/logs")),
            None
        );
    }
}
