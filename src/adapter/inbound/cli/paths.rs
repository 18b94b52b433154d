//! Path resolution for clpctl.
//!
//! The install root is taken from, in order: `--home`, `CLP_HOME`, the
//! directory two levels above the running executable (`<root>/bin/clpctl`),
//! then `~/.clp`. A relative root is taken from the current directory, so
//! everything derived from it is absolute. The cluster config defaults to
//! `<root>/etc/clp-config.toml`.

use std::io;
use std::path::{Path, PathBuf};

use crate::infrastructure::host;

/// Environment variable naming the install root.
pub const CLP_HOME_ENV: &str = "CLP_HOME";

const DEFAULT_CONFIG_RELATIVE: &str = "etc/clp-config.toml";

/// Resolve the install root for this invocation as an absolute path.
pub fn install_root(flag: Option<&Path>) -> io::Result<PathBuf> {
    let env = std::env::var_os(CLP_HOME_ENV).map(PathBuf::from);
    let exe = std::env::current_exe().ok();
    host::absolute(&resolve_install_root(flag, env.as_deref(), exe.as_deref()))
}

fn resolve_install_root(flag: Option<&Path>, env: Option<&Path>, exe: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if let Some(path) = env.filter(|p| !p.as_os_str().is_empty()) {
        return path.to_path_buf();
    }
    if let Some(root) = exe.and_then(Path::parent).and_then(Path::parent) {
        if !root.as_os_str().is_empty() {
            return root.to_path_buf();
        }
    }
    fallback_home()
}

/// `~/.clp`, or `./.clp` when there is no home directory.
pub fn fallback_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".clp")
}

/// Default cluster config file under `install_root`.
pub fn default_config(install_root: &Path) -> PathBuf {
    install_root.join(DEFAULT_CONFIG_RELATIVE)
}
