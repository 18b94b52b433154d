//! Facts about the invoking host.

use std::io;
use std::path::{Path, PathBuf};

/// `uid:gid` of the invoking user, used so files written by the execution
/// container stay owned by them.
#[cfg(unix)]
#[must_use]
pub fn current_user() -> Option<String> {
    // SAFETY: geteuid and getegid cannot fail and touch no memory.
    let (uid, gid) = unsafe { (libc::geteuid(), libc::getegid()) };
    Some(format!("{uid}:{gid}"))
}

#[cfg(not(unix))]
#[must_use]
pub fn current_user() -> Option<String> {
    None
}

/// Number of logical CPUs; the default worker concurrency.
#[must_use]
pub fn logical_cpus() -> usize {
    num_cpus::get().max(1)
}

/// `path` resolved against the current directory when it is relative.
///
/// Purely lexical: nothing needs to exist and symlinks are not followed.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
