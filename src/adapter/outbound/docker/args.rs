//! Argument builders and stderr classifiers for the docker CLI.
//!
//! Everything here is pure so the exact command lines can be tested without
//! a container engine.

use crate::domain::service::ServiceDescriptor;
use crate::port::ExecRequest;

/// Format string selecting the attached containers of a network.
pub const NETWORK_CONTAINERS_FORMAT: &str = "{{json .Containers}}";

fn strings<const N: usize>(args: [&str; N]) -> Vec<String> {
    args.iter().map(|s| (*s).to_string()).collect()
}

pub fn network_create(name: &str) -> Vec<String> {
    strings(["network", "create", "--driver", "bridge", name])
}

pub fn network_inspect(name: &str) -> Vec<String> {
    strings([
        "network",
        "inspect",
        "--format",
        NETWORK_CONTAINERS_FORMAT,
        name,
    ])
}

pub fn network_remove(name: &str) -> Vec<String> {
    strings(["network", "rm", name])
}

/// `docker run` for a detached service container on its cluster network.
pub fn run(service: &ServiceDescriptor) -> Vec<String> {
    let mut args = strings([
        "run",
        "--detach",
        "--network",
        service.network.as_str(),
        "--hostname",
        service.hostname.as_str(),
        "--name",
        service.name.as_str(),
    ]);
    if service.interactive {
        args.push("--interactive".to_string());
    }
    if let Some(user) = &service.user {
        args.push("--user".to_string());
        args.push(user.clone());
    }
    for volume in &service.volumes {
        let mut mount = format!(
            "type=bind,src={},dst={}",
            volume.host.display(),
            volume.container.display()
        );
        if volume.read_only {
            mount.push_str(",readonly");
        }
        args.push("--mount".to_string());
        args.push(mount);
    }
    for (key, value) in &service.env {
        args.push("--env".to_string());
        args.push(format!("{key}={value}"));
    }
    if let Some(port) = service.published_port {
        args.push("--publish".to_string());
        args.push(format!("{}:{}", port.host, port.container));
    }
    args.push(service.image.clone());
    args.extend(service.command.iter().cloned());
    args
}

pub fn stop(container: &str) -> Vec<String> {
    strings(["stop", container])
}

pub fn remove(container: &str) -> Vec<String> {
    strings(["rm", container])
}

pub fn exec(container: &str, request: &ExecRequest) -> Vec<String> {
    let mut args = vec!["exec".to_string()];
    if request.detach {
        args.push("--detach".to_string());
    }
    if let Some(dir) = &request.workdir {
        args.push("--workdir".to_string());
        args.push(dir.display().to_string());
    }
    for (key, value) in &request.env {
        args.push("--env".to_string());
        args.push(format!("{key}={value}"));
    }
    args.push(container.to_string());
    args.extend(request.command.iter().cloned());
    args
}

/// Command line for logs and error messages, with `--env` values hidden.
#[must_use]
pub fn redacted(program: &str, args: &[String]) -> String {
    let mut parts = vec![program.to_string()];
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            let key = arg.split_once('=').map_or(arg.as_str(), |(k, _)| k);
            parts.push(format!("{key}=***"));
        } else {
            parts.push(arg.clone());
        }
        hide_next = arg == "--env";
    }
    parts.join(" ")
}

pub fn is_network_conflict(stderr: &str) -> bool {
    stderr.contains("already exists")
}

pub fn is_missing_network(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("no such network") || (lower.contains("network") && lower.contains("not found"))
}

pub fn is_name_conflict(stderr: &str) -> bool {
    stderr.contains("is already in use")
}
