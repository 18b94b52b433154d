//! Docker CLI adapter.

pub mod args;
pub mod client;
pub mod dto;

pub use client::{DockerCli, DOCKER_BIN_ENV};
