//! Infrastructure concerns: configuration files and host facts.

pub mod config;
pub mod host;
