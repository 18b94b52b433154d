//! CLI module graph.

pub mod command;
pub mod config;
pub mod context;
pub mod diagnostic;
pub mod dispatch;
pub mod output;
pub mod paths;
pub mod start;
pub mod status;
pub mod stop;
