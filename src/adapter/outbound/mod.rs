//! Outbound adapters implementing the port traits.

pub mod docker;
