//! Cluster domain types. No I/O lives here.
//!
//! - [`spec`] - user-supplied [`ClusterSpec`](spec::ClusterSpec)
//! - [`runtime`] - derived, persisted [`RuntimeConfig`](runtime::RuntimeConfig)
//! - [`state`] - explicit initialization marker
//! - [`layout`] - host to container path mapping
//! - [`service`] - service container descriptors
//! - [`plan`] - ordered start steps with declared requirements
//! - [`membership`] - containers discovered on the cluster network

pub mod layout;
pub mod membership;
pub mod plan;
pub mod runtime;
pub mod service;
pub mod spec;
pub mod state;
