//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`runtime`] - In-memory [`ContainerRuntime`](crate::port::ContainerRuntime)
//!   with scripted failures and a call log.
//! - [`clock`] - A [`Sleeper`](crate::port::Sleeper) that records instead of
//!   waiting.
//! - [`config`] - Canonical runtime configs and retry policies.

pub mod clock;
pub mod config;
pub mod runtime;
