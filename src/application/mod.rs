//! Application services (use cases).
//!
//! These services implement the cluster lifecycle on top of the domain
//! types and the [`ContainerRuntime`](crate::port::ContainerRuntime) port.
//! [`orchestrator::ClusterOrchestrator`] ties them together; the command
//! wrappers live in [`dispatch`].

pub mod dispatch;
pub mod ephemeral;
pub mod launcher;
pub mod network;
pub mod orchestrator;
pub mod process;
pub mod readiness;
pub mod schema;
pub mod services;
pub mod synthesizer;
pub mod teardown;

pub use dispatch::Dispatcher;
pub use orchestrator::{ClusterOrchestrator, StartReport};
pub use readiness::{ReadinessPoller, RetryPolicy};
pub use teardown::TeardownReport;
