//! clpctl - lifecycle orchestrator for a single-host CLP cluster.
//!
//! A CLP cluster is a database, a message queue and an execution container
//! joined by a private container network, plus a scheduler and a worker
//! pool running inside the execution container. This crate brings such a
//! cluster up in dependency order, tears it down by network membership and
//! dispatches compression, decompression and search into it.
//!
//! # Architecture
//!
//! - **`domain`** - cluster spec, derived runtime config, install layout,
//!   service descriptors, start plan and membership. No I/O.
//! - **`port`** - the [`ContainerRuntime`](port::ContainerRuntime) and
//!   [`Sleeper`](port::Sleeper) seams.
//! - **`application`** - config synthesis, readiness polling, service and
//!   process launch, schema initialization, teardown and command dispatch.
//! - **`adapter`** - the docker CLI runtime and the `clpctl` command line.
//! - **`infrastructure`** - persisted runtime config, logging and host
//!   facts.
//!
//! # Features
//!
//! - `testkit` - in-memory runtime and recording sleeper for tests
//!
//! # Example
//!
//! ```no_run
//! use clpctl::adapter::outbound::docker::DockerCli;
//! use clpctl::application::{ClusterOrchestrator, ReadinessPoller, RetryPolicy};
//! use clpctl::domain::layout::InstallLayout;
//! use clpctl::domain::spec::ClusterSpec;
//! use clpctl::port::ThreadSleeper;
//!
//! let orchestrator = ClusterOrchestrator::new(
//!     DockerCli::from_env(),
//!     ReadinessPoller::new(RetryPolicy::default(), ThreadSleeper),
//!     InstallLayout::new("/opt/clp"),
//! );
//! let report = orchestrator.start(&ClusterSpec::named("c1"))?;
//! println!("started {} containers", report.containers.len());
//! # Ok::<(), clpctl::error::Error>(())
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
