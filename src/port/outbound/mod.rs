//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the infrastructure the orchestrator drives: the
//! container runtime and the passage of time.

pub mod clock;
pub mod container;
