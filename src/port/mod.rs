//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │       Application        │
//!                 │  (orchestration steps)   │
//!                 └────────────┬─────────────┘
//!                              │
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//!     ┌──────────────────┐            ┌─────────────────┐
//!     │ ContainerRuntime │            │     Sleeper     │
//!     │ (docker adapter) │            │ (thread sleep)  │
//!     └──────────────────┘            └─────────────────┘
//! ```

pub mod outbound;

pub use outbound::clock::{Sleeper, ThreadSleeper};
pub use outbound::container::{
    ContainerRuntime, ExecOutput, ExecRequest, NetworkCreation, RunOutcome,
};
