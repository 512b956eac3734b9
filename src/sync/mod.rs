//! Coordination primitives for tasks that share a pipeline.
//!
//! - [`RunOnce`] - run an action exactly once across threads
//! - [`TaskBarrier`] - wait for a set of registered tasks to finish

mod barrier;
mod once;

pub use barrier::{BarrierError, CompletionToken, TaskBarrier};
pub use once::RunOnce;
