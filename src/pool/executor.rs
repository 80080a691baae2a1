//! Executor contracts

use crate::core::{task, Result, Task};
use std::fmt;

/// Lifecycle state of a pool.
///
/// Transitions only ever move forward: `Created -> Running -> Stopped`, or
/// `Created -> Stopped` when a pool is stopped before it was started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoolState {
    /// Constructed, no worker threads yet
    Created,
    /// Worker threads are running
    Running,
    /// Stopped; every worker thread has been joined
    Stopped,
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PoolState::Created => "created",
            PoolState::Running => "running",
            PoolState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Start/stop lifecycle shared by every pool.
///
/// Both operations are idempotent and safe to call concurrently: the side
/// effects of each transition happen exactly once.
pub trait Executor: Send + Sync {
    /// Create the worker threads. Later calls do nothing.
    fn start(&self) -> Result<()>;

    /// Signal every worker to exit and join them all. Later calls do nothing.
    fn stop(&self) -> Result<()>;
}

/// An executor that accepts tasks.
pub trait TaskExecutor: Executor {
    /// Queue a task for execution on some worker.
    ///
    /// Never rejects. A task posted after `stop` is accepted and never runs.
    fn post(&self, task: Task);

    /// Box a closure and [`post`](Self::post) it.
    fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
        Self: Sized,
    {
        self.post(task(f));
    }
}
