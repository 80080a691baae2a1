//! Worker thread handle and thread factories

use crate::core::{PoolError, Result};
use crate::pool::config::PoolConfig;
use log::{error, warn};
use std::any::Any;
use std::thread::{self, JoinHandle, ThreadId};

/// The closure every worker thread runs: the pool's shared worker loop.
pub type WorkerLoop = Box<dyn FnOnce() + Send + 'static>;

/// Owns exactly one native thread and joins it when dropped.
///
/// Move-only: the pool moves handles into its worker collection and never
/// shares them. Dropping a handle blocks until the thread has finished, so a
/// pool thread is never left detached. The one exception is a handle dropped
/// on the very thread it owns, which cannot join itself; that thread is
/// detached with a warning and ends when its current closure returns.
#[derive(Debug)]
pub struct WorkerThread {
    index: usize,
    thread: Option<JoinHandle<()>>,
}

impl WorkerThread {
    /// Wrap an already running thread.
    pub fn new(index: usize, handle: JoinHandle<()>) -> Self {
        Self {
            index,
            thread: Some(handle),
        }
    }

    /// Spawn a named thread running `worker`.
    pub fn spawn(
        index: usize,
        name: String,
        stack_size: Option<usize>,
        worker: WorkerLoop,
    ) -> Result<Self> {
        let mut builder = thread::Builder::new().name(name);
        if let Some(bytes) = stack_size {
            builder = builder.stack_size(bytes);
        }

        let handle = builder
            .spawn(worker)
            .map_err(|e| PoolError::spawn_with_source(index, "thread creation failed", e))?;

        Ok(Self::new(index, handle))
    }

    /// Worker index within its pool
    pub fn index(&self) -> usize {
        self.index
    }

    /// Id of the owned thread, `None` once joined
    pub fn thread_id(&self) -> Option<ThreadId> {
        self.thread.as_ref().map(|t| t.thread().id())
    }

    /// Join the thread, reporting a panic as [`PoolError::WorkerPanic`].
    pub fn join(mut self) -> Result<()> {
        match self.thread.take() {
            Some(handle) => join_handle(self.index, handle),
            None => Ok(()),
        }
    }
}

impl Drop for WorkerThread {
    fn drop(&mut self) {
        if let Some(handle) = self.thread.take() {
            if let Err(e) = join_handle(self.index, handle) {
                error!("{}", e);
            }
        }
    }
}

fn join_handle(index: usize, handle: JoinHandle<()>) -> Result<()> {
    if handle.thread().id() == thread::current().id() {
        warn!(
            "Worker {} released on its own thread; detaching instead of joining",
            index
        );
        return Ok(());
    }

    handle
        .join()
        .map_err(|payload| PoolError::worker_panic(index, panic_message(payload.as_ref())))
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Creates the thread that runs a worker loop.
///
/// Injected into the pool at construction, which keeps the engine independent
/// of how threads are made. Any `Fn(usize, WorkerLoop) -> Result<WorkerThread>`
/// closure is a factory:
///
/// ```rust
/// use rust_task_pool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let factory = |index: usize, worker: WorkerLoop| {
///     WorkerThread::spawn(index, format!("custom-{}", index), None, worker)
/// };
/// let pool = SimpleThreadPool::with_factory(PoolConfig::new(2), factory)?;
/// pool.start()?;
/// pool.stop()?;
/// # Ok(())
/// # }
/// ```
pub trait ThreadFactory: Send + Sync {
    /// Start a thread for worker `index` that runs `worker` to completion.
    fn spawn(&self, index: usize, worker: WorkerLoop) -> Result<WorkerThread>;
}

impl<F> ThreadFactory for F
where
    F: Fn(usize, WorkerLoop) -> Result<WorkerThread> + Send + Sync,
{
    fn spawn(&self, index: usize, worker: WorkerLoop) -> Result<WorkerThread> {
        self(index, worker)
    }
}

/// Default factory: OS threads named `{prefix}-{index}`.
#[derive(Clone, Debug)]
pub struct NamedThreadFactory {
    prefix: String,
    stack_size: Option<usize>,
}

impl NamedThreadFactory {
    /// Create a factory with the given name prefix
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
            stack_size: None,
        }
    }

    /// Create a factory from a pool configuration
    pub fn from_config(config: &PoolConfig) -> Self {
        Self {
            prefix: config.thread_name_prefix.clone(),
            stack_size: config.stack_size,
        }
    }

    /// Set the stack size of spawned threads
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

impl ThreadFactory for NamedThreadFactory {
    fn spawn(&self, index: usize, worker: WorkerLoop) -> Result<WorkerThread> {
        WorkerThread::spawn(
            index,
            format!("{}-{}", self.prefix, index),
            self.stack_size,
            worker,
        )
    }
}
