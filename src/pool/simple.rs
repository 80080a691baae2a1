//! FIFO thread pool

use crate::core::{task, Result, Task};
use crate::pool::config::PoolConfig;
use crate::pool::engine::GenericThreadPool;
use crate::pool::executor::{Executor, PoolState, TaskExecutor};
use crate::pool::stats::PoolStatsSnapshot;
use crate::pool::worker::ThreadFactory;
use crate::queue::{FifoQueue, TaskSource};

/// A fixed-size thread pool that runs posted tasks in FIFO order.
///
/// Tasks from a single producer are dequeued in the order they were posted.
/// With several producers, the order is that in which their `post` calls
/// took the queue lock. With more than one worker, dequeue order does not
/// bound completion order.
///
/// # Example
///
/// ```rust
/// use rust_task_pool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pool = SimpleThreadPool::new(4)?;
/// pool.start()?;
///
/// let (tx, rx) = std::sync::mpsc::channel();
/// for i in 0..8 {
///     let tx = tx.clone();
///     pool.execute(move || tx.send(i * i).unwrap());
/// }
///
/// let mut squares: Vec<i32> = rx.iter().take(8).collect();
/// squares.sort();
/// assert_eq!(squares, vec![0, 1, 4, 9, 16, 25, 36, 49]);
///
/// pool.stop()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SimpleThreadPool {
    engine: GenericThreadPool<FifoQueue>,
}

impl SimpleThreadPool {
    /// Create a pool of `pool_size` workers
    pub fn new(pool_size: usize) -> Result<Self> {
        Self::with_config(PoolConfig::new(pool_size))
    }

    /// Create a pool from a configuration
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        Ok(Self {
            engine: GenericThreadPool::with_config(FifoQueue::new(), config)?,
        })
    }

    /// Create a pool whose worker threads come from `factory`
    pub fn with_factory<F>(config: PoolConfig, factory: F) -> Result<Self>
    where
        F: ThreadFactory + 'static,
    {
        Ok(Self {
            engine: GenericThreadPool::with_factory(FifoQueue::new(), config, factory)?,
        })
    }

    /// Spawn the workers; later calls do nothing
    pub fn start(&self) -> Result<()> {
        self.engine.start()
    }

    /// Stop and join every worker; later calls do nothing
    pub fn stop(&self) -> Result<()> {
        self.engine.stop()
    }

    /// Append a task to the queue and wake one worker.
    ///
    /// Never blocks beyond the queue lock and never rejects. Tasks posted
    /// before `start` wait for it; tasks posted after `stop` never run.
    pub fn post(&self, task: Task) {
        self.engine.enqueue(|queue| queue.push(task));
    }

    /// Post a closure
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.post(task(f));
    }

    /// Number of tasks waiting in the queue
    pub fn queued(&self) -> usize {
        self.engine.source().len()
    }

    /// Number of worker threads
    pub fn pool_size(&self) -> usize {
        self.engine.pool_size()
    }

    /// Current lifecycle state
    pub fn state(&self) -> PoolState {
        self.engine.state()
    }

    /// Check if the pool is running
    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    /// Worker loops currently alive
    pub fn active_workers(&self) -> usize {
        self.engine.active_workers()
    }

    /// Snapshot of the pool's counters
    pub fn stats(&self) -> PoolStatsSnapshot {
        self.engine.stats()
    }
}

impl Executor for SimpleThreadPool {
    fn start(&self) -> Result<()> {
        SimpleThreadPool::start(self)
    }

    fn stop(&self) -> Result<()> {
        SimpleThreadPool::stop(self)
    }
}

impl TaskExecutor for SimpleThreadPool {
    fn post(&self, task: Task) {
        SimpleThreadPool::post(self, task)
    }
}
