//! Generic pool engine
//!
//! [`GenericThreadPool`] owns a fixed set of worker threads and runs the
//! shared worker loop. It has no queue of its own: workers ask the injected
//! [`TaskSource`] for the next task while holding the wait mutex, and sleep on
//! a condition variable when it has nothing to give.
//!
//! # Lock order
//!
//! Workers hold the wait mutex while the source takes its own lock inside
//! `pop_next_task`. Producers take the source lock and the wait mutex one
//! after the other, never nested, so the two cannot deadlock.

use crate::core::{Result, Task};
use crate::pool::config::PoolConfig;
use crate::pool::executor::{Executor, PoolState};
use crate::pool::stats::{ActiveWorkerGuard, PoolStats, PoolStatsSnapshot};
use crate::pool::worker::{NamedThreadFactory, ThreadFactory, WorkerThread};
use crate::queue::TaskSource;
use log::{debug, error, info};
use parking_lot::{Condvar, Mutex, MutexGuard, RwLock};
use std::cell::Cell;
use std::sync::Arc;
use std::thread;

#[cfg(feature = "tracing")]
use ::tracing::{span, Level};

thread_local! {
    // Address of the `Shared` block whose worker loop runs on this thread, or 0.
    static CURRENT_POOL: Cell<usize> = Cell::new(0);
}

/// Marks the current thread as a worker of one pool until dropped.
struct CurrentPoolGuard;

impl CurrentPoolGuard {
    fn enter(address: usize) -> Self {
        CURRENT_POOL.with(|current| current.set(address));
        CurrentPoolGuard
    }
}

impl Drop for CurrentPoolGuard {
    fn drop(&mut self) {
        CURRENT_POOL.with(|current| current.set(0));
    }
}

/// State shared between the pool handle and its workers
struct Shared<S> {
    source: S,
    /// Stopping flag; also the wait mutex paired with `awaiting`
    stopping: Mutex<bool>,
    awaiting: Condvar,
    stats: PoolStats,
}

impl<S: TaskSource> Shared<S> {
    fn new(source: S) -> Self {
        Self {
            source,
            stopping: Mutex::new(false),
            awaiting: Condvar::new(),
            stats: PoolStats::new(),
        }
    }

    fn address(&self) -> usize {
        self as *const Self as usize
    }

    fn on_worker_thread(&self) -> bool {
        CURRENT_POOL.with(|current| current.get() == self.address())
    }

    fn is_stopping(&self) -> bool {
        *self.stopping.lock()
    }

    /// Main worker loop
    fn run(&self, index: usize) {
        #[cfg(feature = "tracing")]
        let worker_span = span!(Level::DEBUG, "worker", index = index);
        #[cfg(feature = "tracing")]
        let _span_guard = worker_span.enter();

        let _current = CurrentPoolGuard::enter(self.address());
        let _active = ActiveWorkerGuard::enter(&self.stats);
        debug!("worker {} started", index);

        // Panics from a task are not caught; they end this worker.
        while let Some(task) = self.next_task() {
            task();
            self.stats.record_executed();
        }

        debug!("worker {} exiting", index);
    }

    /// Blocks until a task is available or the pool is stopping.
    ///
    /// Stopping is checked before the source is asked and only ever changes
    /// under the wait mutex, so a task returned here was taken while the pool
    /// was running. It is always executed; shutdown is honored on the next
    /// call.
    fn next_task(&self) -> Option<Task> {
        let mut stopping = self.stopping.lock();
        loop {
            if *stopping {
                return None;
            }
            if let Some(task) = self.source.pop_next_task() {
                return Some(task);
            }
            self.awaiting.wait(&mut stopping);
        }
    }

    fn notify_one(&self) {
        // Passing through the wait mutex orders this wakeup after any worker
        // that is between its predicate check and its wait.
        drop(self.stopping.lock());
        self.awaiting.notify_one();
    }

    fn begin_shutdown(&self) {
        *self.stopping.lock() = true;
        self.awaiting.notify_all();
    }
}

/// A fixed-size pool of worker threads fed by a pluggable [`TaskSource`].
///
/// # Lifecycle
///
/// `Created -> Running -> Stopped`. [`start`](Self::start) and
/// [`stop`](Self::stop) are idempotent and may be called concurrently;
/// concurrent callers wait for the one transition in progress. Stopping a
/// pool that was never started moves it straight to `Stopped`, and a stopped
/// pool cannot be started again. Dropping the pool stops it.
///
/// # Shutdown
///
/// `stop` wakes every worker and joins all of them. A task that is already
/// running finishes; tasks still in the source are never executed and are
/// dropped with the pool.
///
/// # Producers
///
/// After putting work into the source, call [`notify`](Self::notify) or use
/// [`enqueue`](Self::enqueue), which does both.
pub struct GenericThreadPool<S: TaskSource> {
    config: PoolConfig,
    factory: Box<dyn ThreadFactory>,
    shared: Arc<Shared<S>>,
    state: RwLock<PoolState>,
    /// Worker handles; the lock also serializes lifecycle transitions
    workers: Mutex<Vec<WorkerThread>>,
}

impl<S: TaskSource> std::fmt::Debug for GenericThreadPool<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericThreadPool")
            .field("config", &self.config)
            .field("source", &self.shared.source.name())
            .field("state", &*self.state.read())
            .field("queued", &self.shared.source.len())
            .finish()
    }
}

impl<S: TaskSource> GenericThreadPool<S> {
    /// Create a pool of `pool_size` workers with default thread naming
    pub fn new(source: S, pool_size: usize) -> Result<Self> {
        Self::with_config(source, PoolConfig::new(pool_size))
    }

    /// Create a pool from a configuration, spawning named OS threads
    pub fn with_config(source: S, config: PoolConfig) -> Result<Self> {
        let factory = NamedThreadFactory::from_config(&config);
        Self::with_factory(source, config, factory)
    }

    /// Create a pool whose worker threads come from `factory`
    pub fn with_factory<F>(source: S, config: PoolConfig, factory: F) -> Result<Self>
    where
        F: ThreadFactory + 'static,
    {
        config.validate()?;

        Ok(Self {
            workers: Mutex::new(Vec::with_capacity(config.pool_size)),
            config,
            factory: Box::new(factory),
            shared: Arc::new(Shared::new(source)),
            state: RwLock::new(PoolState::Created),
        })
    }

    /// Spawn `pool_size` workers on the first call; later calls do nothing.
    ///
    /// If the factory fails, workers spawned so far are stopped and joined,
    /// the pool becomes `Stopped` and the factory's error is returned.
    pub fn start(&self) -> Result<()> {
        // A worker can only exist once the pool has started.
        if self.shared.on_worker_thread() {
            return Ok(());
        }

        let mut workers = self.workers.lock();
        let state = *self.state.read();
        if state != PoolState::Created {
            return Ok(());
        }

        for index in 0..self.config.pool_size {
            let shared = Arc::clone(&self.shared);
            match self
                .factory
                .spawn(index, Box::new(move || shared.run(index)))
            {
                Ok(worker) => {
                    self.shared.stats.record_spawned();
                    workers.push(worker);
                }
                Err(e) => {
                    error!(
                        "Pool '{}' failed to spawn worker {}: {}",
                        self.config.thread_name_prefix, index, e
                    );
                    self.shared.begin_shutdown();
                    for worker in workers.drain(..) {
                        let _ = worker.join();
                    }
                    *self.state.write() = PoolState::Stopped;
                    return Err(e);
                }
            }
        }

        *self.state.write() = PoolState::Running;
        info!(
            "Pool '{}' started with {} workers ({} source)",
            self.config.thread_name_prefix,
            self.config.pool_size,
            self.shared.source.name()
        );
        Ok(())
    }

    /// Stop the pool and join every worker on the first call; later calls do
    /// nothing.
    ///
    /// All workers are joined even if some of them died from a panicking task;
    /// the first such panic is returned as [`PoolError::WorkerPanic`].
    ///
    /// Called from inside a task, the calling worker cannot join itself. Its
    /// handle stays with the pool and is joined by the next `stop` (or the
    /// drop) that runs off the pool's threads.
    ///
    /// [`PoolError::WorkerPanic`]: crate::core::PoolError::WorkerPanic
    pub fn stop(&self) -> Result<()> {
        let mut workers = match self.lock_workers_for_stop() {
            Some(workers) => workers,
            None => return Ok(()),
        };
        let state = *self.state.read();
        match state {
            PoolState::Stopped => {
                if workers.is_empty() || self.shared.on_worker_thread() {
                    return Ok(());
                }
                debug!(
                    "Joining {} worker(s) left running by a stop from inside a task",
                    workers.len()
                );
                return self.join_workers(&mut workers);
            }
            PoolState::Created => {
                self.shared.begin_shutdown();
                *self.state.write() = PoolState::Stopped;
                debug!(
                    "Pool '{}' stopped before it was started",
                    self.config.thread_name_prefix
                );
                return Ok(());
            }
            PoolState::Running => {}
        }

        debug!(
            "Stopping pool '{}' ({} workers)",
            self.config.thread_name_prefix,
            workers.len()
        );
        self.shared.begin_shutdown();
        let result = self.join_workers(&mut workers);

        *self.state.write() = PoolState::Stopped;
        info!(
            "Pool '{}' stopped: {} tasks executed, {} discarded in queue",
            self.config.thread_name_prefix,
            self.shared.stats.tasks_executed(),
            self.shared.source.len()
        );
        result
    }

    /// Joins every handle except the one owned by the calling thread, which
    /// is kept for a later `stop`. Returns the first worker panic.
    fn join_workers(&self, workers: &mut Vec<WorkerThread>) -> Result<()> {
        let current = thread::current().id();
        let mut first_error = None;

        for worker in std::mem::take(workers) {
            if worker.thread_id() == Some(current) {
                workers.push(worker);
                continue;
            }
            if let Err(e) = worker.join() {
                error!("{}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Locks the worker list for `stop`.
    ///
    /// On a worker thread this gives up once another caller has begun
    /// stopping, since that caller is about to join this thread.
    fn lock_workers_for_stop(&self) -> Option<MutexGuard<'_, Vec<WorkerThread>>> {
        if !self.shared.on_worker_thread() {
            return Some(self.workers.lock());
        }
        loop {
            if self.shared.is_stopping() {
                return None;
            }
            if let Some(workers) = self.workers.try_lock() {
                return Some(workers);
            }
            std::thread::yield_now();
        }
    }

    /// Wake exactly one idle worker.
    ///
    /// Must follow every enqueue into the source; without it a task can sit
    /// in the source while all workers sleep.
    pub fn notify(&self) {
        self.shared.notify_one();
    }

    /// Put work into the source through `push`, count it, then
    /// [`notify`](Self::notify).
    pub fn enqueue<F>(&self, push: F)
    where
        F: FnOnce(&S),
    {
        push(&self.shared.source);
        self.shared.stats.record_posted();
        self.notify();
    }

    /// The task source this pool pulls from
    pub fn source(&self) -> &S {
        &self.shared.source
    }

    /// Number of worker threads
    pub fn pool_size(&self) -> usize {
        self.config.pool_size
    }

    /// Pool configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> PoolState {
        *self.state.read()
    }

    /// Check if the pool is running
    pub fn is_running(&self) -> bool {
        self.state() == PoolState::Running
    }

    /// Worker loops currently alive
    pub fn active_workers(&self) -> usize {
        self.shared.stats.active_workers()
    }

    /// Snapshot of the pool's counters
    pub fn stats(&self) -> PoolStatsSnapshot {
        self.shared.stats.snapshot(self.shared.source.len())
    }
}

impl<S: TaskSource> Executor for GenericThreadPool<S> {
    fn start(&self) -> Result<()> {
        GenericThreadPool::start(self)
    }

    fn stop(&self) -> Result<()> {
        GenericThreadPool::stop(self)
    }
}

impl<S: TaskSource> Drop for GenericThreadPool<S> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!(
                "Failed to stop pool '{}' during drop: {}",
                self.config.thread_name_prefix, e
            );
        }
    }
}
