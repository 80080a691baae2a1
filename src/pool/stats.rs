//! Pool statistics

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Live counters shared by a pool and its workers
#[derive(Debug, Default)]
pub struct PoolStats {
    tasks_posted: AtomicU64,
    tasks_executed: AtomicU64,
    workers_spawned: AtomicUsize,
    active_workers: AtomicUsize,
}

impl PoolStats {
    /// Create zeroed statistics
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_posted(&self) {
        self.tasks_posted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_executed(&self) {
        self.tasks_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_spawned(&self) {
        self.workers_spawned.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn worker_entered(&self) {
        self.active_workers.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn worker_exited(&self) {
        self.active_workers.fetch_sub(1, Ordering::AcqRel);
    }

    /// Tasks accepted through a submission front end such as `post`
    pub fn tasks_posted(&self) -> u64 {
        self.tasks_posted.load(Ordering::Relaxed)
    }

    /// Tasks that ran to completion on a worker
    pub fn tasks_executed(&self) -> u64 {
        self.tasks_executed.load(Ordering::Relaxed)
    }

    /// Worker threads created over the pool's lifetime
    pub fn workers_spawned(&self) -> usize {
        self.workers_spawned.load(Ordering::Relaxed)
    }

    /// Worker loops currently alive
    pub fn active_workers(&self) -> usize {
        self.active_workers.load(Ordering::Acquire)
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self, queued: usize) -> PoolStatsSnapshot {
        PoolStatsSnapshot {
            tasks_posted: self.tasks_posted(),
            tasks_executed: self.tasks_executed(),
            tasks_queued: queued,
            workers_spawned: self.workers_spawned(),
            active_workers: self.active_workers(),
        }
    }
}

/// Serializable snapshot of [`PoolStats`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatsSnapshot {
    /// Tasks accepted through `post`
    pub tasks_posted: u64,
    /// Tasks that ran to completion
    pub tasks_executed: u64,
    /// Tasks waiting in the task source
    pub tasks_queued: usize,
    /// Worker threads created
    pub workers_spawned: usize,
    /// Worker loops alive when the snapshot was taken
    pub active_workers: usize,
}

/// Keeps `active_workers` accurate even when a task unwinds the worker.
pub(crate) struct ActiveWorkerGuard<'a> {
    stats: &'a PoolStats,
}

impl<'a> ActiveWorkerGuard<'a> {
    pub(crate) fn enter(stats: &'a PoolStats) -> Self {
        stats.worker_entered();
        Self { stats }
    }
}

impl Drop for ActiveWorkerGuard<'_> {
    fn drop(&mut self) {
        self.stats.worker_exited();
    }
}
