//! Helpers shared by the integration tests

#![allow(dead_code)]

use rust_task_pool::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Counts threads created by a factory and how many are still running.
#[derive(Clone, Default)]
pub struct ThreadTracker {
    pub spawned: Arc<AtomicUsize>,
    pub alive: Arc<AtomicUsize>,
}

struct AliveGuard(Arc<AtomicUsize>);

impl Drop for AliveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ThreadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }

    pub fn alive(&self) -> usize {
        self.alive.load(Ordering::SeqCst)
    }

    /// A factory whose threads report to this tracker until their loop returns.
    pub fn factory(&self) -> impl ThreadFactory {
        let spawned = Arc::clone(&self.spawned);
        let alive = Arc::clone(&self.alive);
        move |index: usize, worker: WorkerLoop| {
            spawned.fetch_add(1, Ordering::SeqCst);
            alive.fetch_add(1, Ordering::SeqCst);
            let alive = Arc::clone(&alive);
            WorkerThread::spawn(
                index,
                format!("tracked-{}", index),
                None,
                Box::new(move || {
                    let _guard = AliveGuard(alive);
                    worker();
                }),
            )
        }
    }
}

pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while !condition() {
        if start.elapsed() >= timeout {
            return false;
        }
        thread::sleep(Duration::from_millis(5));
    }
    true
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
