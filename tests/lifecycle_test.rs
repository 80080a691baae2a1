//! Lifecycle tests: idempotent start/stop, join guarantees, implicit stop

mod common;

use common::{init_logger, wait_until, ThreadTracker};
use rust_task_pool::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::{Duration, Instant};

#[test]
fn test_start_twice_creates_pool_size_threads() {
    init_logger();
    let tracker = ThreadTracker::new();
    let pool = SimpleThreadPool::with_factory(PoolConfig::new(4), tracker.factory())
        .expect("Failed to create pool");

    pool.start().expect("Failed to start pool");
    pool.start().expect("Second start should be a no-op");

    assert_eq!(tracker.spawned(), 4);
    assert!(wait_until(Duration::from_secs(5), || pool.active_workers() == 4));

    pool.stop().expect("Failed to stop pool");
}

#[test]
fn test_concurrent_start_spawns_once() {
    init_logger();
    let tracker = ThreadTracker::new();
    let pool = SimpleThreadPool::with_factory(PoolConfig::new(3), tracker.factory())
        .expect("Failed to create pool");
    let barrier = Barrier::new(8);

    crossbeam_utils::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|_| {
                barrier.wait();
                pool.start().expect("Failed to start pool");
            });
        }
    })
    .expect("Starter thread panicked");

    assert_eq!(tracker.spawned(), 3);
    assert_eq!(pool.state(), PoolState::Running);

    pool.stop().expect("Failed to stop pool");
    assert_eq!(tracker.alive(), 0);
}

#[test]
fn test_concurrent_stop_joins_once() {
    init_logger();
    let tracker = ThreadTracker::new();
    let pool = SimpleThreadPool::with_factory(PoolConfig::new(4), tracker.factory())
        .expect("Failed to create pool");
    pool.start().expect("Failed to start pool");
    let barrier = Barrier::new(6);

    crossbeam_utils::thread::scope(|s| {
        for _ in 0..6 {
            s.spawn(|_| {
                barrier.wait();
                pool.stop().expect("Failed to stop pool");
                // Every caller returns only after the join sequence finished
                assert_eq!(tracker.alive(), 0);
            });
        }
    })
    .expect("Stopper thread panicked");

    assert_eq!(pool.state(), PoolState::Stopped);
    assert_eq!(tracker.spawned(), 4);
}

#[test]
fn test_no_thread_alive_after_stop() {
    init_logger();
    let tracker = ThreadTracker::new();
    let pool = SimpleThreadPool::with_factory(PoolConfig::new(4), tracker.factory())
        .expect("Failed to create pool");
    pool.start().expect("Failed to start pool");

    for _ in 0..100 {
        pool.execute(|| std::thread::sleep(Duration::from_micros(50)));
    }

    pool.stop().expect("Failed to stop pool");
    assert_eq!(tracker.alive(), 0);
    assert_eq!(pool.active_workers(), 0);

    pool.stop().expect("Second stop should be a no-op");
    assert_eq!(tracker.spawned(), 4);
}

#[test]
fn test_drop_without_stop_joins_workers() {
    init_logger();
    let tracker = ThreadTracker::new();
    {
        let pool = SimpleThreadPool::with_factory(PoolConfig::new(4), tracker.factory())
            .expect("Failed to create pool");
        pool.start().expect("Failed to start pool");
        assert!(wait_until(Duration::from_secs(5), || tracker.alive() == 4));
    }
    assert_eq!(tracker.alive(), 0);
}

#[test]
fn test_drop_lets_running_task_finish() {
    init_logger();
    let finished = Arc::new(AtomicUsize::new(0));
    let (started_tx, started_rx) = crossbeam_channel::bounded(1);
    {
        let pool = SimpleThreadPool::new(1).expect("Failed to create pool");
        pool.start().expect("Failed to start pool");

        let finished_clone = Arc::clone(&finished);
        pool.execute(move || {
            started_tx.send(()).expect("Failed to signal start");
            std::thread::sleep(Duration::from_millis(100));
            finished_clone.fetch_add(1, Ordering::SeqCst);
        });
        started_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("Task should start");
    }
    assert_eq!(finished.load(Ordering::SeqCst), 1);
}

/// Post a task that stops its own pool, releases it, then keeps running.
fn post_self_stopping_task(
    pool: &Arc<SimpleThreadPool>,
    finished: &Arc<AtomicUsize>,
) -> crossbeam_channel::Receiver<()> {
    let (stopped_tx, stopped_rx) = crossbeam_channel::bounded(1);
    let pool_clone = Arc::clone(pool);
    let finished = Arc::clone(finished);
    pool.execute(move || {
        pool_clone.stop().expect("Stop from a task should succeed");
        drop(pool_clone);
        stopped_tx.send(()).expect("Failed to signal stop");
        std::thread::sleep(Duration::from_millis(300));
        finished.fetch_add(1, Ordering::SeqCst);
    });
    stopped_rx
}

#[test]
fn test_outer_stop_joins_worker_that_stopped_its_pool() {
    init_logger();
    let tracker = ThreadTracker::new();
    let pool = Arc::new(
        SimpleThreadPool::with_factory(PoolConfig::new(2), tracker.factory())
            .expect("Failed to create pool"),
    );
    pool.start().expect("Failed to start pool");

    let finished = Arc::new(AtomicUsize::new(0));
    let stopped_rx = post_self_stopping_task(&pool, &finished);
    stopped_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("Stop from a task should not deadlock");
    assert_eq!(pool.state(), PoolState::Stopped);

    pool.stop().expect("Failed to stop pool");
    assert_eq!(tracker.alive(), 0);
    assert_eq!(finished.load(Ordering::SeqCst), 1);
}

#[test]
fn test_drop_joins_worker_that_stopped_its_pool() {
    init_logger();
    let tracker = ThreadTracker::new();
    let finished = Arc::new(AtomicUsize::new(0));
    {
        let pool = Arc::new(
            SimpleThreadPool::with_factory(PoolConfig::new(2), tracker.factory())
                .expect("Failed to create pool"),
        );
        pool.start().expect("Failed to start pool");

        let stopped_rx = post_self_stopping_task(&pool, &finished);
        stopped_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("Stop from a task should not deadlock");
        assert_eq!(Arc::strong_count(&pool), 1);
    }
    assert_eq!(tracker.alive(), 0);
    assert_eq!(finished.load(Ordering::SeqCst), 1);
}

#[test]
fn test_empty_pool_quiescence() {
    init_logger();
    let pool = SimpleThreadPool::new(8).expect("Failed to create pool");

    let start = Instant::now();
    pool.start().expect("Failed to start pool");
    pool.stop().expect("Failed to stop pool");
    let elapsed = start.elapsed();

    assert!(
        elapsed < Duration::from_secs(1),
        "Start/stop of an idle pool took too long: {:?}",
        elapsed
    );
    let stats = pool.stats();
    assert_eq!(stats.tasks_executed, 0);
    assert_eq!(stats.active_workers, 0);
}

#[test]
fn test_stop_before_start_never_creates_threads() {
    init_logger();
    let tracker = ThreadTracker::new();
    let pool = SimpleThreadPool::with_factory(PoolConfig::new(2), tracker.factory())
        .expect("Failed to create pool");

    pool.stop().expect("Stop before start should succeed");
    pool.start().expect("Start after stop should be a no-op");

    assert_eq!(pool.state(), PoolState::Stopped);
    assert_eq!(tracker.spawned(), 0);
}

#[test]
fn test_zero_pool_size_rejected() {
    let result = SimpleThreadPool::new(0);
    assert!(matches!(result, Err(PoolError::InvalidConfig { .. })));

    let result = SimpleThreadPool::with_config(PoolConfig::new(0));
    assert!(matches!(result, Err(PoolError::InvalidConfig { .. })));
}

#[test]
fn test_factory_error_surfaces_from_start() {
    init_logger();
    let factory = |index: usize, _worker: WorkerLoop| -> Result<WorkerThread> {
        Err(PoolError::spawn(index, "no threads available"))
    };
    let pool = SimpleThreadPool::with_factory(PoolConfig::new(2), factory)
        .expect("Failed to create pool");

    let result = pool.start();
    assert!(matches!(result, Err(PoolError::SpawnError { thread_id: 0, .. })));
    assert_eq!(pool.state(), PoolState::Stopped);
}

#[test]
fn test_executor_trait_lifecycle() {
    init_logger();
    let tracker = ThreadTracker::new();
    let pool: Box<dyn Executor> = Box::new(
        SimpleThreadPool::with_factory(PoolConfig::new(2), tracker.factory())
            .expect("Failed to create pool"),
    );

    pool.start().expect("Failed to start pool");
    pool.start().expect("Second start should be a no-op");
    pool.stop().expect("Failed to stop pool");
    pool.stop().expect("Second stop should be a no-op");

    assert_eq!(tracker.spawned(), 2);
    assert_eq!(tracker.alive(), 0);
}
