//! Basic thread pool usage example
//!
//! Demonstrates pool creation, task posting, FIFO ordering, and statistics.
//!
//! Run with: cargo run --example basic_usage

use rust_task_pool::prelude::*;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();
    println!("=== Rust Task Pool - Basic Usage Example ===\n");

    // Create a pool with 4 worker threads
    let pool = SimpleThreadPool::with_config(PoolConfig::new(4).with_thread_name_prefix("demo"))?;

    println!("1. Starting pool with {} workers", pool.pool_size());
    pool.start()?;

    println!("\n2. Posting simple tasks:");
    let (done_tx, done_rx) = mpsc::channel();
    for i in 0..10 {
        let done_tx = done_tx.clone();
        pool.execute(move || {
            println!(
                "  Task {} executing on {}",
                i,
                thread::current().name().unwrap_or("<unnamed>")
            );
            thread::sleep(Duration::from_millis(50));
            let _ = done_tx.send(i);
        });
    }
    println!("   Posted 10 tasks");

    // Stop discards queued work, so wait for completions first
    let finished: Vec<i32> = done_rx.iter().take(10).collect();
    println!("   Completed {} tasks", finished.len());

    println!("\n3. Pool statistics:");
    let stats = pool.stats();
    println!("   Tasks posted:   {}", stats.tasks_posted);
    println!("   Tasks queued:   {}", stats.tasks_queued);
    println!("   Active workers: {}", stats.active_workers);

    // A single-worker pool preserves post order
    println!("\n4. FIFO ordering with one worker:");
    let serial = SimpleThreadPool::new(1)?;
    serial.start()?;
    let (order_tx, order_rx) = mpsc::channel();
    for label in ["first", "second", "third"] {
        let order_tx = order_tx.clone();
        serial.execute(move || {
            let _ = order_tx.send(label);
        });
    }
    let order: Vec<&str> = order_rx.iter().take(3).collect();
    println!("   Execution order: {:?}", order);
    serial.stop()?;

    // Graceful shutdown
    println!("\n5. Stopping pool...");
    pool.stop()?;
    println!("   Tasks executed: {}", pool.stats().tasks_executed);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
