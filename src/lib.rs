//! # Rust Task Pool
//!
//! A fixed-size pool of worker threads executing closures pulled from a
//! pluggable task source.
//!
//! ## Features
//!
//! - **Fixed pool**: The worker count is set at construction and never changes
//! - **Pluggable queueing**: The engine asks a [`TaskSource`] for work; [`FifoQueue`] is built in
//! - **Idempotent lifecycle**: `start` and `stop` run their side effects exactly once, even under concurrent callers
//! - **No leaked threads**: Worker handles join on drop, and dropping a pool stops it
//! - **Injectable threads**: Worker threads come from a [`ThreadFactory`]
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_task_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! // Create and start a pool
//! let pool = SimpleThreadPool::new(4)?;
//! pool.start()?;
//!
//! // Post tasks
//! let (tx, rx) = std::sync::mpsc::channel();
//! for i in 0..10 {
//!     let tx = tx.clone();
//!     pool.execute(move || {
//!         println!("Task {} executing", i);
//!         tx.send(()).unwrap();
//!     });
//! }
//! for _ in 0..10 {
//!     rx.recv().unwrap();
//! }
//!
//! // Stop and join every worker
//! pool.stop()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use rust_task_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let config = PoolConfig::new(8)
//!     .with_thread_name_prefix("my-worker")
//!     .with_stack_size(1024 * 1024);
//!
//! let pool = SimpleThreadPool::with_config(config)?;
//! pool.start()?;
//! # pool.stop()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Shutdown Semantics
//!
//! `stop` lets running tasks finish and then joins every worker. Tasks still
//! queued are never executed. Panics inside a task are not caught: they end
//! the worker that ran the task and are reported by `stop`.
//!
//! [`TaskSource`]: queue::TaskSource
//! [`FifoQueue`]: queue::FifoQueue
//! [`ThreadFactory`]: pool::ThreadFactory

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;
pub mod queue;
#[cfg(feature = "tracing")]
pub mod tracing;

pub use crate::core::{task, PoolError, Result, Task};
pub use crate::pool::{
    Executor, GenericThreadPool, PoolConfig, PoolState, SimpleThreadPool, TaskExecutor,
};
pub use crate::queue::{FifoQueue, TaskSource};
