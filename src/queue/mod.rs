//! Task source abstraction for pluggable queueing strategies.
//!
//! The pool engine has no queue of its own. It asks a [`TaskSource`] for the
//! next task every time a worker evaluates its wait predicate, so the source
//! alone decides the queueing discipline.
//!
//! # Built-in Implementations
//!
//! - [`FifoQueue`]: Unbounded FIFO queue behind its own mutex (default)
//!
//! # Custom Sources
//!
//! ```rust
//! use rust_task_pool::queue::TaskSource;
//! use rust_task_pool::Task;
//! use parking_lot::Mutex;
//!
//! /// Runs the most recently pushed task first.
//! struct LifoQueue {
//!     tasks: Mutex<Vec<Task>>,
//! }
//!
//! impl TaskSource for LifoQueue {
//!     fn pop_next_task(&self) -> Option<Task> {
//!         self.tasks.lock().pop()
//!     }
//!
//!     fn len(&self) -> usize {
//!         self.tasks.lock().len()
//!     }
//! }
//! ```
//!
//! Whoever enqueues into a custom source must call
//! [`GenericThreadPool::notify`] afterwards, otherwise the task may sit in
//! the source while every worker sleeps.
//!
//! [`GenericThreadPool::notify`]: crate::pool::GenericThreadPool::notify

mod fifo;

pub use fifo::FifoQueue;

use crate::core::Task;

/// A queueing strategy the pool engine pulls tasks from.
///
/// # Contract
///
/// - `pop_next_task` is called by workers while they hold the engine's wait
///   mutex. It must not block and must not call back into the pool.
/// - A task returned from `pop_next_task` must never be returned again.
pub trait TaskSource: Send + Sync + 'static {
    /// Removes and returns the next task, or `None` when no work is available.
    fn pop_next_task(&self) -> Option<Task>;

    /// Number of tasks currently waiting (approximate under concurrency).
    fn len(&self) -> usize;

    /// Returns true if no task is waiting.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name for logging.
    fn name(&self) -> &'static str {
        "custom"
    }
}
