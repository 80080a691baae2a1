//! Unbounded FIFO task queue.

use super::TaskSource;
use crate::core::Task;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// An unbounded FIFO queue guarded by its own mutex.
///
/// The mutex is private to the queue and independent of the pool's wait
/// mutex. Tasks leave in the order their `push` calls acquired it, which is
/// strict FIFO for any single producer.
///
/// # Example
///
/// ```rust
/// use rust_task_pool::queue::{FifoQueue, TaskSource};
///
/// let queue = FifoQueue::new();
/// queue.push(Box::new(|| println!("first")));
/// queue.push(Box::new(|| println!("second")));
/// assert_eq!(queue.len(), 2);
///
/// let first = queue.pop_next_task().unwrap();
/// first();
/// ```
#[derive(Default)]
pub struct FifoQueue {
    tasks: Mutex<VecDeque<Task>>,
}

impl FifoQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task to the back of the queue.
    ///
    /// Never blocks beyond the mutex and never rejects. The caller is
    /// responsible for waking a worker once this returns.
    pub fn push(&self, task: Task) {
        self.tasks.lock().push_back(task);
    }
}

impl TaskSource for FifoQueue {
    fn pop_next_task(&self) -> Option<Task> {
        self.tasks.lock().pop_front()
    }

    fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    fn name(&self) -> &'static str {
        "fifo"
    }
}

impl std::fmt::Debug for FifoQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FifoQueue")
            .field("len", &self.len())
            .finish()
    }
}
