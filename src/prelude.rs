//! Convenient re-exports for common types and traits

pub use crate::core::{task, PoolError, Result, Task};
pub use crate::pool::{
    Executor, GenericThreadPool, PoolConfig, PoolState, SimpleThreadPool, TaskExecutor,
    ThreadFactory, WorkerLoop, WorkerThread,
};
pub use crate::queue::{FifoQueue, TaskSource};
