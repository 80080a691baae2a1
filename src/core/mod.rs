//! Core types for the task pool

pub mod error;
pub mod task;

pub use error::{PoolError, Result};
pub use task::{task, Task};
