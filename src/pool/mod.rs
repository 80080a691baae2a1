//! Thread pool engine, worker handles and the FIFO pool

pub mod config;
pub mod engine;
pub mod executor;
pub mod simple;
pub mod stats;
pub mod worker;

pub use config::PoolConfig;
pub use engine::GenericThreadPool;
pub use executor::{Executor, PoolState, TaskExecutor};
pub use simple::SimpleThreadPool;
pub use stats::{PoolStats, PoolStatsSnapshot};
pub use worker::{NamedThreadFactory, ThreadFactory, WorkerLoop, WorkerThread};
