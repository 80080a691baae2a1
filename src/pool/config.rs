//! Pool configuration

use crate::core::{PoolError, Result};

/// Configuration for a thread pool
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads. Fixed for the pool's lifetime, must be > 0.
    pub pool_size: usize,
    /// Thread name prefix. Workers are named `{prefix}-{index}`.
    pub thread_name_prefix: String,
    /// Stack size for worker threads (None = platform default)
    pub stack_size: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: num_cpus::get(),
            thread_name_prefix: "pool-worker".to_string(),
            stack_size: None,
        }
    }
}

impl PoolConfig {
    /// Create a new configuration with the given number of workers.
    ///
    /// A size of zero is kept as is and rejected by [`validate`](Self::validate).
    #[must_use]
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool_size,
            ..Default::default()
        }
    }

    /// Set thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Set the stack size of worker threads in bytes
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(PoolError::invalid_config(
                "pool_size",
                "Number of worker threads must be greater than 0",
            ));
        }
        if self.thread_name_prefix.is_empty() {
            return Err(PoolError::invalid_config(
                "thread_name_prefix",
                "Thread name prefix must not be empty",
            ));
        }
        if self.stack_size == Some(0) {
            return Err(PoolError::invalid_config(
                "stack_size",
                "Stack size must be greater than 0",
            ));
        }
        Ok(())
    }
}
