//! Tracing integration.
//!
//! With the `tracing` feature enabled, every worker loop runs inside a
//! `worker` debug span carrying its index. Tasks run on a different thread
//! than the one that posted them, so the poster's span is lost unless the
//! task carries it along:
//!
//! ```rust,ignore
//! use rust_task_pool::prelude::*;
//! use rust_task_pool::tracing::in_current_span;
//!
//! let pool = SimpleThreadPool::new(4)?;
//! pool.start()?;
//!
//! let span = tracing::info_span!("request", id = 42);
//! let _guard = span.enter();
//! pool.post(in_current_span(|| tracing::info!("handled")));
//! ```

use crate::core::{task, Task};
use ::tracing::Span;

/// Wrap a closure so it runs inside the span that is current right now.
pub fn in_current_span<F>(f: F) -> Task
where
    F: FnOnce() + Send + 'static,
{
    in_span(Span::current(), f)
}

/// Wrap a closure so it runs inside `span`.
pub fn in_span<F>(span: Span, f: F) -> Task
where
    F: FnOnce() + Send + 'static,
{
    task(move || {
        let _guard = span.enter();
        f();
    })
}
