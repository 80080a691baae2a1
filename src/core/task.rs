//! Task type executed by pool workers

/// A unit of work: a zero-argument closure run at most once on some worker.
///
/// The "no work available" sentinel is `Option::<Task>::None`.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Box a closure into a [`Task`].
pub fn task<F>(f: F) -> Task
where
    F: FnOnce() + Send + 'static,
{
    Box::new(f)
}
