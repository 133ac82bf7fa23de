use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Number of threads the machine can run in parallel, at least one.
pub fn available_threads() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

/// Build a local thread pool with `num_threads` named workers.
///
/// Worker threads are named `{name}-{index}`. The pool is torn down when dropped.
///
/// # Errors
///
/// Returns [`ParallelError::InvalidThreadCount`] for zero threads and
/// [`ParallelError::BuildError`] if rayon fails to spawn the workers.
pub fn build_thread_pool(num_threads: usize, name: &str) -> Result<ThreadPool, ParallelError> {
    if num_threads == 0 {
        return Err(ParallelError::InvalidThreadCount(num_threads));
    }

    let prefix = name.to_string();
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(move |i| format!("{prefix}-{i}"))
        .build()
        .map_err(|e| ParallelError::BuildError(e.to_string()))
}

/// Spawn one job per item on `pool` and collect the results in item order.
///
/// All jobs are submitted before any result is read. Each job writes into its own slot, so
/// the output order follows the input order no matter in which order the jobs finish.
/// The closure receives the index of the item together with the item.
///
/// # Examples
///
/// ```
/// use blurbench_imgproc::parallel::{build_thread_pool, spawn_collect};
///
/// let pool = build_thread_pool(2, "doc").unwrap();
/// let out = spawn_collect(&pool, &[1, 2, 3], |i, v| (i, v * 10));
/// assert_eq!(out, vec![(0, 10), (1, 20), (2, 30)]);
/// ```
pub fn spawn_collect<T, R, F>(pool: &ThreadPool, items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Sync,
{
    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(items.len()).collect();

    pool.scope(|s| {
        let f = &f;
        for ((index, item), slot) in items.iter().enumerate().zip(slots.iter_mut()) {
            s.spawn(move |_| *slot = Some(f(index, item)));
        }
    });

    slots.into_iter().flatten().collect()
}
