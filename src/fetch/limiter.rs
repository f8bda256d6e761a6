// src/fetch/limiter.rs
// =============================================================================
// Caps how many downloads run at the same time.
//
// A ConcurrencyLimiter wraps a tokio Semaphore with N permits. spawn() waits
// for a free permit *before* starting the task, then moves the permit into
// the task so the slot is handed back when the task ends, however it ends.
// Tokio's semaphore is fair, so callers waiting in spawn() get their slot in
// the order they asked (FIFO).
// =============================================================================

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    limit: usize,
}

impl ConcurrencyLimiter {
    // Creates a limiter allowing `limit` tasks at once (at least 1)
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    // Number of free slots right now
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    // Waits for a free slot, then runs `task` on the tokio runtime
    //
    // Returns the JoinHandle; awaiting it yields the task's output.
    // The permit is dropped together with the task's future, so a task that
    // fails (or even panics) still frees its slot for the next one.
    pub async fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        // acquire_owned() only fails if the semaphore was closed, and we never close it
        let permit = Arc::clone(&self.semaphore).acquire_owned().await.ok();

        tokio::spawn(async move {
            let _permit = permit;
            task.await
        })
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a Semaphore?
//    - A counter of available "slots"
//    - acquire() takes a slot (waiting if none are free)
//    - Dropping the permit puts the slot back
//
// 2. Why acquire_owned() instead of acquire()?
//    - acquire() borrows the semaphore, so the permit can't outlive `self`
//    - acquire_owned() works on an Arc and the permit owns a clone of it
//    - Owned permits can be moved into spawned ('static) tasks
// -----------------------------------------------------------------------------
