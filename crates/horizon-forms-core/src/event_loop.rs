//! UI-cycle task queue.
//!
//! The form layer is single-threaded and event driven. A few pieces of work
//! must not run synchronously while a screen is being laid out (for example
//! highlighting the current choice of a freshly pushed picker), so they are
//! posted to a [`MainLoop`] and run on the next cycle instead.
//!
//! A cycle only runs the tasks that were pending when it started; tasks posted
//! while a cycle is running wait for the following one.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::logging::targets;

/// A unique identifier for a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Global counter for generating unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

/// A boxed task closure.
type BoxedTask = Box<dyn FnOnce() + Send + 'static>;


/// The UI thread's deferred task queue.
pub struct MainLoop {
    tasks: Mutex<VecDeque<BoxedTask>>,
    cycles: AtomicU64,
}

impl Default for MainLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl MainLoop {
    /// Create an empty main loop.
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(VecDeque::new()),
            cycles: AtomicU64::new(0),
        }
    }

    /// Post a task to run on the next cycle.
    ///
    /// Returns the task's ID, which tags its trace events.
    pub fn post<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = next_task_id();
        self.tasks.lock().push_back(Box::new(task));
        tracing::trace!(target: targets::EVENT_LOOP, task = id.as_u64(), "task posted");
        id
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.lock().is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Number of cycles run so far.
    pub fn cycle_count(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Run one cycle: every task that was pending when the cycle started.
    ///
    /// Returns the number of tasks executed.
    pub fn run_cycle(&self) -> usize {
        let batch = std::mem::take(&mut *self.tasks.lock());
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let count = batch.len();
        if count > 0 {
            tracing::debug!(target: targets::EVENT_LOOP, cycle, count, "running cycle");
        }
        for task in batch {
            task();
        }
        count
    }

    /// Run cycles until the queue is empty or `max_cycles` is reached.
    ///
    /// Returns the total number of tasks executed.
    pub fn run_until_idle(&self, max_cycles: usize) -> usize {
        let mut total = 0;
        for _ in 0..max_cycles {
            if !self.has_pending() {
                break;
            }
            total += self.run_cycle();
        }
        total
    }
}

impl fmt::Debug for MainLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainLoop")
            .field("pending", &self.pending_count())
            .field("cycles", &self.cycle_count())
            .finish()
    }
}
