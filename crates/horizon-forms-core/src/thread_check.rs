//! Thread affinity checks.
//!
//! Forms, rows and renderers are only ever touched from the UI thread. The
//! types are `Send + Sync` so they can live in shared handles, but objects that
//! must stay on one thread record it with [`ThreadAffinity`] and assert on it
//! in debug builds.
//!
//! ```
//! use horizon_forms_core::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! affinity.debug_assert_same_thread();
//! assert!(affinity.is_same_thread());
//! ```

use std::thread::ThreadId;

/// Records the thread an object was created on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread: ThreadId,
}

impl ThreadAffinity {
    /// Capture the current thread.
    pub fn current() -> Self {
        Self {
            thread: std::thread::current().id(),
        }
    }

    /// The owning thread.
    pub fn thread_id(&self) -> ThreadId {
        self.thread
    }

    /// Whether the caller is on the owning thread.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread
    }

    /// Panic in debug builds if called from another thread.
    #[inline]
    #[track_caller]
    pub fn debug_assert_same_thread(&self) {
        debug_assert!(
            self.is_same_thread(),
            "UI object accessed from {:?}, but it belongs to {:?}",
            std::thread::current().id(),
            self.thread
        );
    }
}
