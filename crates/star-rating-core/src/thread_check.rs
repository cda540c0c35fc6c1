//! Thread safety verification utilities.
//!
//! Widget state lives on the UI thread; commits may be triggered from other
//! threads but observer delivery is forced back onto the UI thread. This
//! module tracks which thread that is and provides assertions to verify
//! thread affinity.
//!
//! The main thread is recorded when [`crate::UiDispatcher::install`] runs.
//! After that:
//!
//! ```ignore
//! use star_rating_core::{debug_assert_main_thread, is_main_thread};
//!
//! fn update_widget() {
//!     // Panic in debug builds if not on the UI thread
//!     debug_assert_main_thread!();
//!     // ... update widget state ...
//! }
//! ```
//!
//! Two levels of checking are provided:
//!
//! - **Debug assertions** (`debug_assert_main_thread!`): only active in debug
//!   builds, suitable for liberal use in widget code.
//! - **Runtime assertions** (`assert_main_thread!`): always active, for
//!   operations where thread safety must hold even in release builds.

use std::sync::OnceLock;
use std::thread::ThreadId;

/// Global storage for the main thread ID.
static MAIN_THREAD_ID: OnceLock<ThreadId> = OnceLock::new();

/// Set the main thread ID.
///
/// This is called by `UiDispatcher::install()`. It should only be called
/// once, from the UI thread, at host startup.
///
/// # Panics
///
/// Panics if called again from a different thread.
pub fn set_main_thread() {
    let current = std::thread::current().id();
    if MAIN_THREAD_ID.set(current).is_err() {
        // Already set - verify it's the same thread
        if MAIN_THREAD_ID.get() != Some(&current) {
            panic!(
                "set_main_thread() called from different thread than original. \
                 The main thread ID can only be set once."
            );
        }
    }
}

/// Get the main thread ID if it has been set.
///
/// Returns `None` if no dispatcher has been installed yet.
#[inline]
pub fn main_thread_id() -> Option<ThreadId> {
    MAIN_THREAD_ID.get().copied()
}

/// Check if the current thread is the main (UI) thread.
///
/// Returns `true` if:
/// - We are on the main thread, OR
/// - The main thread has not been set yet (graceful fallback)
///
/// Returns `false` only if:
/// - The main thread has been set AND we are on a different thread
#[inline]
pub fn is_main_thread() -> bool {
    match MAIN_THREAD_ID.get() {
        Some(&main_id) => std::thread::current().id() == main_id,
        // If not set, assume we're fine (early initialization)
        None => true,
    }
}

/// Panics if the current thread is not the main thread.
///
/// This is always active (in both debug and release builds). Use
/// `debug_assert_main_thread!()` for checks that should only run in debug builds.
#[macro_export]
macro_rules! assert_main_thread {
    () => {
        $crate::assert_main_thread!("operation must be performed on the main thread")
    };
    ($msg:expr) => {
        if !$crate::thread_check::is_main_thread() {
            $crate::thread_check::panic_not_main_thread($msg, file!(), line!());
        }
    };
    ($fmt:expr, $($arg:tt)*) => {
        if !$crate::thread_check::is_main_thread() {
            $crate::thread_check::panic_not_main_thread(
                &format!($fmt, $($arg)*),
                file!(),
                line!()
            );
        }
    };
}

/// Debug-only assertion that panics if not on the main thread.
///
/// This macro is a no-op in release builds.
#[macro_export]
macro_rules! debug_assert_main_thread {
    () => {
        #[cfg(debug_assertions)]
        $crate::assert_main_thread!()
    };
    ($msg:expr) => {
        #[cfg(debug_assertions)]
        $crate::assert_main_thread!($msg)
    };
}

/// Internal function to generate the panic message for thread violations.
///
/// This is called by the assertion macros.
#[cold]
#[inline(never)]
#[doc(hidden)]
pub fn panic_not_main_thread(msg: &str, file: &str, line: u32) -> ! {
    let current = std::thread::current();
    let current_name = current.name().unwrap_or("<unnamed>");
    let current_id = current.id();

    let main_info = match main_thread_id() {
        Some(id) => format!("main thread ID: {:?}", id),
        None => "main thread not yet registered".to_string(),
    };

    panic!(
        "\n\
        THREAD SAFETY VIOLATION\n\
        \n\
        {msg}\n\
        \n\
        Location: {file}:{line}\n\
        Current thread: \"{current_name}\" (ID: {current_id:?})\n\
        {main_info}\n\
        \n\
        Widget state and display updates must occur on the UI thread.\n\
        Either deliver events on the thread that installed the UiDispatcher,\n\
        or use signals with ConnectionType::Queued / BlockingQueued to cross\n\
        threads."
    )
}

/// Thread affinity tracker for objects.
///
/// Records the thread a value was created on and verifies that later
/// operations occur on the same thread.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create a new thread affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Create a thread affinity tracker for the main thread.
    ///
    /// If the main thread has not been set yet, falls back to the current thread.
    pub fn main_thread() -> Self {
        Self {
            thread_id: main_thread_id().unwrap_or_else(|| std::thread::current().id()),
        }
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Assert that we are on the same thread as the affinity.
    ///
    /// This always runs (debug and release builds).
    ///
    /// # Panics
    ///
    /// Panics with a descriptive message if called from a different thread.
    #[inline]
    pub fn assert_same_thread(&self) {
        self.assert_same_thread_with_msg("object accessed from wrong thread")
    }

    /// Assert that we are on the same thread, with a custom message.
    ///
    /// # Panics
    ///
    /// Panics if called from a different thread.
    pub fn assert_same_thread_with_msg(&self, msg: &str) {
        if !self.is_same_thread() {
            self.panic_wrong_thread(msg);
        }
    }

    /// Debug-only assertion that we are on the same thread.
    ///
    /// This is a no-op in release builds.
    #[inline]
    pub fn debug_assert_same_thread(&self) {
        #[cfg(debug_assertions)]
        self.assert_same_thread();
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, msg: &str) -> ! {
        let current = std::thread::current();
        let current_name = current.name().unwrap_or("<unnamed>");
        let current_id = current.id();

        panic!(
            "\n\
            THREAD AFFINITY VIOLATION\n\
            \n\
            {msg}\n\
            \n\
            Object was created on thread: {:?}\n\
            Current thread: \"{current_name}\" (ID: {current_id:?})\n\
            \n\
            This object must only be accessed from the thread it was created\n\
            on. Post the operation to that thread, or use signals with\n\
            ConnectionType::Queued for cross-thread delivery.",
            self.thread_id
        )
    }
}
