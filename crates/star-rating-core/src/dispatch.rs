//! Main-thread dispatcher for queued slot delivery.
//!
//! A widget component crate does not own the host's event loop, so queued
//! signal deliveries cannot be posted to one directly. Instead the host
//! installs a [`UiDispatcher`] once on its UI thread and drains it from its
//! own loop:
//!
//! ```ignore
//! use star_rating_core::UiDispatcher;
//!
//! // At startup, on the UI thread:
//! let dispatcher = UiDispatcher::install()?;
//!
//! // Inside the host's per-frame / per-event-batch processing:
//! dispatcher.process_pending();
//! ```
//!
//! `Signal::emit` posts invocation IDs here for `Queued`, cross-thread
//! `Auto`, and `BlockingQueued` connections. When no dispatcher is
//! installed, signals fall back to executing queued invocations
//! immediately on the emitting thread (with a warning), which keeps
//! single-threaded hosts and unit tests working without any setup.

use std::sync::OnceLock;
use std::thread::ThreadId;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::error::{CoreError, Result, SignalError};
use crate::invocation::invocation_registry;
use crate::thread_check::{self, ThreadAffinity};

/// Global dispatcher instance.
static DISPATCHER: OnceLock<UiDispatcher> = OnceLock::new();

/// The installed main-thread pump for queued slot invocations.
///
/// This is a singleton - only one `UiDispatcher` can exist per process, and
/// the thread that installs it becomes the main (UI) thread for the rest of
/// the process lifetime.
pub struct UiDispatcher {
    /// Producer side, cloned into emitting threads via `post`.
    tx: Sender<u64>,
    /// Consumer side, drained on the UI thread.
    rx: Receiver<u64>,
    /// The UI thread this dispatcher is bound to.
    affinity: ThreadAffinity,
}

impl UiDispatcher {
    fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            tx,
            rx,
            affinity: ThreadAffinity::current(),
        }
    }

    /// Install the global dispatcher on the current thread.
    ///
    /// The current thread is recorded as the main (UI) thread. Calling
    /// `install` again from the same thread returns the existing instance;
    /// calling it from a different thread is an error.
    pub fn install() -> Result<&'static UiDispatcher> {
        if let Some(existing) = DISPATCHER.get() {
            return if existing.affinity.is_same_thread() {
                Ok(existing)
            } else {
                Err(CoreError::DispatcherThreadConflict)
            };
        }

        match DISPATCHER.set(UiDispatcher::new()) {
            Ok(()) => {
                thread_check::set_main_thread();
                tracing::debug!(target: "star_rating_core::dispatch", "UI dispatcher installed");
                Ok(DISPATCHER.get().expect("dispatcher was just installed"))
            }
            Err(_) => {
                // Lost an install race; defer to whoever won.
                let existing = DISPATCHER.get().expect("dispatcher present after set failure");
                if existing.affinity.is_same_thread() {
                    Ok(existing)
                } else {
                    Err(CoreError::DispatcherThreadConflict)
                }
            }
        }
    }

    /// Get the global dispatcher instance.
    ///
    /// # Panics
    ///
    /// Panics if [`UiDispatcher::install`] has not been called yet.
    pub fn instance() -> &'static UiDispatcher {
        DISPATCHER
            .get()
            .expect("UI dispatcher not installed. Call UiDispatcher::install() first.")
    }

    /// Try to get the global dispatcher instance.
    ///
    /// Returns `None` if [`UiDispatcher::install`] has not been called yet.
    pub fn try_instance() -> Option<&'static UiDispatcher> {
        DISPATCHER.get()
    }

    /// Post a queued invocation ID for the UI thread to execute.
    ///
    /// This is thread-safe and can be called from any thread.
    pub fn post(&self, invocation_id: u64) -> Result<()> {
        self.tx
            .send(invocation_id)
            .map_err(|_| CoreError::Signal(SignalError::QueueFailed))
    }

    /// The thread this dispatcher delivers on.
    pub fn main_thread_id(&self) -> ThreadId {
        self.affinity.thread_id()
    }

    /// Number of invocations posted but not yet processed.
    pub fn pending_count(&self) -> usize {
        self.rx.len()
    }

    /// Execute all pending invocations. Returns how many ran.
    ///
    /// Must be called on the thread that installed the dispatcher.
    pub fn process_pending(&self) -> usize {
        self.affinity.debug_assert_same_thread();

        let mut executed = 0;
        while let Ok(id) = self.rx.try_recv() {
            if self.execute_by_id(id) {
                executed += 1;
            }
        }
        if executed > 0 {
            tracing::trace!(target: "star_rating_core::dispatch", executed, "processed queued invocations");
        }
        executed
    }

    /// Wait up to `timeout` for one invocation and execute it.
    ///
    /// Returns `true` if an invocation was received within the timeout.
    /// Must be called on the thread that installed the dispatcher.
    pub fn process_next(&self, timeout: Duration) -> bool {
        self.affinity.debug_assert_same_thread();

        match self.rx.recv_timeout(timeout) {
            Ok(id) => {
                self.execute_by_id(id);
                true
            }
            Err(_) => false,
        }
    }

    fn execute_by_id(&self, id: u64) -> bool {
        match invocation_registry().take(id) {
            Some(invocation) => {
                invocation.execute();
                true
            }
            None => {
                tracing::warn!(
                    target: "star_rating_core::dispatch",
                    invocation_id = id,
                    "queued invocation missing from registry"
                );
                false
            }
        }
    }
}

static_assertions::assert_impl_all!(UiDispatcher: Send, Sync);
