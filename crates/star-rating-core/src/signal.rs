//! Type-safe signal/slot system.
//!
//! Signals are how the rating widget reports state changes to application
//! code: the control emits, connected slots (closures) run. A slot can be
//! invoked directly on the emitting thread or queued to the UI thread,
//! depending on its [`ConnectionType`].
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The signal type widgets expose as public fields
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionType`] - How a slot should be invoked (Direct, Queued, etc.)
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Thread Safety
//!
//! Signals support cross-thread delivery through queued connections. When a
//! slot is connected on the UI thread and the signal is emitted from a worker:
//!
//! - With [`ConnectionType::Auto`] (default), the slot is queued to the
//!   installed [`crate::UiDispatcher`] and runs when the host pumps it.
//! - With [`ConnectionType::Queued`], the slot is always queued regardless of
//!   which thread emits.
//! - With [`ConnectionType::BlockingQueued`], the emitting thread blocks until
//!   the slot finishes executing on the UI thread.
//!
//! Without an installed dispatcher, queued deliveries degrade to immediate
//! execution on the emitting thread. Single-threaded hosts never notice;
//! multi-threaded hosts should install a dispatcher.
//!
//! # Example
//!
//! ```
//! use star_rating_core::Signal;
//!
//! // A signal carrying the committed rating value.
//! let rating_committed = Signal::<i32>::new();
//!
//! let conn_id = rating_committed.connect(|rating| {
//!     println!("user rated: {rating}");
//! });
//!
//! rating_committed.emit(4);
//!
//! rating_committed.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::ThreadId;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::dispatch::UiDispatcher;
use crate::invocation::{QueuedInvocation, completion_pair, invocation_registry};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected or
    /// the signal is dropped.
    pub struct ConnectionId;
}

/// Specifies how a connected slot should be invoked when the signal is emitted.
///
/// Use with [`Signal::connect_with_type`] to control invocation behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionType {
    /// Invoke the slot immediately on the emitting thread.
    ///
    /// This is the fastest option but requires the slot to be safe to call
    /// from any thread.
    Direct,

    /// Queue the slot invocation to the UI dispatcher.
    ///
    /// This is safe for cross-thread communication. The slot runs when the
    /// host drains the dispatcher.
    Queued,

    /// Automatically choose Direct or Queued based on thread affinity.
    ///
    /// - Same thread as the connection: Direct invocation
    /// - Different thread: Queued invocation
    ///
    /// This is the default and recommended option for most use cases.
    #[default]
    Auto,

    /// Like Queued, but blocks the emitting thread until the slot completes.
    ///
    /// This mirrors a synchronous main-thread callback: the worker that
    /// triggered the notification does not proceed until the UI thread has
    /// observed it.
    ///
    /// # Warning
    ///
    /// Emitting a `BlockingQueued` connection from the dispatcher's own
    /// thread would deadlock (emit waits on a queue that only this thread
    /// drains), so same-thread emission degrades to a direct call instead.
    BlockingQueued,
}

/// Internal storage for a single connection.
struct Connection<Args> {
    /// The slot function to invoke (Arc-wrapped for cross-thread capture).
    slot: Arc<dyn Fn(&Args) + Send + Sync>,
    /// How to invoke this slot.
    connection_type: ConnectionType,
    /// The thread this connection was created on (for Auto).
    target_thread: ThreadId,
}

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with the
/// provided arguments. The rating control exposes its notifications as
/// public `Signal` fields, e.g. `rating_committed: Signal<i32>`.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for
///   signals with no arguments, or a tuple for multiple arguments.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync` and can be safely shared between threads.
/// The [`ConnectionType`] determines how slots are invoked across thread
/// boundaries.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args: Clone + Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Clone + Send + 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// The slot will be invoked with `ConnectionType::Auto`, meaning it will
    /// be called directly if emitted on the connecting thread, or queued
    /// otherwise.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use star_rating_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connect_with_type(slot, ConnectionType::Auto)
    }

    /// Connect a slot with a specific connection type.
    ///
    /// # Example
    ///
    /// ```
    /// use star_rating_core::{ConnectionType, Signal};
    ///
    /// let signal = Signal::<i32>::new();
    ///
    /// // Always invoke directly (fast, but not cross-thread safe)
    /// signal.connect_with_type(|n| println!("{}", n), ConnectionType::Direct);
    ///
    /// // Always queue (safe for cross-thread)
    /// signal.connect_with_type(|n| println!("{}", n), ConnectionType::Queued);
    ///
    /// signal.emit(3);
    /// ```
    pub fn connect_with_type<F>(&self, slot: F, connection_type: ConnectionType) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let connection = Connection {
            slot: Arc::new(slot),
            connection_type,
            target_thread: std::thread::current().id(),
        };
        self.connections.lock().insert(connection)
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing. Useful during batch
    /// updates to suppress cascading notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots.
    ///
    /// If the signal is blocked, this does nothing. Otherwise, all connected
    /// slots are invoked according to their connection type:
    ///
    /// - `Direct`: Called immediately on the current thread
    /// - `Auto`: Called directly if same thread, queued otherwise
    /// - `Queued`: Always queued to the UI dispatcher
    /// - `BlockingQueued`: Queued, then the emitter blocks until the slot
    ///   completes (degrades to direct when queuing would deadlock)
    ///
    /// # Arguments
    ///
    /// - `args`: The arguments to pass to each slot. These are cloned for
    ///   each Queued/BlockingQueued connection.
    #[tracing::instrument(skip_all, target = "star_rating_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "star_rating_core::signal", "signal blocked, skipping emit");
            return;
        }

        let current_thread = std::thread::current().id();
        let connections = self.connections.lock();
        tracing::trace!(
            target: "star_rating_core::signal",
            connection_count = connections.len(),
            "emitting signal"
        );

        // Collect blocking waiters to wait on after releasing the lock.
        let mut blocking_waiters = Vec::new();

        for (_, conn) in connections.iter() {
            match conn.connection_type {
                ConnectionType::Direct => {
                    (conn.slot)(&args);
                }
                ConnectionType::Auto => {
                    if conn.target_thread == current_thread {
                        (conn.slot)(&args);
                    } else {
                        self.queue_invocation(conn.slot.clone(), args.clone());
                    }
                }
                ConnectionType::Queued => {
                    self.queue_invocation(conn.slot.clone(), args.clone());
                }
                ConnectionType::BlockingQueued => {
                    if let Some(waiter) =
                        self.queue_invocation_blocking(conn.slot.clone(), args.clone(), current_thread)
                    {
                        blocking_waiters.push(waiter);
                    }
                }
            }
        }

        // Release the lock before waiting on blocking connections.
        drop(connections);

        for waiter in blocking_waiters {
            waiter.wait();
        }
    }

    /// Queue an invocation to the UI dispatcher.
    fn queue_invocation(&self, slot: Arc<dyn Fn(&Args) + Send + Sync>, args: Args) {
        let invocation = QueuedInvocation::new(move || {
            slot(&args);
        });
        let invocation_id = invocation_registry().register(invocation);

        if let Some(dispatcher) = UiDispatcher::try_instance() {
            if dispatcher.post(invocation_id).is_ok() {
                return;
            }
        }

        // No dispatcher (or a closed queue): execute immediately so the
        // notification is not lost. Common in tests and single-threaded hosts.
        tracing::warn!(
            target: "star_rating_core::signal",
            "no UI dispatcher for queued slot, executing immediately"
        );
        if let Some(inv) = invocation_registry().take(invocation_id) {
            inv.execute();
        }
    }

    /// Queue an invocation with blocking wait.
    ///
    /// Returns the waiter to block on, or `None` when the invocation already
    /// ran inline (same-thread emission or no dispatcher installed).
    fn queue_invocation_blocking(
        &self,
        slot: Arc<dyn Fn(&Args) + Send + Sync>,
        args: Args,
        current_thread: ThreadId,
    ) -> Option<crate::invocation::CompletionWaiter> {
        let dispatcher = match UiDispatcher::try_instance() {
            Some(dispatcher) => dispatcher,
            None => {
                tracing::warn!(
                    target: "star_rating_core::signal",
                    "no UI dispatcher for blocking queued slot, executing immediately"
                );
                slot(&args);
                return None;
            }
        };

        // Waiting on our own queue would never finish.
        if dispatcher.main_thread_id() == current_thread {
            slot(&args);
            return None;
        }

        let (handle, waiter) = completion_pair();
        let invocation = QueuedInvocation::with_completion(
            move || {
                slot(&args);
            },
            handle,
        );
        let invocation_id = invocation_registry().register(invocation);

        if dispatcher.post(invocation_id).is_err() {
            if let Some(inv) = invocation_registry().take(invocation_id) {
                inv.execute();
            }
            return None;
        }
        Some(waiter)
    }
}

// Signal is Send + Sync when Args is Send
unsafe impl<Args: Send> Send for Signal<Args> {}
unsafe impl<Args: Send> Sync for Signal<Args> {}

/// A connection guard that automatically disconnects when dropped.
///
/// This is useful for RAII-style connection management, ensuring connections
/// are cleaned up when the receiver goes out of scope. Created via
/// [`Signal::connect_scoped`].
///
/// # Example
///
/// ```
/// use star_rating_core::Signal;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicI32, Ordering};
///
/// let signal = Signal::<i32>::new();
/// let total = Arc::new(AtomicI32::new(0));
/// {
///     let total_clone = total.clone();
///     let _guard = signal.connect_scoped(move |&n| {
///         total_clone.fetch_add(n, Ordering::SeqCst);
///     });
///     signal.emit(5); // total = 5
/// }
/// signal.emit(3); // Nothing happens - connection was dropped
/// assert_eq!(total.load(Ordering::SeqCst), 5);
/// ```
pub struct ConnectionGuard<Args: Clone + Send + 'static> {
    signal: *const Signal<Args>,
    id: ConnectionId,
}

impl<Args: Clone + Send + 'static> Signal<Args> {
    /// Connect a slot with automatic disconnection when the guard is dropped.
    ///
    /// # Safety
    ///
    /// The returned guard holds a raw pointer to this signal. The signal must
    /// outlive the guard. Using `Arc<Signal<Args>>` is recommended for shared
    /// ownership.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            signal: self as *const Signal<Args>,
            id,
        }
    }
}

impl<Args: Clone + Send + 'static> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        // SAFETY: The signal pointer is valid if the guard is used correctly.
        // The caller must ensure the signal outlives the guard.
        unsafe {
            if !self.signal.is_null() {
                let _ = (*self.signal).disconnect(self.id);
            }
        }
    }
}

// SAFETY: ConnectionGuard is Send + Sync because:
// - The raw pointer `signal` is only dereferenced in `drop()`.
// - Signal<Args> itself is Send + Sync (connections behind a Mutex).
// - The ConnectionId is a simple Copy type (slotmap key).
// - The guard's safety contract (documented in `connect_scoped`) requires the
//   Signal to outlive the guard, which the caller must ensure.
unsafe impl<Args: Clone + Send + 'static> Send for ConnectionGuard<Args> {}
unsafe impl<Args: Clone + Send + 'static> Sync for ConnectionGuard<Args> {}
