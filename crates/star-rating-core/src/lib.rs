//! Core systems for the star-rating widget.
//!
//! This crate provides the foundational components the rating control is
//! built on:
//!
//! - **Object Model**: Registered identity and naming for live controls
//! - **Signal/Slot System**: Type-safe notification of rating changes
//! - **Queued Invocation**: Deferred slot execution with optional blocking
//! - **UI Dispatcher**: Host-pumped delivery of cross-thread notifications
//! - **Thread Checks**: Main-thread affinity assertions for UI state
//!
//! # Signal/Slot Example
//!
//! ```
//! use star_rating_core::Signal;
//!
//! // A signal carrying the committed rating
//! let rating_committed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the notification
//! let conn_id = rating_committed.connect(|rating| {
//!     println!("rated: {} stars", rating);
//! });
//!
//! // Emit the signal
//! rating_committed.emit(5);
//!
//! // Disconnect when done
//! rating_committed.disconnect(conn_id);
//! ```
//!
//! # Dispatcher Example
//!
//! Hosts that emit or receive notifications across threads install the
//! dispatcher on their UI thread and pump it from their loop:
//!
//! ```no_run
//! use star_rating_core::UiDispatcher;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = UiDispatcher::install()?;
//!
//!     loop {
//!         // ... handle host events ...
//!         dispatcher.process_pending();
//!     }
//! }
//! ```

mod dispatch;
mod error;
pub mod invocation;
pub mod logging;
pub mod object;
pub mod signal;
pub mod thread_check;

pub use dispatch::UiDispatcher;
pub use error::{CoreError, Result, SignalError};
pub use logging::{ListFormatOptions, ObjectListDebug, PerfSpan};
pub use object::{
    Object, ObjectBase, ObjectError, ObjectId, ObjectRegistry, ObjectResult, SharedObjectRegistry,
    global_registry, init_global_registry,
};
pub use signal::{ConnectionGuard, ConnectionId, ConnectionType, Signal};
pub use thread_check::{ThreadAffinity, is_main_thread, main_thread_id, set_main_thread};
