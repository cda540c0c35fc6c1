//! Logging and debugging facilities.
//!
//! This module provides:
//! - Integration with the `tracing` crate for structured logging
//! - Debug formatting for the live object registry
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! All instrumentation goes through the `tracing` crate. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     // Initialize tracing (you can customize this)
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! # Debug Visualization
//!
//! Use [`ObjectListDebug`] to dump the registered objects, e.g. to check
//! which controls are still alive after teardown:
//!
//! ```ignore
//! use star_rating_core::logging::ObjectListDebug;
//!
//! let debug = ObjectListDebug::new();
//! println!("{}", debug);
//! ```

use std::fmt::{self, Write as FmtWrite};

use crate::object::{ObjectResult, global_registry};

/// Span names used for tracing.
///
/// These constants can be used to filter traces for specific subsystems.
pub mod span_names {
    /// Signal emission span.
    pub const SIGNAL: &str = "star_rating::signal";
    /// Dispatcher pump span.
    pub const DISPATCH: &str = "star_rating::dispatch";
    /// Object lifecycle span.
    pub const OBJECT: &str = "star_rating::object";
    /// Widget painting span.
    pub const PAINT: &str = "star_rating::paint";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "star_rating_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "star_rating_core::signal";
    /// Dispatcher target.
    pub const DISPATCH: &str = "star_rating_core::dispatch";
    /// Object model target.
    pub const OBJECT: &str = "star_rating_core::object";
}

/// Configuration for object list debug output.
#[derive(Debug, Clone)]
pub struct ListFormatOptions {
    /// Whether to show object IDs.
    pub show_ids: bool,
    /// Whether to show type names.
    pub show_types: bool,
}

impl Default for ListFormatOptions {
    fn default() -> Self {
        Self {
            show_ids: true,
            show_types: true,
        }
    }
}

impl ListFormatOptions {
    /// Create options for minimal output (names only).
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_types: false,
        }
    }
}

/// Debug utility for listing live objects.
///
/// The registry is flat, so this prints one line per registered object in
/// a human-readable format.
#[derive(Debug, Clone)]
pub struct ObjectListDebug {
    options: ListFormatOptions,
}

impl ObjectListDebug {
    /// Create a new debug formatter with default options.
    pub fn new() -> Self {
        Self {
            options: ListFormatOptions::default(),
        }
    }

    /// Create a debug formatter with custom options.
    pub fn with_options(options: ListFormatOptions) -> Self {
        Self { options }
    }

    /// Format every live object, one per line.
    pub fn format_all(&self) -> ObjectResult<String> {
        let registry = global_registry()?;

        let mut output = String::new();
        writeln!(output, "Live objects ({} total):", registry.object_count())
            .expect("write to String");

        let ids = registry.all_objects();
        if ids.is_empty() {
            writeln!(output, "  (none)").expect("write to String");
            return Ok(output);
        }

        for id in ids {
            let name = registry.object_name(id)?;
            let type_name = registry.type_name(id)?;

            output.push_str("  ");
            if name.is_empty() {
                output.push_str("(unnamed)");
            } else {
                output.push_str(&name);
            }

            if self.options.show_ids {
                write!(output, " [{:?}]", id).expect("write to String");
            }

            if self.options.show_types {
                // Short type name reads better than the full path
                let short_type = type_name.rsplit("::").next().unwrap_or(type_name);
                write!(output, " ({})", short_type).expect("write to String");
            }

            output.push('\n');
        }

        Ok(output)
    }
}

impl Default for ObjectListDebug {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectListDebug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format_all() {
            Ok(output) => write!(f, "{}", output),
            Err(e) => write!(f, "Error formatting object list: {}", e),
        }
    }
}

/// A guard that emits a tracing span when dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "star_rating::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are re-exported for convenience but are just wrappers around
/// the `tracing` crate macros with consistent target naming.
#[macro_export]
macro_rules! rating_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "star_rating_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! rating_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "star_rating_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! rating_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "star_rating_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! rating_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "star_rating_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! rating_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "star_rating_core", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Object, ObjectBase, ObjectId, init_global_registry};

    struct TestControl {
        base: ObjectBase,
    }

    impl TestControl {
        fn new(name: &str) -> Self {
            let control = Self {
                base: ObjectBase::new::<Self>(),
            };
            control.base.set_name(name);
            control
        }
    }

    impl Object for TestControl {
        fn object_id(&self) -> ObjectId {
            self.base.id()
        }
    }

    fn setup() {
        init_global_registry();
    }

    #[test]
    fn test_list_format_header() {
        setup();
        let debug = ObjectListDebug::new();
        let output = debug.format_all().unwrap();
        assert!(output.contains("Live objects"));
    }

    #[test]
    fn test_list_format_single() {
        setup();
        let _control = TestControl::new("ratings-panel");

        let debug = ObjectListDebug::new();
        let output = debug.format_all().unwrap();

        assert!(output.contains("ratings-panel"));
        assert!(output.contains("TestControl"));
    }

    #[test]
    fn test_list_format_minimal() {
        setup();
        let _control = TestControl::new("plain");

        let debug = ObjectListDebug::with_options(ListFormatOptions::minimal());
        let output = debug.format_all().unwrap();

        assert!(output.contains("plain"));
        assert!(!output.contains("TestControl"));
    }

    #[test]
    fn test_perf_span() {
        setup();
        // Just ensure it compiles and doesn't panic
        let _span = PerfSpan::new("test_operation");
    }
}
