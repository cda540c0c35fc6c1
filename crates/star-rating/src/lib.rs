//! A touch-driven five-star rating widget.
//!
//! This crate provides [`StarRating`], a host-agnostic rating control: the
//! host assigns it geometry, feeds it touch events, and replays its recorded
//! draw commands. The control maps horizontal touch position to a star
//! count, follows the finger live during a drag, and commits the rating
//! when the gesture finishes.
//!
//! # Overview
//!
//! - [`StarRating`]: the control itself, with `rating_committed` and
//!   `asset_missing` signals and a [`RatingObserver`] channel for
//!   synchronous main-thread commit delivery
//! - [`Widget`] / [`WidgetBase`]: the widget substrate (geometry,
//!   visibility, repaint tracking)
//! - [`WidgetEvent`]: resize and touch events with per-point phases
//! - [`Frame`] / [`PaintContext`]: a recorded draw list, so painting works
//!   against any renderer
//! - [`AssetRegistry`]: named icon lookup with embedded, filesystem, and
//!   in-memory sources
//!
//! # Example
//!
//! ```ignore
//! use star_rating::{
//!     Frame, Point, Rect, ResizeEvent, Size, StarRating, TouchEvent,
//!     TouchPhase, TouchPoint, Widget, WidgetEvent,
//! };
//! use star_rating_core::init_global_registry;
//!
//! init_global_registry();
//!
//! let mut control = StarRating::new().with_rating(3);
//! control.rating_committed.connect(|&rating| {
//!     println!("user rated: {rating}");
//! });
//!
//! // Host assigns geometry, then delivers the bounds-finalized hook
//! control.set_geometry(Rect::new(0.0, 0.0, 150.0, 34.0));
//! control.event(&mut WidgetEvent::Resize(ResizeEvent::new(
//!     Size::ZERO,
//!     Size::new(150.0, 34.0),
//! )));
//!
//! // Touch events drive the rating; a paint pass records draw commands
//! control.event(&mut WidgetEvent::Touch(TouchEvent::new(TouchPoint::new(
//!     1,
//!     Point::new(80.0, 17.0),
//!     TouchPhase::Ended,
//! ))));
//!
//! let mut frame = Frame::new();
//! control.render(&mut frame);
//! for command in frame.commands() {
//!     // Replay into the host renderer
//! }
//! ```
//!
//! # Threading
//!
//! The control itself is single-threaded: hosts deliver events and paint on
//! the UI thread. The observer channel is the exception; see
//! [`RatingObserver`] and `star_rating_core::UiDispatcher` for the
//! cross-thread commit contract.

pub mod assets;
mod events;
mod geometry;
mod painting;
mod star_rating;
mod widget;

pub use assets::{
    AssetError, AssetRegistry, AssetResult, EmbeddedDir, IconImage, STAR_OFF_ASSET, STAR_ON_ASSET,
};
pub use events::{
    EventBase, ResizeEvent, TouchEvent, TouchPhase, TouchPoint, WidgetEvent,
};
pub use geometry::{Point, Rect, Size, SizeHint};
pub use painting::{DrawCommand, Frame, PaintContext, fit_rect};
pub use star_rating::{RatingListener, RatingObserver, StarRating, STAR_COUNT};
pub use widget::{AsWidget, Widget, WidgetBase};
