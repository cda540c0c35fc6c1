//! Star rating control implementation.
//!
//! This module provides [`StarRating`], a widget for picking a zero-to-five
//! star rating by tapping or dragging across a row of star icons.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use star_rating::{RatingObserver, StarRating};
//!
//! let mut control = StarRating::new().with_rating(3);
//!
//! // Connect to rating commits
//! control.rating_committed.connect(|&rating| {
//!     println!("user rated: {rating}");
//! });
//! ```

use std::sync::Arc;

use star_rating_core::{ConnectionId, ConnectionType, Object, ObjectId, Signal};

use crate::assets::{AssetRegistry, IconImage, STAR_OFF_ASSET, STAR_ON_ASSET};
use crate::events::{TouchPhase, WidgetEvent};
use crate::geometry::{Point, Rect, Size, SizeHint};
use crate::painting::PaintContext;
use crate::widget::{Widget, WidgetBase};

/// Number of stars the control displays.
pub const STAR_COUNT: usize = 5;

/// Vertical inset above and below the icon row.
const VERTICAL_INSET: f32 = 2.0;

/// Divisor of the widget width defining the clear zone at the left edge of
/// the first star. A touch inside it sets the rating to zero.
const CLEAR_ZONE_DIVISOR: f32 = 20.0;

/// Nominal icon edge used for the size hint.
const DEFAULT_ICON_EDGE: f32 = 24.0;

/// Smallest icon edge the control is still usable at.
const MIN_ICON_EDGE: f32 = 8.0;

/// Listener closure type accepted by [`StarRating::configure`].
pub type RatingListener = Box<dyn Fn(&i32) + Send + Sync>;

/// Observer object notified when the user commits a rating.
///
/// Unlike listener closures on [`StarRating::rating_committed`], observer
/// delivery is synchronous on the UI thread: when the commit happens on
/// another thread and a `UiDispatcher` is installed, the committing thread
/// blocks until the observer has run.
pub trait RatingObserver: Send + Sync {
    /// Called with the committed rating after a gesture finishes.
    fn rating_committed(&self, rating: i32);
}

/// One of the five star positions.
#[derive(Debug, Clone, Copy, Default)]
struct IconSlot {
    /// Layout rect in widget-local coordinates.
    rect: Rect,
    /// Whether the slot currently shows the lit image.
    lit: bool,
}

/// A five-star rating widget.
///
/// The control maps horizontal touch position to a star count: each fifth of
/// the width is one star, and the far left edge of the first star clears the
/// rating to zero. During a gesture the displayed rating follows the finger;
/// lifting the finger commits the rating and notifies observers.
///
/// # Signals
///
/// - `rating_committed(i32)`: Emitted when a gesture finishes (end or cancel)
/// - `asset_missing(String)`: Emitted when a star image cannot be resolved
///
/// # Gesture Lifecycle
///
/// - `Started` / `Moved`: in-bounds samples update the rating and display
///   live; out-of-bounds samples are ignored entirely.
/// - `Ended`: the end position updates the rating one last time, then the
///   commit notification fires.
/// - `Cancelled`: the display refreshes from the current rating (no position
///   recompute) and the commit notification still fires.
pub struct StarRating {
    /// Widget base.
    base: WidgetBase,

    /// Current rating value.
    ///
    /// Gesture-derived values are always 0..=5. Programmatic sets are not
    /// clamped; display state is derived by comparison, so out-of-range
    /// values render as all-lit or all-unlit.
    rating: i32,

    /// The five star slots, index 0 = leftmost = one star.
    slots: [IconSlot; STAR_COUNT],

    /// Whether slots have been laid out against final geometry.
    initialized: bool,

    /// Whether a touch gesture is currently in progress.
    tracking: bool,

    /// Resolved lit-star image, if the asset could be found.
    star_on: Option<Arc<IconImage>>,

    /// Resolved unlit-star image, if the asset could be found.
    star_off: Option<Arc<IconImage>>,

    /// Internal signal carrying observer-object notifications.
    ///
    /// The observer is connected `BlockingQueued` so commit delivery is
    /// synchronous on the UI thread.
    observer_signal: Signal<i32>,

    /// Connection id of the installed observer, if any.
    observer_connection: Option<ConnectionId>,

    /// Signal emitted when the user commits a rating.
    pub rating_committed: Signal<i32>,

    /// Signal emitted when a star image cannot be resolved, carrying the
    /// asset name that failed.
    pub asset_missing: Signal<String>,
}

impl StarRating {
    /// Create a new star rating control with rating zero.
    ///
    /// Star images are resolved from the global [`AssetRegistry`]; missing
    /// images leave their icons blank and emit
    /// [`asset_missing`](Self::asset_missing).
    ///
    /// # Panics
    ///
    /// Panics if the global object registry is not initialized.
    pub fn new() -> Self {
        let mut control = Self {
            base: WidgetBase::new::<Self>(),
            rating: 0,
            slots: [IconSlot::default(); STAR_COUNT],
            initialized: false,
            tracking: false,
            star_on: None,
            star_off: None,
            observer_signal: Signal::new(),
            observer_connection: None,
            rating_committed: Signal::new(),
            asset_missing: Signal::new(),
        };
        control.resolve_assets();
        control
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Configure rating, observer object, and listener closure in one call.
    ///
    /// - `rating` is stored without clamping; out-of-range values display as
    ///   all-lit or all-unlit.
    /// - `observer` replaces the current observer object; `None` clears it.
    /// - `on_change` connects a listener to
    ///   [`rating_committed`](Self::rating_committed); `None` leaves existing
    ///   connections untouched.
    ///
    /// Unresolved star images are retried here, which is the recovery path
    /// for assets registered after the control was built.
    ///
    /// Returns `true` when both star images are resolved; `false` means the
    /// control draws blank icons until the assets become available and
    /// `configure` is called again.
    pub fn configure(
        &mut self,
        rating: i32,
        observer: Option<Arc<dyn RatingObserver>>,
        on_change: Option<RatingListener>,
    ) -> bool {
        self.set_rating(rating);
        match observer {
            Some(observer) => self.set_observer(observer),
            None => self.clear_observer(),
        }
        if let Some(listener) = on_change {
            self.rating_committed.connect(listener);
        }
        self.resolve_assets();
        self.star_on.is_some() && self.star_off.is_some()
    }

    /// Get the current rating.
    pub fn rating(&self) -> i32 {
        self.rating
    }

    /// Set the rating programmatically.
    ///
    /// The value is not clamped. Does not fire commit notifications; only
    /// finished gestures commit.
    pub fn set_rating(&mut self, rating: i32) {
        if self.rating != rating {
            self.rating = rating;
            if self.initialized {
                self.refresh_display();
            }
        }
    }

    /// Set the rating using the builder pattern.
    pub fn with_rating(mut self, rating: i32) -> Self {
        self.set_rating(rating);
        self
    }

    /// Install an observer object, replacing any previous one.
    pub fn set_observer(&mut self, observer: Arc<dyn RatingObserver>) {
        self.clear_observer();
        let id = self.observer_signal.connect_with_type(
            move |&rating| observer.rating_committed(rating),
            ConnectionType::BlockingQueued,
        );
        self.observer_connection = Some(id);
    }

    /// Set the observer using the builder pattern.
    pub fn with_observer(mut self, observer: Arc<dyn RatingObserver>) -> Self {
        self.set_observer(observer);
        self
    }

    /// Remove the observer object, if any.
    ///
    /// Listener connections on [`rating_committed`](Self::rating_committed)
    /// are unaffected.
    pub fn clear_observer(&mut self) {
        if let Some(id) = self.observer_connection.take() {
            self.observer_signal.disconnect(id);
        }
    }

    /// Check whether an observer object is installed.
    pub fn has_observer(&self) -> bool {
        self.observer_connection.is_some()
    }

    /// Connect a listener closure using the builder pattern.
    pub fn with_listener<F>(self, listener: F) -> Self
    where
        F: Fn(&i32) + Send + Sync + 'static,
    {
        self.rating_committed.connect(listener);
        self
    }

    /// The lit state of each star, index 0 = leftmost.
    pub fn star_states(&self) -> [bool; STAR_COUNT] {
        let mut states = [false; STAR_COUNT];
        for (state, slot) in states.iter_mut().zip(&self.slots) {
            *state = slot.lit;
        }
        states
    }

    // =========================================================================
    // Assets
    // =========================================================================

    /// Resolve any still-missing star images from the global registry.
    fn resolve_assets(&mut self) {
        let mut resolved_any = false;
        if self.star_on.is_none() {
            self.star_on = self.resolve_asset(STAR_ON_ASSET);
            resolved_any |= self.star_on.is_some();
        }
        if self.star_off.is_none() {
            self.star_off = self.resolve_asset(STAR_OFF_ASSET);
            resolved_any |= self.star_off.is_some();
        }
        if resolved_any {
            self.base.update();
        }
    }

    fn resolve_asset(&self, name: &str) -> Option<Arc<IconImage>> {
        match AssetRegistry::global().resolve(name) {
            Ok(image) => Some(image),
            Err(err) => {
                tracing::warn!(
                    target: "star_rating::control",
                    name,
                    error = %err,
                    "star image unavailable, icon will be blank"
                );
                self.asset_missing.emit(name.to_string());
                None
            }
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Lay out the five star slots against the current geometry.
    ///
    /// Runs from the resize hook. The first pass builds the slot rects and
    /// marks the control initialized; later passes only refresh the on/off
    /// state.
    fn rebuild_layout(&mut self) {
        if self.initialized {
            self.refresh_display();
            return;
        }

        let size = self.base.size();
        let slot_width = size.width / STAR_COUNT as f32;
        let slot_height = size.height - 2.0 * VERTICAL_INSET;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.rect = Rect::new(i as f32 * slot_width, VERTICAL_INSET, slot_width, slot_height);
        }
        self.initialized = true;
        self.refresh_display();
        tracing::debug!(
            target: "star_rating::control",
            width = size.width,
            height = size.height,
            "star slots laid out"
        );
    }

    /// Refresh each slot's on/off state from the current rating.
    ///
    /// Slot `i` is lit iff `i + 1 <= rating`. Idempotent.
    fn refresh_display(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.lit = (i as i32) < self.rating;
        }
        self.base.update();
    }

    // =========================================================================
    // Gesture Handling
    // =========================================================================

    /// Map a widget-local position to a star count.
    ///
    /// Returns `None` for positions outside the widget's bounds. In-bounds
    /// positions yield 1..=5 by horizontal fifth, except the clear zone at
    /// the far left of the first star which yields 0.
    fn star_for_position(&self, position: Point) -> Option<i32> {
        if !self.base.contains_point(position) {
            return None;
        }

        let width = self.base.width();
        let slot_width = width / STAR_COUNT as f32;
        let mut star = (position.x / slot_width) as i32 + 1;
        if star == 1 && position.x < width / CLEAR_ZONE_DIVISOR {
            // Sliding back past the first star's left edge clears the rating.
            star = 0;
        }
        Some(star)
    }

    /// Update the rating from one touch sample.
    ///
    /// Returns `true` if the sample was inside the widget's bounds;
    /// out-of-bounds samples change nothing.
    fn handle_star_touch(&mut self, position: Point) -> bool {
        match self.star_for_position(position) {
            Some(star) => {
                self.rating = star;
                self.refresh_display();
                true
            }
            None => false,
        }
    }

    /// Fire the commit notification on both channels.
    ///
    /// The observer object runs first, synchronously on the UI thread, then
    /// listener closures connected to `rating_committed`.
    fn notify_committed(&self) {
        tracing::trace!(target: "star_rating::control", rating = self.rating, "rating committed");
        self.observer_signal.emit(self.rating);
        self.rating_committed.emit(self.rating);
    }
}

impl Default for StarRating {
    fn default() -> Self {
        Self::new()
    }
}

impl Object for StarRating {
    fn object_id(&self) -> ObjectId {
        self.base.object_id()
    }
}

impl Widget for StarRating {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint {
            preferred: Size::new(
                DEFAULT_ICON_EDGE * STAR_COUNT as f32,
                DEFAULT_ICON_EDGE + 2.0 * VERTICAL_INSET,
            ),
            minimum: Some(Size::new(
                MIN_ICON_EDGE * STAR_COUNT as f32,
                MIN_ICON_EDGE + 2.0 * VERTICAL_INSET,
            )),
            maximum: None,
        }
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        if !self.initialized {
            return;
        }
        for slot in &self.slots {
            let image = if slot.lit { &self.star_on } else { &self.star_off };
            if let Some(image) = image {
                ctx.draw_image_fitted(slot.rect, image);
            }
        }
    }

    fn event(&mut self, event: &mut WidgetEvent) -> bool {
        match event {
            WidgetEvent::Resize(_) => {
                self.rebuild_layout();
                event.accept();
                true
            }
            WidgetEvent::Touch(touch) => {
                // Multi-touch: sample the most recently reported point.
                let Some(point) = touch.latest().copied() else {
                    return false;
                };
                match point.phase {
                    TouchPhase::Started | TouchPhase::Moved => {
                        if self.handle_star_touch(point.position) {
                            self.tracking = true;
                            event.accept();
                            return true;
                        }
                        false
                    }
                    TouchPhase::Ended => {
                        self.handle_star_touch(point.position);
                        self.tracking = false;
                        self.notify_committed();
                        event.accept();
                        true
                    }
                    TouchPhase::Cancelled => {
                        // No recompute from the cancel position; repaint from
                        // the current rating and still commit.
                        self.refresh_display();
                        self.tracking = false;
                        self.notify_committed();
                        event.accept();
                        true
                    }
                }
            }
        }
    }
}

// Ensure StarRating is Send + Sync
static_assertions::assert_impl_all!(StarRating: Send, Sync);

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI32, Ordering};

    use parking_lot::Mutex;
    use star_rating_core::init_global_registry;

    use super::*;
    use crate::events::{ResizeEvent, TouchEvent, TouchPoint};
    use crate::painting::{DrawCommand, Frame};

    fn setup() {
        init_global_registry();
    }

    /// Assign geometry and deliver the resize hook, like a host would.
    fn lay_out(control: &mut StarRating, width: f32, height: f32) {
        let old = control.size();
        control.set_geometry(Rect::new(0.0, 0.0, width, height));
        let mut event = WidgetEvent::Resize(ResizeEvent::new(old, Size::new(width, height)));
        assert!(control.event(&mut event));
    }

    fn touch(x: f32, y: f32, phase: TouchPhase) -> WidgetEvent {
        WidgetEvent::Touch(TouchEvent::new(TouchPoint::new(
            1,
            Point::new(x, y),
            phase,
        )))
    }

    struct RecordingObserver {
        ratings: Mutex<Vec<i32>>,
    }

    impl RecordingObserver {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                ratings: Mutex::new(Vec::new()),
            })
        }
    }

    impl RatingObserver for RecordingObserver {
        fn rating_committed(&self, rating: i32) {
            self.ratings.lock().push(rating);
        }
    }

    #[test]
    fn test_creation() {
        setup();
        let control = StarRating::new();
        assert_eq!(control.rating(), 0);
        assert!(!control.initialized);
        assert!(!control.has_observer());

        let hint = control.size_hint();
        assert_eq!(hint.preferred, Size::new(120.0, 28.0));
        assert!(hint.preferred.width > hint.preferred.height);
    }

    #[test]
    fn test_builder_pattern() {
        setup();
        let observer = RecordingObserver::new();
        let control = StarRating::new()
            .with_rating(4)
            .with_observer(observer.clone());

        assert_eq!(control.rating(), 4);
        assert!(control.has_observer());
    }

    #[test]
    fn test_layout_builds_slots() {
        setup();
        let mut control = StarRating::new().with_rating(2);
        lay_out(&mut control, 100.0, 30.0);

        assert!(control.initialized);
        for (i, slot) in control.slots.iter().enumerate() {
            assert_eq!(slot.rect, Rect::new(i as f32 * 20.0, 2.0, 20.0, 26.0));
        }
        assert_eq!(control.star_states(), [true, true, false, false, false]);
    }

    #[test]
    fn test_layout_is_idempotent() {
        setup();
        let mut control = StarRating::new().with_rating(1);
        lay_out(&mut control, 100.0, 30.0);
        let first_rects: Vec<Rect> = control.slots.iter().map(|s| s.rect).collect();

        control.set_rating(5);
        lay_out(&mut control, 200.0, 60.0);

        // Second pass refreshes state but keeps the original slot rects
        let second_rects: Vec<Rect> = control.slots.iter().map(|s| s.rect).collect();
        assert_eq!(first_rects, second_rects);
        assert_eq!(control.star_states(), [true; 5]);
    }

    #[test]
    fn test_star_for_position() {
        setup();
        let mut control = StarRating::new();
        lay_out(&mut control, 100.0, 30.0);

        assert_eq!(control.star_for_position(Point::new(55.0, 15.0)), Some(3));
        assert_eq!(control.star_for_position(Point::new(5.0, 15.0)), Some(1));
        assert_eq!(control.star_for_position(Point::new(99.9, 15.0)), Some(5));

        // Clear zone: x below width/20 forces zero
        assert_eq!(control.star_for_position(Point::new(4.0, 15.0)), Some(0));
        assert_eq!(control.star_for_position(Point::new(0.0, 15.0)), Some(0));

        // Out of bounds in any direction
        assert_eq!(control.star_for_position(Point::new(-1.0, 15.0)), None);
        assert_eq!(control.star_for_position(Point::new(100.0, 15.0)), None);
        assert_eq!(control.star_for_position(Point::new(55.0, -1.0)), None);
        assert_eq!(control.star_for_position(Point::new(55.0, 30.0)), None);
    }

    #[test]
    fn test_touch_updates_rating_live() {
        setup();
        let mut control = StarRating::new();
        lay_out(&mut control, 100.0, 30.0);

        let mut event = touch(55.0, 15.0, TouchPhase::Started);
        assert!(control.event(&mut event));
        assert!(event.is_accepted());
        assert_eq!(control.rating(), 3);
        assert!(control.tracking);
        assert_eq!(control.star_states(), [true, true, true, false, false]);

        let mut event = touch(75.0, 15.0, TouchPhase::Moved);
        assert!(control.event(&mut event));
        assert_eq!(control.rating(), 4);
    }

    #[test]
    fn test_out_of_bounds_touch_is_ignored() {
        setup();
        let mut control = StarRating::new().with_rating(2);
        lay_out(&mut control, 100.0, 30.0);

        let mut event = touch(120.0, 15.0, TouchPhase::Started);
        assert!(!control.event(&mut event));
        assert!(!event.is_accepted());
        assert_eq!(control.rating(), 2);
        assert!(!control.tracking);
    }

    #[test]
    fn test_end_commits_from_end_position() {
        setup();
        let mut control = StarRating::new();
        lay_out(&mut control, 100.0, 30.0);

        let committed = Arc::new(AtomicI32::new(-1));
        let c = committed.clone();
        control.rating_committed.connect(move |&rating| {
            c.store(rating, Ordering::SeqCst);
        });

        control.event(&mut touch(55.0, 15.0, TouchPhase::Started));
        assert_eq!(committed.load(Ordering::SeqCst), -1);

        control.event(&mut touch(75.0, 15.0, TouchPhase::Ended));
        assert_eq!(control.rating(), 4);
        assert!(!control.tracking);
        assert_eq!(committed.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_end_out_of_bounds_still_commits() {
        setup();
        let mut control = StarRating::new();
        lay_out(&mut control, 100.0, 30.0);

        let commits = Arc::new(Mutex::new(Vec::new()));
        let c = commits.clone();
        control.rating_committed.connect(move |&rating| {
            c.lock().push(rating);
        });

        control.event(&mut touch(55.0, 15.0, TouchPhase::Moved));
        assert_eq!(control.rating(), 3);

        // Finger slid off the control before lifting
        control.event(&mut touch(150.0, 15.0, TouchPhase::Ended));
        assert_eq!(control.rating(), 3);
        assert_eq!(*commits.lock(), vec![3]);
    }

    #[test]
    fn test_cancel_commits_without_recompute() {
        setup();
        let mut control = StarRating::new();
        lay_out(&mut control, 100.0, 30.0);

        let commits = Arc::new(Mutex::new(Vec::new()));
        let c = commits.clone();
        control.rating_committed.connect(move |&rating| {
            c.lock().push(rating);
        });

        control.event(&mut touch(25.0, 15.0, TouchPhase::Started));
        assert_eq!(control.rating(), 2);

        // Cancel position would be star 5, but cancel never recomputes
        control.event(&mut touch(99.0, 15.0, TouchPhase::Cancelled));
        assert_eq!(control.rating(), 2);
        assert_eq!(control.star_states(), [true, true, false, false, false]);
        assert_eq!(*commits.lock(), vec![2]);
    }

    #[test]
    fn test_clear_zone_commit() {
        setup();
        let mut control = StarRating::new().with_rating(4);
        lay_out(&mut control, 100.0, 30.0);

        let committed = Arc::new(AtomicI32::new(-1));
        let c = committed.clone();
        control.rating_committed.connect(move |&rating| {
            c.store(rating, Ordering::SeqCst);
        });

        control.event(&mut touch(4.0, 15.0, TouchPhase::Ended));
        assert_eq!(control.rating(), 0);
        assert_eq!(control.star_states(), [false; 5]);
        assert_eq!(committed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_multi_touch_samples_last_point() {
        setup();
        let mut control = StarRating::new();
        lay_out(&mut control, 100.0, 30.0);

        let mut event = WidgetEvent::Touch(TouchEvent::with_points(vec![
            TouchPoint::new(1, Point::new(5.0, 15.0), TouchPhase::Moved),
            TouchPoint::new(2, Point::new(55.0, 15.0), TouchPhase::Moved),
        ]));
        assert!(control.event(&mut event));
        assert_eq!(control.rating(), 3);
    }

    #[test]
    fn test_empty_touch_event_is_unhandled() {
        setup();
        let mut control = StarRating::new();
        lay_out(&mut control, 100.0, 30.0);

        let mut event = WidgetEvent::Touch(TouchEvent::with_points(Vec::new()));
        assert!(!control.event(&mut event));
    }

    #[test]
    fn test_observer_runs_before_listeners() {
        setup();
        let mut control = StarRating::new();
        lay_out(&mut control, 100.0, 30.0);

        let order = Arc::new(Mutex::new(Vec::new()));

        struct OrderObserver {
            order: Arc<Mutex<Vec<&'static str>>>,
        }
        impl RatingObserver for OrderObserver {
            fn rating_committed(&self, _rating: i32) {
                self.order.lock().push("observer");
            }
        }

        control.set_observer(Arc::new(OrderObserver {
            order: order.clone(),
        }));
        let o = order.clone();
        control.rating_committed.connect(move |_| {
            o.lock().push("listener");
        });

        control.event(&mut touch(55.0, 15.0, TouchPhase::Ended));
        assert_eq!(*order.lock(), vec!["observer", "listener"]);
    }

    #[test]
    fn test_configure() {
        setup();
        let mut control = StarRating::new();
        lay_out(&mut control, 100.0, 30.0);

        let observer = RecordingObserver::new();
        let listened = Arc::new(AtomicI32::new(-1));
        let l = listened.clone();

        let resolved = control.configure(
            2,
            Some(observer.clone()),
            Some(Box::new(move |&rating: &i32| {
                l.store(rating, Ordering::SeqCst);
            })),
        );
        // Built-in star images always resolve
        assert!(resolved);
        assert_eq!(control.rating(), 2);
        assert_eq!(control.star_states(), [true, true, false, false, false]);

        control.event(&mut touch(75.0, 15.0, TouchPhase::Ended));
        assert_eq!(*observer.ratings.lock(), vec![4]);
        assert_eq!(listened.load(Ordering::SeqCst), 4);

        // None clears the observer but keeps the listener
        control.configure(1, None, None);
        assert!(!control.has_observer());
        control.event(&mut touch(35.0, 15.0, TouchPhase::Ended));
        assert_eq!(*observer.ratings.lock(), vec![4]);
        assert_eq!(listened.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_replacing_observer_disconnects_previous() {
        setup();
        let mut control = StarRating::new();
        lay_out(&mut control, 100.0, 30.0);

        let first = RecordingObserver::new();
        let second = RecordingObserver::new();
        control.set_observer(first.clone());
        control.set_observer(second.clone());

        control.event(&mut touch(55.0, 15.0, TouchPhase::Ended));
        assert!(first.ratings.lock().is_empty());
        assert_eq!(*second.ratings.lock(), vec![3]);
    }

    #[test]
    fn test_unclamped_programmatic_rating() {
        setup();
        let mut control = StarRating::new();
        lay_out(&mut control, 100.0, 30.0);

        control.set_rating(7);
        assert_eq!(control.rating(), 7);
        assert_eq!(control.star_states(), [true; 5]);

        control.set_rating(-3);
        assert_eq!(control.rating(), -3);
        assert_eq!(control.star_states(), [false; 5]);
    }

    #[test]
    fn test_rating_before_layout_renders_on_first_pass() {
        setup();
        let mut control = StarRating::new();
        control.set_rating(3);
        assert_eq!(control.star_states(), [false; 5]);

        lay_out(&mut control, 100.0, 30.0);
        assert_eq!(control.star_states(), [true, true, true, false, false]);
    }

    #[test]
    fn test_paint_draws_five_fitted_icons() {
        setup();
        let mut control = StarRating::new().with_rating(3);
        lay_out(&mut control, 100.0, 30.0);

        let mut frame = Frame::new();
        control.render(&mut frame);

        assert_eq!(frame.len(), 5);
        for (i, command) in frame.commands().iter().enumerate() {
            let DrawCommand::Image { rect, image } = command;
            let expected_name = if i < 3 { STAR_ON_ASSET } else { STAR_OFF_ASSET };
            assert_eq!(image.name(), expected_name);

            // Aspect-fit: square icons in 20x26 slots come out 20x20, centered
            let slot = Rect::new(i as f32 * 20.0, 2.0, 20.0, 26.0);
            assert_eq!(*rect, Rect::from_center(slot.center(), Size::new(20.0, 20.0)));
        }
        assert!(!control.needs_repaint());
    }

    #[test]
    fn test_paint_skips_unresolved_images() {
        setup();
        let mut control = StarRating::new().with_rating(2);
        lay_out(&mut control, 100.0, 30.0);
        control.star_on = None;

        let mut frame = Frame::new();
        control.render(&mut frame);

        // Two lit slots have no image; only the three unlit ones draw
        assert_eq!(frame.len(), 3);
    }

    #[test]
    fn test_paint_before_layout_is_blank() {
        setup();
        let mut control = StarRating::new().with_rating(5);

        let mut frame = Frame::new();
        control.render(&mut frame);
        assert!(frame.is_empty());
    }

    #[test]
    fn test_asset_missing_signal() {
        setup();
        let control = StarRating::new();

        let missing = Arc::new(Mutex::new(Vec::new()));
        let m = missing.clone();
        control.asset_missing.connect(move |name: &String| {
            m.lock().push(name.clone());
        });

        assert!(control.resolve_asset("not-a-real-icon.png").is_none());
        assert_eq!(*missing.lock(), vec!["not-a-real-icon.png".to_string()]);
    }
}
