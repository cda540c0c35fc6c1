//! Widget base implementation and the core widget trait.
//!
//! This module provides [`WidgetBase`], the common implementation details
//! for widgets (geometry, visibility, enabled state, object system
//! integration), and the [`Widget`] trait that hosts program against.

use star_rating_core::{Object, ObjectBase, ObjectId, Signal};

use crate::events::WidgetEvent;
use crate::geometry::{Point, Rect, Size, SizeHint};
use crate::painting::{Frame, PaintContext};

/// The base implementation for widgets.
///
/// This struct provides common functionality that widgets need:
/// - Object system integration (ID, name, registry membership)
/// - Geometry management (position, size)
/// - Visibility and enabled state
/// - Repaint tracking
/// - Coordinate mapping
///
/// Widget implementations include this as a field and delegate common
/// operations to it.
///
/// # Example
///
/// ```ignore
/// use star_rating::{SizeHint, Widget, WidgetBase};
///
/// struct Badge {
///     base: WidgetBase,
///     count: u32,
/// }
///
/// impl Widget for Badge {
///     fn widget_base(&self) -> &WidgetBase { &self.base }
///     fn widget_base_mut(&mut self) -> &mut WidgetBase { &mut self.base }
///
///     fn size_hint(&self) -> SizeHint {
///         SizeHint::from_dimensions(24.0, 24.0)
///     }
///
///     // ... other methods
/// }
/// ```
pub struct WidgetBase {
    /// The underlying object base for Object trait implementation.
    object_base: ObjectBase,

    /// The widget's geometry (position relative to parent and size).
    geometry: Rect,

    /// Whether the widget is visible.
    visible: bool,

    /// Whether the widget is enabled (can receive input).
    enabled: bool,

    /// Whether the widget needs to be repainted.
    needs_repaint: bool,

    /// Signal emitted when the geometry changes.
    pub geometry_changed: Signal<Rect>,

    /// Signal emitted when visibility changes.
    pub visible_changed: Signal<bool>,

    /// Signal emitted when enabled state changes.
    pub enabled_changed: Signal<bool>,
}

impl WidgetBase {
    /// Create a new widget base.
    ///
    /// # Panics
    ///
    /// Panics if the global object registry is not initialized.
    pub fn new<T: Object + 'static>() -> Self {
        Self {
            object_base: ObjectBase::new::<T>(),
            geometry: Rect::ZERO,
            visible: true,
            enabled: true,
            needs_repaint: true,
            geometry_changed: Signal::new(),
            visible_changed: Signal::new(),
            enabled_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Object System Delegation
    // =========================================================================

    /// Get the widget's unique object ID.
    #[inline]
    pub fn object_id(&self) -> ObjectId {
        self.object_base.id()
    }

    /// Get the widget's name.
    pub fn name(&self) -> String {
        self.object_base.name()
    }

    /// Set the widget's name.
    pub fn set_name(&self, name: &str) {
        self.object_base.set_name(name);
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Get the widget's geometry (position and size).
    #[inline]
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Set the widget's geometry.
    ///
    /// This will emit `geometry_changed` if the geometry actually changed.
    pub fn set_geometry(&mut self, rect: Rect) {
        if self.geometry != rect {
            self.geometry = rect;
            self.needs_repaint = true;
            self.geometry_changed.emit(rect);
        }
    }

    /// Get the widget's position relative to its parent.
    #[inline]
    pub fn pos(&self) -> Point {
        self.geometry.origin
    }

    /// Set the widget's position relative to its parent.
    pub fn set_pos(&mut self, pos: Point) {
        if self.geometry.origin != pos {
            let new_geometry = Rect {
                origin: pos,
                size: self.geometry.size,
            };
            self.geometry = new_geometry;
            self.geometry_changed.emit(new_geometry);
        }
    }

    /// Move the widget to the specified position.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.set_pos(Point::new(x, y));
    }

    /// Get the widget's size.
    #[inline]
    pub fn size(&self) -> Size {
        self.geometry.size
    }

    /// Set the widget's size.
    pub fn set_size(&mut self, size: Size) {
        if self.geometry.size != size {
            let new_geometry = Rect {
                origin: self.geometry.origin,
                size,
            };
            self.geometry = new_geometry;
            self.needs_repaint = true;
            self.geometry_changed.emit(new_geometry);
        }
    }

    /// Resize the widget.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.set_size(Size::new(width, height));
    }

    /// Get the widget's width.
    #[inline]
    pub fn width(&self) -> f32 {
        self.geometry.size.width
    }

    /// Get the widget's height.
    #[inline]
    pub fn height(&self) -> f32 {
        self.geometry.size.height
    }

    /// Get a rectangle representing the widget's local coordinate space.
    ///
    /// This is always positioned at (0, 0) with the widget's size.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.geometry.size.width, self.geometry.size.height)
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Check if the widget is visible.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set whether the widget is visible.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.needs_repaint = true;
            self.visible_changed.emit(visible);
        }
    }

    /// Show the widget.
    pub fn show(&mut self) {
        self.set_visible(true);
    }

    /// Hide the widget.
    pub fn hide(&mut self) {
        self.set_visible(false);
    }

    // =========================================================================
    // Enabled State
    // =========================================================================

    /// Check if the widget is enabled.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set whether the widget is enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.needs_repaint = true;
            self.enabled_changed.emit(enabled);
        }
    }

    /// Enable the widget.
    pub fn enable(&mut self) {
        self.set_enabled(true);
    }

    /// Disable the widget.
    pub fn disable(&mut self) {
        self.set_enabled(false);
    }

    // =========================================================================
    // Repaint
    // =========================================================================

    /// Check if the widget needs to be repainted.
    #[inline]
    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    /// Request a repaint of the widget.
    pub fn update(&mut self) {
        self.needs_repaint = true;
    }

    /// Clear the repaint flag (called after painting).
    pub fn mark_painted(&mut self) {
        self.needs_repaint = false;
    }

    // =========================================================================
    // Coordinate Mapping
    // =========================================================================

    /// Map a point from widget-local coordinates to parent coordinates.
    #[inline]
    pub fn map_to_parent(&self, point: Point) -> Point {
        Point::new(
            point.x + self.geometry.origin.x,
            point.y + self.geometry.origin.y,
        )
    }

    /// Map a point from parent coordinates to widget-local coordinates.
    #[inline]
    pub fn map_from_parent(&self, point: Point) -> Point {
        Point::new(
            point.x - self.geometry.origin.x,
            point.y - self.geometry.origin.y,
        )
    }

    /// Check if a point (in local coordinates) is inside the widget.
    #[inline]
    pub fn contains_point(&self, point: Point) -> bool {
        self.rect().contains(point)
    }
}

impl Object for WidgetBase {
    fn object_id(&self) -> ObjectId {
        self.object_base.id()
    }
}

// WidgetBase doesn't implement Drop because ObjectBase handles cleanup.

/// The core trait for widgets.
///
/// `Widget` extends [`Object`] to provide the interface hosts drive:
/// geometry assignment, event delivery, and painting into a [`Frame`].
///
/// # Required Methods
///
/// Implementors must provide:
/// - [`widget_base()`](Self::widget_base) / [`widget_base_mut()`](Self::widget_base_mut):
///   Access to the underlying [`WidgetBase`]
/// - [`size_hint()`](Self::size_hint): The widget's preferred size (see [`SizeHint`])
/// - [`paint()`](Self::paint): How to render the widget (see [`PaintContext`])
///
/// # Default Implementations
///
/// Most other methods have default implementations that delegate to
/// [`WidgetBase`]: geometry accessors and mutators, visibility and enabled
/// state, repaint tracking, and coordinate mapping. Event handling returns
/// `false` (not handled) by default.
///
/// # Implementing Object
///
/// Widgets must also implement the [`Object`] trait. The simplest way is to
/// delegate to the [`WidgetBase`]:
///
/// ```ignore
/// impl Object for MyWidget {
///     fn object_id(&self) -> ObjectId {
///         self.base.object_id()
///     }
/// }
/// ```
pub trait Widget: Object + Send + Sync {
    // =========================================================================
    // Required Methods
    // =========================================================================

    /// Get a reference to the widget's base.
    fn widget_base(&self) -> &WidgetBase;

    /// Get a mutable reference to the widget's base.
    fn widget_base_mut(&mut self) -> &mut WidgetBase;

    /// Get the widget's size hint for layout purposes.
    ///
    /// This tells the host what size the widget prefers. The actual size
    /// assigned may differ.
    fn size_hint(&self) -> SizeHint;

    /// Paint the widget.
    ///
    /// This is called when the widget needs to be rendered. The paint context
    /// provides access to the frame being built and the widget's geometry.
    ///
    /// # Coordinate System
    ///
    /// Drawing happens in widget-local coordinates: (0, 0) is the top-left
    /// corner of the widget. Use `ctx.rect()` to get the full bounds.
    fn paint(&self, ctx: &mut PaintContext<'_>);

    // =========================================================================
    // Geometry (default implementations delegate to WidgetBase)
    // =========================================================================

    /// Get the widget's geometry (position and size).
    fn geometry(&self) -> Rect {
        self.widget_base().geometry()
    }

    /// Set the widget's geometry.
    fn set_geometry(&mut self, rect: Rect) {
        self.widget_base_mut().set_geometry(rect);
    }

    /// Get the widget's position relative to its parent.
    fn pos(&self) -> Point {
        self.widget_base().pos()
    }

    /// Set the widget's position relative to its parent.
    fn set_pos(&mut self, pos: Point) {
        self.widget_base_mut().set_pos(pos);
    }

    /// Get the widget's size.
    fn size(&self) -> Size {
        self.widget_base().size()
    }

    /// Set the widget's size.
    fn set_size(&mut self, size: Size) {
        self.widget_base_mut().set_size(size);
    }

    /// Get the widget's local rectangle (origin at 0,0).
    fn rect(&self) -> Rect {
        self.widget_base().rect()
    }

    /// Get the widget's width.
    fn width(&self) -> f32 {
        self.widget_base().width()
    }

    /// Get the widget's height.
    fn height(&self) -> f32 {
        self.widget_base().height()
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Check if the widget is visible.
    fn is_visible(&self) -> bool {
        self.widget_base().is_visible()
    }

    /// Set whether the widget is visible.
    fn set_visible(&mut self, visible: bool) {
        self.widget_base_mut().set_visible(visible);
    }

    /// Show the widget.
    fn show(&mut self) {
        self.widget_base_mut().show();
    }

    /// Hide the widget.
    fn hide(&mut self) {
        self.widget_base_mut().hide();
    }

    // =========================================================================
    // Enabled State
    // =========================================================================

    /// Check if the widget is enabled.
    fn is_enabled(&self) -> bool {
        self.widget_base().is_enabled()
    }

    /// Set whether the widget is enabled.
    fn set_enabled(&mut self, enabled: bool) {
        self.widget_base_mut().set_enabled(enabled);
    }

    // =========================================================================
    // Event Handling
    // =========================================================================

    /// Handle a widget event.
    ///
    /// This is the main event dispatch method. The default implementation
    /// returns `false` to indicate the event was not handled. Override this
    /// to handle events specific to your widget.
    ///
    /// Return `true` if the event was handled and should not propagate further.
    fn event(&mut self, _event: &mut WidgetEvent) -> bool {
        false
    }

    // =========================================================================
    // Coordinate Mapping
    // =========================================================================

    /// Map a point from widget-local coordinates to parent coordinates.
    fn map_to_parent(&self, point: Point) -> Point {
        self.widget_base().map_to_parent(point)
    }

    /// Map a point from parent coordinates to widget-local coordinates.
    fn map_from_parent(&self, point: Point) -> Point {
        self.widget_base().map_from_parent(point)
    }

    /// Check if a point (in local coordinates) is inside the widget.
    fn contains_point(&self, point: Point) -> bool {
        self.widget_base().contains_point(point)
    }

    // =========================================================================
    // Update / Repaint
    // =========================================================================

    /// Request a repaint of the widget.
    ///
    /// Multiple calls before the next paint are coalesced.
    fn update(&mut self) {
        self.widget_base_mut().update();
    }

    /// Check if the widget needs to be repainted.
    fn needs_repaint(&self) -> bool {
        self.widget_base().needs_repaint()
    }

    /// Paint the widget into a frame and clear the repaint flag.
    ///
    /// Hosts call this each time they rebuild the scene. The frame receives
    /// draw commands in widget-local coordinates.
    fn render(&mut self, frame: &mut Frame) {
        let rect = self.rect();
        let mut ctx = PaintContext::new(frame, rect);
        self.paint(&mut ctx);
        self.widget_base_mut().mark_painted();
    }
}

/// Extension trait for converting to `&dyn Widget`.
pub trait AsWidget {
    /// Get a reference to self as a widget.
    fn as_widget(&self) -> &dyn Widget;
    /// Get a mutable reference to self as a widget.
    fn as_widget_mut(&mut self) -> &mut dyn Widget;
}

impl<W: Widget> AsWidget for W {
    fn as_widget(&self) -> &dyn Widget {
        self
    }

    fn as_widget_mut(&mut self) -> &mut dyn Widget {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use parking_lot::Mutex;
    use star_rating_core::init_global_registry;

    use super::*;

    struct ProbeWidget {
        base: WidgetBase,
        paints: AtomicU32,
    }

    impl ProbeWidget {
        fn new() -> Self {
            Self {
                base: WidgetBase::new::<Self>(),
                paints: AtomicU32::new(0),
            }
        }
    }

    impl Object for ProbeWidget {
        fn object_id(&self) -> ObjectId {
            self.base.object_id()
        }
    }

    impl Widget for ProbeWidget {
        fn widget_base(&self) -> &WidgetBase {
            &self.base
        }

        fn widget_base_mut(&mut self) -> &mut WidgetBase {
            &mut self.base
        }

        fn size_hint(&self) -> SizeHint {
            SizeHint::from_dimensions(80.0, 20.0)
        }

        fn paint(&self, _ctx: &mut PaintContext<'_>) {
            self.paints.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn setup() {
        init_global_registry();
    }

    #[test]
    fn test_geometry_change_emits_signal() {
        setup();
        let mut base = WidgetBase::new::<ProbeWidget>();

        let received = Arc::new(Mutex::new(Vec::new()));
        let r = Arc::clone(&received);
        base.geometry_changed.connect(move |&rect| {
            r.lock().push(rect);
        });

        let rect = Rect::new(10.0, 10.0, 100.0, 30.0);
        base.set_geometry(rect);
        base.set_geometry(rect);

        let got = received.lock();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0], rect);
    }

    #[test]
    fn test_resize_emits_geometry_changed() {
        setup();
        let mut base = WidgetBase::new::<ProbeWidget>();
        base.set_geometry(Rect::new(5.0, 5.0, 50.0, 20.0));

        let received = Arc::new(Mutex::new(Vec::new()));
        let r = Arc::clone(&received);
        base.geometry_changed.connect(move |&rect| {
            r.lock().push(rect);
        });

        base.resize(80.0, 20.0);

        let got = received.lock();
        assert_eq!(got.len(), 1);
        // Resizing keeps the origin
        assert_eq!(got[0], Rect::new(5.0, 5.0, 80.0, 20.0));
    }

    #[test]
    fn test_visibility_and_enabled() {
        setup();
        let mut base = WidgetBase::new::<ProbeWidget>();
        assert!(base.is_visible());
        assert!(base.is_enabled());

        let toggles = Arc::new(AtomicU32::new(0));
        let t = Arc::clone(&toggles);
        base.visible_changed.connect(move |_| {
            t.fetch_add(1, Ordering::SeqCst);
        });

        base.hide();
        base.hide();
        base.show();
        assert_eq!(toggles.load(Ordering::SeqCst), 2);

        base.disable();
        assert!(!base.is_enabled());
        base.enable();
        assert!(base.is_enabled());
    }

    #[test]
    fn test_coordinate_mapping() {
        setup();
        let mut base = WidgetBase::new::<ProbeWidget>();
        base.set_geometry(Rect::new(20.0, 40.0, 100.0, 30.0));

        let local = base.map_from_parent(Point::new(25.0, 45.0));
        assert_eq!(local, Point::new(5.0, 5.0));
        assert_eq!(base.map_to_parent(local), Point::new(25.0, 45.0));

        assert!(base.contains_point(Point::new(0.0, 0.0)));
        assert!(base.contains_point(Point::new(99.0, 29.0)));
        assert!(!base.contains_point(Point::new(100.0, 15.0)));
    }

    #[test]
    fn test_repaint_flag() {
        setup();
        let mut base = WidgetBase::new::<ProbeWidget>();
        assert!(base.needs_repaint());

        base.mark_painted();
        assert!(!base.needs_repaint());

        base.update();
        assert!(base.needs_repaint());

        base.mark_painted();
        base.resize(60.0, 18.0);
        assert!(base.needs_repaint());
    }

    #[test]
    fn test_render_paints_and_clears_flag() {
        setup();
        let mut widget = ProbeWidget::new();
        widget.set_geometry(Rect::new(0.0, 0.0, 80.0, 20.0));

        let mut frame = Frame::new();
        widget.render(&mut frame);

        assert_eq!(widget.paints.load(Ordering::SeqCst), 1);
        assert!(!widget.needs_repaint());
    }

    #[test]
    fn test_dyn_widget_dispatch() {
        setup();
        let mut widget = ProbeWidget::new();
        widget.base.set_name("probe");

        let as_dyn: &mut dyn Widget = widget.as_widget_mut();
        as_dyn.set_geometry(Rect::new(0.0, 0.0, 40.0, 10.0));
        assert_eq!(as_dyn.size(), Size::new(40.0, 10.0));
        assert_eq!(as_dyn.size_hint().preferred, Size::new(80.0, 20.0));

        let mut event = WidgetEvent::Touch(crate::events::TouchEvent::new(
            crate::events::TouchPoint::new(
                1,
                Point::new(5.0, 5.0),
                crate::events::TouchPhase::Started,
            ),
        ));
        // Default event handler reports unhandled
        assert!(!as_dyn.event(&mut event));
    }
}
