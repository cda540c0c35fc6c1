//! Widget event types.
//!
//! This module defines the events the rating control handles: resize
//! notifications from the host and touch input. Each event carries an
//! [`EventBase`] tracking whether it has been accepted, so hosts can decide
//! whether to propagate an event further.
//!
//! Touch positions are in widget-local coordinates. Hosts that collect
//! input in window or parent coordinates should map points through
//! `WidgetBase::map_from_parent` before dispatching.

use crate::geometry::{Point, Size};

/// Common data for all widget events.
#[derive(Debug, Clone, Copy)]
pub struct EventBase {
    /// Whether the event has been accepted (handled).
    accepted: bool,
}

impl Default for EventBase {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBase {
    /// Create a new event base.
    pub fn new() -> Self {
        Self { accepted: false }
    }

    /// Check if the event has been accepted.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Accept the event, preventing further propagation.
    pub fn accept(&mut self) {
        self.accepted = true;
    }

    /// Ignore the event, allowing further propagation.
    pub fn ignore(&mut self) {
        self.accepted = false;
    }
}

/// Resize event, sent when a widget's size changes.
///
/// The host sends this after it has assigned the widget its final bounds,
/// so handlers can lay out internal geometry against `new_size`.
#[derive(Debug, Clone, Copy)]
pub struct ResizeEvent {
    /// Base event data.
    pub base: EventBase,
    /// The old size of the widget.
    pub old_size: Size,
    /// The new size of the widget.
    pub new_size: Size,
}

impl ResizeEvent {
    /// Create a new resize event.
    pub fn new(old_size: Size, new_size: Size) -> Self {
        Self {
            base: EventBase::new(),
            old_size,
            new_size,
        }
    }
}

/// The lifecycle phase of a touch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// The touch has just made contact.
    Started,
    /// The touch moved while in contact.
    Moved,
    /// The touch lifted normally.
    Ended,
    /// The system interrupted the touch (incoming call, gesture takeover).
    Cancelled,
}

/// A single touch point within a touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Platform-assigned identifier, stable for the lifetime of the touch.
    pub id: u64,
    /// Position in widget-local coordinates.
    pub position: Point,
    /// The phase of this touch point.
    pub phase: TouchPhase,
}

impl TouchPoint {
    /// Create a new touch point.
    pub fn new(id: u64, position: Point, phase: TouchPhase) -> Self {
        Self {
            id,
            position,
            phase,
        }
    }
}

/// Touch event carrying one or more simultaneous touch points.
#[derive(Debug, Clone)]
pub struct TouchEvent {
    /// Base event data.
    pub base: EventBase,
    /// The touch points in this event, in the order the platform reported
    /// them.
    pub points: Vec<TouchPoint>,
}

impl TouchEvent {
    /// Create a touch event with a single touch point.
    pub fn new(point: TouchPoint) -> Self {
        Self {
            base: EventBase::new(),
            points: vec![point],
        }
    }

    /// Create a touch event with multiple touch points.
    pub fn with_points(points: Vec<TouchPoint>) -> Self {
        Self {
            base: EventBase::new(),
            points,
        }
    }

    /// The most recently reported touch point.
    ///
    /// Single-finger interactions only ever have one point; for multi-touch
    /// the control samples this one and ignores the rest.
    pub fn latest(&self) -> Option<&TouchPoint> {
        self.points.last()
    }

    /// The phase of the most recently reported touch point.
    pub fn phase(&self) -> Option<TouchPhase> {
        self.latest().map(|p| p.phase)
    }
}

/// Events dispatched to widgets.
#[derive(Debug, Clone)]
pub enum WidgetEvent {
    /// Resize event.
    Resize(ResizeEvent),
    /// Touch event.
    Touch(TouchEvent),
}

impl WidgetEvent {
    /// Check if the event has been accepted.
    pub fn is_accepted(&self) -> bool {
        match self {
            Self::Resize(e) => e.base.is_accepted(),
            Self::Touch(e) => e.base.is_accepted(),
        }
    }

    /// Accept the event.
    pub fn accept(&mut self) {
        match self {
            Self::Resize(e) => e.base.accept(),
            Self::Touch(e) => e.base.accept(),
        }
    }

    /// Ignore the event.
    pub fn ignore(&mut self) {
        match self {
            Self::Resize(e) => e.base.ignore(),
            Self::Touch(e) => e.base.ignore(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accept_ignore() {
        let mut event = WidgetEvent::Resize(ResizeEvent::new(
            Size::ZERO,
            Size::new(100.0, 30.0),
        ));
        assert!(!event.is_accepted());

        event.accept();
        assert!(event.is_accepted());

        event.ignore();
        assert!(!event.is_accepted());
    }

    #[test]
    fn test_touch_event_latest() {
        let event = TouchEvent::with_points(vec![
            TouchPoint::new(1, Point::new(5.0, 5.0), TouchPhase::Moved),
            TouchPoint::new(2, Point::new(80.0, 10.0), TouchPhase::Moved),
        ]);

        let latest = event.latest().unwrap();
        assert_eq!(latest.id, 2);
        assert_eq!(latest.position, Point::new(80.0, 10.0));
        assert_eq!(event.phase(), Some(TouchPhase::Moved));
    }

    #[test]
    fn test_touch_event_empty_points() {
        let event = TouchEvent::with_points(Vec::new());
        assert!(event.latest().is_none());
        assert!(event.phase().is_none());
    }
}
