//! Frame building and paint context for widgets.
//!
//! Rendering is host-agnostic: painting a widget produces a [`Frame`], an
//! ordered list of [`DrawCommand`]s in widget-local coordinates. The host
//! translates commands into its own drawing API (GPU quads, CoreGraphics
//! calls, a software blitter).
//!
//! # Paint Flow
//!
//! 1. The host notices `needs_repaint()` on a widget
//! 2. It creates a [`Frame`] and a [`PaintContext`] over it
//! 3. It calls `Widget::paint(&mut ctx)`
//! 4. The widget pushes draw commands; the host replays them
//!
//! ```ignore
//! use star_rating::{Frame, PaintContext, Widget};
//!
//! let mut frame = Frame::new();
//! let mut ctx = PaintContext::new(&mut frame, control.rect());
//! control.paint(&mut ctx);
//!
//! for command in frame.commands() {
//!     // Replay into the host renderer
//! }
//! ```

use std::sync::Arc;

use crate::assets::IconImage;
use crate::geometry::{Rect, Size};

/// A single drawing operation, in widget-local coordinates.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Draw a decoded image into the given rectangle.
    ///
    /// The rectangle is already aspect-corrected; hosts should scale the
    /// image to fill it exactly.
    Image {
        /// Destination rectangle in widget-local coordinates.
        rect: Rect,
        /// The image to draw.
        image: Arc<IconImage>,
    },
}

/// An ordered list of draw commands produced by one paint pass.
#[derive(Debug, Default)]
pub struct Frame {
    commands: Vec<DrawCommand>,
}

impl Frame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands recorded so far, in paint order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the frame has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Discard all recorded commands so the frame can be reused.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

/// Context provided during widget painting.
///
/// This wraps the frame being built and provides the widget's geometry for
/// convenient access during the paint operation. Passed to `Widget::paint`.
pub struct PaintContext<'a> {
    /// The frame to record into.
    frame: &'a mut Frame,
    /// The widget's local rectangle (origin always 0,0).
    widget_rect: Rect,
}

impl<'a> PaintContext<'a> {
    /// Create a new paint context.
    pub fn new(frame: &'a mut Frame, widget_rect: Rect) -> Self {
        Self { frame, widget_rect }
    }

    /// Get the widget's local rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.widget_rect
    }

    /// Get the widget's width.
    #[inline]
    pub fn width(&self) -> f32 {
        self.widget_rect.width()
    }

    /// Get the widget's height.
    #[inline]
    pub fn height(&self) -> f32 {
        self.widget_rect.height()
    }

    /// Get the widget's size.
    #[inline]
    pub fn size(&self) -> Size {
        self.widget_rect.size
    }

    /// Record an image draw into the given rectangle.
    ///
    /// Commands entirely outside the widget's bounds are dropped.
    pub fn draw_image(&mut self, rect: Rect, image: &Arc<IconImage>) {
        if rect.is_empty() || rect.intersect(&self.widget_rect).is_none() {
            return;
        }
        self.frame.push(DrawCommand::Image {
            rect,
            image: Arc::clone(image),
        });
    }

    /// Record an image draw fitted into a container rectangle.
    ///
    /// The image keeps its aspect ratio and is centered in the container,
    /// scaled to the largest size that fits.
    pub fn draw_image_fitted(&mut self, container: Rect, image: &Arc<IconImage>) {
        let fitted = fit_rect(container, image.size());
        self.draw_image(fitted, image);
    }
}

/// Compute the largest rectangle with `content`'s aspect ratio that fits
/// centered inside `container`.
pub fn fit_rect(container: Rect, content: Size) -> Rect {
    if content.is_empty() {
        return Rect::from_center(container.center(), Size::ZERO);
    }

    let scale = (container.width() / content.width).min(container.height() / content.height);
    let scaled = Size::new(content.width * scale, content.height * scale);
    Rect::from_center(container.center(), scaled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(width: u32, height: u32) -> Arc<IconImage> {
        let pixels = vec![255u8; (width * height * 4) as usize];
        Arc::new(IconImage::from_rgba8("test", width, height, pixels).unwrap())
    }

    #[test]
    fn test_fit_rect_wide_container() {
        // Square content in a wide container: height-limited, centered
        let container = Rect::new(0.0, 0.0, 100.0, 20.0);
        let fitted = fit_rect(container, Size::new(10.0, 10.0));
        assert_eq!(fitted, Rect::new(40.0, 0.0, 20.0, 20.0));
    }

    #[test]
    fn test_fit_rect_tall_container() {
        let container = Rect::new(10.0, 10.0, 20.0, 100.0);
        let fitted = fit_rect(container, Size::new(4.0, 4.0));
        assert_eq!(fitted, Rect::new(10.0, 50.0, 20.0, 20.0));
    }

    #[test]
    fn test_fit_rect_exact() {
        let container = Rect::new(0.0, 2.0, 16.0, 16.0);
        let fitted = fit_rect(container, Size::new(32.0, 32.0));
        assert_eq!(fitted, container);
    }

    #[test]
    fn test_fit_rect_empty_content() {
        let container = Rect::new(0.0, 0.0, 50.0, 50.0);
        let fitted = fit_rect(container, Size::ZERO);
        assert!(fitted.is_empty());
        assert_eq!(fitted.center(), container.center());
    }

    #[test]
    fn test_draw_image_records_command() {
        let image = solid_image(4, 4);
        let mut frame = Frame::new();
        let mut ctx = PaintContext::new(&mut frame, Rect::new(0.0, 0.0, 100.0, 30.0));

        ctx.draw_image(Rect::new(2.0, 2.0, 16.0, 16.0), &image);

        assert_eq!(frame.len(), 1);
        let DrawCommand::Image { rect, .. } = &frame.commands()[0];
        assert_eq!(*rect, Rect::new(2.0, 2.0, 16.0, 16.0));
    }

    #[test]
    fn test_draw_image_outside_bounds_dropped() {
        let image = solid_image(4, 4);
        let mut frame = Frame::new();
        let mut ctx = PaintContext::new(&mut frame, Rect::new(0.0, 0.0, 100.0, 30.0));

        ctx.draw_image(Rect::new(200.0, 0.0, 16.0, 16.0), &image);

        assert!(frame.is_empty());
    }

    #[test]
    fn test_draw_image_fitted_keeps_aspect() {
        let image = solid_image(8, 8);
        let mut frame = Frame::new();
        let mut ctx = PaintContext::new(&mut frame, Rect::new(0.0, 0.0, 100.0, 30.0));

        ctx.draw_image_fitted(Rect::new(0.0, 2.0, 20.0, 26.0), &image);

        assert_eq!(frame.len(), 1);
        let DrawCommand::Image { rect, .. } = &frame.commands()[0];
        assert_eq!(rect.width(), rect.height());
        assert!(rect.width() <= 20.0);
    }

    #[test]
    fn test_frame_clear() {
        let image = solid_image(2, 2);
        let mut frame = Frame::new();
        {
            let mut ctx = PaintContext::new(&mut frame, Rect::new(0.0, 0.0, 50.0, 50.0));
            ctx.draw_image(Rect::new(0.0, 0.0, 10.0, 10.0), &image);
        }
        assert_eq!(frame.len(), 1);

        frame.clear();
        assert!(frame.is_empty());
    }
}
