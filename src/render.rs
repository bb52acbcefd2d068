/// Renderer seam. The widget core is told where to draw; a backend (the
/// tiny-skia pixmap painter, or a host's own surface) implements this
/// trait and owns the actual pixels.

use crate::layout::Segment;
use crate::style::{LineStyle, StrokeStyle, TextStyle};
use crate::theme::Color;

/// Dashed-stroke pattern for the line-wipe overlay: equal on/off
/// intervals whose phase offset animates the wipe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DashPattern {
    pub interval: f32,
    pub phase: f32,
}

/// Horizontal text measurements. `ascent` and `descent` are positive
/// distances above/below the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl TextMetrics {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// Drawing surface contract consumed by `StepIndicator::draw`.
pub trait Renderer {
    /// Filled circle.
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color);

    /// Circle outline.
    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32, style: StrokeStyle);

    /// Connector segment; `dash` carries the wipe overlay pattern.
    fn draw_line(&mut self, segment: Segment, style: LineStyle, dash: Option<DashPattern>);

    /// Single line of text with its baseline at `y`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);

    /// Measure a single line of text at the given size.
    fn measure_text(&self, text: &str, size: f32) -> TextMetrics;
}
