/// tiny-skia backend — software-rasterized implementation of the
/// `Renderer` seam, with fontdue for glyphs. The host hands in the font
/// bytes; the pixmap can be blitted to a framebuffer or saved as PNG.

use anyhow::{anyhow, Context, Result};
use fontdue::{Font, FontSettings};
use tiny_skia::{
    FillRule, LineCap, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform,
};

use crate::layout::Segment;
use crate::render::{DashPattern, Renderer, TextMetrics};
use crate::style::{LineStyle, StrokeStyle, TextStyle};
use crate::theme::Color;

pub struct PixmapRenderer {
    pixmap: Pixmap,
    font: Font,
}

impl PixmapRenderer {
    pub fn new(width: u32, height: u32, font_data: &[u8]) -> Result<PixmapRenderer> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("cannot create {}x{} pixmap", width, height))?;
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| anyhow!("load font: {e}"))?;
        Ok(PixmapRenderer { pixmap, font })
    }

    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Copy pixmap data into a raw RGBA buffer.
    pub fn copy_to(&self, dst: &mut [u8]) {
        let src = self.pixmap.data();
        let len = dst.len().min(src.len());
        dst[..len].copy_from_slice(&src[..len]);
    }

    pub fn save_png(&self, path: &std::path::Path) -> Result<()> {
        self.pixmap
            .save_png(path)
            .with_context(|| format!("write {}", path.display()))
    }

    fn fill_paint(color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        paint
    }
}

impl Renderer for PixmapRenderer {
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        if let Some(path) = PathBuilder::from_circle(x, y, radius) {
            self.pixmap.fill_path(
                &path,
                &Self::fill_paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32, style: StrokeStyle) {
        if radius <= 0.0 {
            return;
        }
        let mut stroke = Stroke::default();
        stroke.width = style.width;
        if let Some(path) = PathBuilder::from_circle(x, y, radius) {
            self.pixmap.stroke_path(
                &path,
                &Self::fill_paint(style.color),
                &stroke,
                Transform::identity(),
                None,
            );
        }
    }

    fn draw_line(&mut self, segment: Segment, style: LineStyle, dash: Option<DashPattern>) {
        let mut stroke = Stroke::default();
        stroke.width = style.width;
        stroke.line_cap = LineCap::Round;
        stroke.dash = dash
            .and_then(|d| StrokeDash::new(vec![d.interval, d.interval], d.phase));

        let mut pb = PathBuilder::new();
        pb.move_to(segment.x1, segment.y1);
        pb.line_to(segment.x2, segment.y2);
        if let Some(path) = pb.finish() {
            self.pixmap.stroke_path(
                &path,
                &Self::fill_paint(style.color),
                &stroke,
                Transform::identity(),
                None,
            );
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let pw = self.pixmap.width() as i32;
        let ph = self.pixmap.height() as i32;
        let mut cursor_x = x;

        for ch in text.chars() {
            let (metrics, bitmap) = self.font.rasterize(ch, style.size);
            if bitmap.is_empty() {
                cursor_x += metrics.advance_width;
                continue;
            }

            let gx = cursor_x as i32 + metrics.xmin;
            // Baseline-relative placement: ymin is the bbox bottom offset.
            let gy = y as i32 - (metrics.height as i32 + metrics.ymin);

            let pm = self.pixmap.data_mut();
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let alpha = bitmap[row * metrics.width + col];
                    if alpha == 0 {
                        continue;
                    }
                    let px = gx + col as i32;
                    let py = gy + row as i32;
                    if px < 0 || py < 0 || px >= pw || py >= ph {
                        continue;
                    }
                    let idx = (py as usize * pw as usize + px as usize) * 4;
                    if idx + 3 >= pm.len() {
                        continue;
                    }
                    let a = alpha as f32 / 255.0;
                    let inv = 1.0 - a;
                    pm[idx] = (pm[idx] as f32 * inv + style.color.r as f32 * a) as u8;
                    pm[idx + 1] = (pm[idx + 1] as f32 * inv + style.color.g as f32 * a) as u8;
                    pm[idx + 2] = (pm[idx + 2] as f32 * inv + style.color.b as f32 * a) as u8;
                    pm[idx + 3] = 255;
                }
            }

            cursor_x += metrics.advance_width;
        }
    }

    fn measure_text(&self, text: &str, size: f32) -> TextMetrics {
        let width = text
            .chars()
            .map(|ch| self.font.metrics(ch, size).advance_width)
            .sum();
        match self.font.horizontal_line_metrics(size) {
            Some(lm) => TextMetrics {
                width,
                ascent: lm.ascent,
                descent: -lm.descent,
            },
            // No horizontal metrics in the font; approximate from size.
            None => TextMetrics {
                width,
                ascent: size * 0.8,
                descent: size * 0.2,
            },
        }
    }
}
