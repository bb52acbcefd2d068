/// Layout engine — positions the circles, the connector lines between
/// them, and the click areas, for a given viewport size.
///
/// Layout depends only on the configuration and the viewport; the current
/// step never changes geometry, only which cached piece gets which paint.

use tracing::warn;

use crate::config::{StepConfig, EXPAND_MARK};

/// Horizontal line segment at the step row's vertical center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Axis-aligned click area for one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl HitRect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// Circle center x-coordinates, one per step, left to right.
    pub indicators: Vec<f32>,
    /// Connector segments, one between each adjacent pair.
    pub lines: Vec<Segment>,
    /// Drawn length of each connector after margins and insets.
    pub line_length: f32,
    /// Click areas, one per step.
    pub hit_areas: Vec<HitRect>,
    /// Vertical center of the step row.
    pub center_y: f32,
}

impl Layout {
    /// Compute the full layout. `cfg` is assumed validated
    /// (`step_count >= 2`), so the divider below cannot divide by zero.
    pub fn compute(cfg: &StepConfig, width: f32, height: f32) -> Layout {
        let center_y =
            (height - cfg.bottom_reserved_height - cfg.label_reserved_height()) / 2.0;

        // Grid layout gives every step an equal cell so labels line up;
        // the compact layout hugs the first circle to the edge.
        let start_x = if cfg.show_labels {
            (width / cfg.step_count as f32) / 2.0
        } else {
            cfg.circle_radius * EXPAND_MARK + cfg.circle_stroke_width / 2.0
        };

        let divider = (width - start_x * 2.0) / (cfg.step_count - 1) as f32;
        let raw_length =
            divider - (cfg.circle_radius * 2.0 + cfg.circle_stroke_width) - cfg.line_margin * 2.0;
        let line_length = if raw_length < 0.0 {
            // A zero-sized viewport is normal before the first resize;
            // only a real width that cannot fit the row is worth noting.
            if width > 0.0 {
                warn!(
                    width,
                    step_count = cfg.step_count,
                    raw_length,
                    "viewport too narrow for step row, clamping line length to zero"
                );
            }
            0.0
        } else {
            raw_length
        };

        let indicators: Vec<f32> = (0..cfg.step_count)
            .map(|i| start_x + divider * i as f32)
            .collect();

        let lines: Vec<Segment> = indicators
            .windows(2)
            .map(|pair| {
                let x1 = (pair[0] + pair[1]) / 2.0 - line_length / 2.0;
                Segment {
                    x1,
                    y1: center_y,
                    x2: x1 + line_length,
                    y2: center_y,
                }
            })
            .collect();

        let hit_areas: Vec<HitRect> = indicators
            .iter()
            .map(|&x| HitRect {
                left: x - cfg.circle_radius * 2.0,
                top: center_y - cfg.circle_radius * 2.0,
                right: x + cfg.circle_radius * 2.0,
                bottom: center_y + cfg.circle_radius + cfg.bottom_reserved_height,
            })
            .collect();

        Layout {
            indicators,
            lines,
            line_length,
            hit_areas,
            center_y,
        }
    }

    /// Step index whose click area contains the point, if any.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<usize> {
        self.hit_areas.iter().position(|area| area.contains(x, y))
    }
}
