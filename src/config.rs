/// Widget configuration — everything the host's attribute/theme layer
/// resolves before constructing the indicator. Immutable once validated.

use crate::error::ConfigError;
use crate::theme::Color;

/// Expansion factor for the "pop" overshoot and the compact start inset.
pub const EXPAND_MARK: f32 = 1.3;

/// Default duration for the line phase, in milliseconds.
pub const DEFAULT_ANIM_DURATION_MS: u32 = 200;

/// Hard cap on the line phase duration, in milliseconds.
pub const MAX_LINE_DURATION_MS: u32 = 500;

#[derive(Clone, Debug)]
pub struct StepConfig {
    pub step_count: usize,
    pub circle_radius: f32,
    pub circle_stroke_width: f32,
    pub indicator_radius: f32,
    pub line_margin: f32,
    pub line_stroke_width: f32,
    pub anim_duration_ms: u32,

    /// Per-step circle outline colors; must have exactly `step_count`
    /// entries when present.
    pub circle_colors: Option<Vec<Color>>,
    /// Per-step indicator/check fill colors; same length rule.
    pub indicator_colors: Option<Vec<Color>>,

    pub show_step_numbers: bool,
    pub show_labels: bool,
    pub show_done_icon: bool,

    /// Labels under each step; must have exactly `step_count` entries
    /// when present.
    pub labels: Option<Vec<String>>,
    pub label_size: f32,
    pub label_margin_top: f32,
    pub number_text_size: f32,

    /// Extra space reserved below the circles (e.g. for a host-drawn
    /// bottom bar); extends the click areas downward.
    pub bottom_reserved_height: f32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            step_count: 2,
            circle_radius: 14.0,
            circle_stroke_width: 4.0,
            indicator_radius: 7.0,
            line_margin: 6.0,
            line_stroke_width: 4.0,
            anim_duration_ms: DEFAULT_ANIM_DURATION_MS,
            circle_colors: None,
            indicator_colors: None,
            show_step_numbers: false,
            show_labels: false,
            show_done_icon: true,
            labels: None,
            label_size: 13.0,
            label_margin_top: 8.0,
            number_text_size: 14.0,
            bottom_reserved_height: 0.0,
        }
    }
}

impl StepConfig {
    /// Radius of the fully-drawn check circle, sized to cover the outline.
    pub fn check_radius(&self) -> f32 {
        self.circle_radius + self.circle_stroke_width / 2.0
    }

    /// Line phase duration in milliseconds, capped at 500.
    pub fn line_duration_ms(&self) -> u32 {
        self.anim_duration_ms.min(MAX_LINE_DURATION_MS)
    }

    /// Vertical space reserved for the label row, zero when labels are off.
    pub fn label_reserved_height(&self) -> f32 {
        if self.show_labels {
            self.label_size + self.label_margin_top
        } else {
            0.0
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_count < 2 {
            return Err(ConfigError::StepCount(self.step_count));
        }
        if let Some(colors) = &self.circle_colors {
            if colors.len() != self.step_count {
                return Err(ConfigError::CircleColorCount {
                    expected: self.step_count,
                    found: colors.len(),
                });
            }
        }
        if let Some(colors) = &self.indicator_colors {
            if colors.len() != self.step_count {
                return Err(ConfigError::IndicatorColorCount {
                    expected: self.step_count,
                    found: colors.len(),
                });
            }
        }
        if let Some(labels) = &self.labels {
            if labels.len() != self.step_count {
                return Err(ConfigError::LabelCount {
                    expected: self.step_count,
                    found: labels.len(),
                });
            }
        }
        Ok(())
    }
}
