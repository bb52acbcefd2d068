/// Resolved drawing styles. Everything is resolved once at construction
/// into cheap-to-copy value types; nothing is re-derived per frame.

use tracing::debug;

use crate::config::StepConfig;
use crate::theme::{self, Color};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f32,
}

/// Per-step styles keyed by step index, with the default-then-random
/// fallback chain of the paint resolver.
#[derive(Clone, Debug)]
pub struct StyleSet {
    step_count: usize,

    circle: StrokeStyle,
    step_circles: Option<Vec<StrokeStyle>>,

    indicator: Color,
    step_indicators: Option<Vec<Color>>,

    number: TextStyle,
    step_numbers: Option<Vec<TextStyle>>,

    pub line_pending: LineStyle,
    pub line_done: LineStyle,
    pub label: TextStyle,
}

impl StyleSet {
    /// Build the style table from a validated configuration.
    pub fn resolve(cfg: &StepConfig) -> StyleSet {
        let circle = StrokeStyle {
            color: theme::CIRCLE,
            width: cfg.circle_stroke_width,
        };
        let number = TextStyle {
            color: theme::NUMBER_TEXT,
            size: cfg.number_text_size,
        };

        let step_circles = cfg.circle_colors.as_ref().map(|colors| {
            colors
                .iter()
                .map(|&color| StrokeStyle { color, ..circle })
                .collect()
        });

        let step_indicators = cfg.indicator_colors.clone();

        // When numbers are shown, each step's number takes its indicator
        // color so the counter reads as part of the step.
        let step_numbers = if cfg.show_step_numbers {
            cfg.indicator_colors.as_ref().map(|colors| {
                colors
                    .iter()
                    .map(|&color| TextStyle { color, ..number })
                    .collect()
            })
        } else {
            None
        };

        StyleSet {
            step_count: cfg.step_count,
            circle,
            step_circles,
            indicator: theme::INDICATOR,
            step_indicators,
            number,
            step_numbers,
            line_pending: LineStyle {
                color: theme::LINE_PENDING,
                width: cfg.line_stroke_width,
            },
            line_done: LineStyle {
                color: theme::LINE_DONE,
                width: cfg.line_stroke_width,
            },
            label: TextStyle {
                color: theme::LABEL_TEXT,
                size: cfg.label_size,
            },
        }
    }

    pub fn circle(&self, step: usize) -> StrokeStyle {
        resolve_step(
            step,
            self.step_count,
            self.step_circles.as_deref(),
            self.circle,
            || StrokeStyle {
                color: Color::random(),
                ..self.circle
            },
            "circle",
        )
    }

    pub fn indicator(&self, step: usize) -> Color {
        resolve_step(
            step,
            self.step_count,
            self.step_indicators.as_deref(),
            self.indicator,
            Color::random,
            "indicator",
        )
    }

    pub fn number(&self, step: usize) -> TextStyle {
        resolve_step(
            step,
            self.step_count,
            self.step_numbers.as_deref(),
            self.number,
            || TextStyle {
                color: Color::random(),
                ..self.number
            },
            "number",
        )
    }
}

/// Resolver chain: per-step entry, then the default, then a random paint
/// for indices outside the configured range. Each hop logs a diagnostic
/// instead of propagating.
fn resolve_step<T: Copy>(
    step: usize,
    step_count: usize,
    per_step: Option<&[T]>,
    default: T,
    random: impl FnOnce() -> T,
    kind: &str,
) -> T {
    if let Some(list) = per_step {
        if let Some(value) = list.get(step) {
            return *value;
        }
        debug!(step, kind, "no per-step style entry, falling back to default");
    }
    if step < step_count {
        return default;
    }
    debug!(step, step_count, kind, "step index out of range, using random paint");
    random()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_step_colors_win_over_defaults() {
        let cfg = StepConfig {
            step_count: 3,
            indicator_colors: Some(vec![
                Color::rgb(1, 0, 0),
                Color::rgb(0, 1, 0),
                Color::rgb(0, 0, 1),
            ]),
            ..StepConfig::default()
        };
        let styles = StyleSet::resolve(&cfg);
        assert_eq!(styles.indicator(1), Color::rgb(0, 1, 0));
        assert_eq!(styles.circle(1).color, theme::CIRCLE);
    }

    #[test]
    fn valid_step_without_overrides_gets_default() {
        let styles = StyleSet::resolve(&StepConfig::default());
        assert_eq!(styles.indicator(0), theme::INDICATOR);
        assert_eq!(styles.indicator(1), theme::INDICATOR);
    }

    #[test]
    fn out_of_range_step_degrades_instead_of_failing() {
        let styles = StyleSet::resolve(&StepConfig::default());
        // Never panics; some opaque color comes back.
        assert_eq!(styles.indicator(99).a, 255);
        assert_eq!(styles.circle(99).width, StepConfig::default().circle_stroke_width);
    }

    #[test]
    fn number_styles_follow_indicator_colors_when_shown() {
        let cfg = StepConfig {
            step_count: 2,
            show_step_numbers: true,
            indicator_colors: Some(vec![Color::rgb(9, 9, 9), Color::rgb(8, 8, 8)]),
            ..StepConfig::default()
        };
        let styles = StyleSet::resolve(&cfg);
        assert_eq!(styles.number(0).color, Color::rgb(9, 9, 9));
        assert_eq!(styles.number(0).size, cfg.number_text_size);
    }
}
