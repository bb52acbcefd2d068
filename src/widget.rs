/// Step indicator core — transition state machine plus the decision-table
/// draw pass.
///
/// The host owns the frame loop: it calls `request_step` (and redraws once
/// immediately after it returns, whatever the classification), feeds
/// elapsed milliseconds into `tick` every frame, redraws whenever `tick`
/// returns true, and forwards pointer taps to `handle_tap`. All calls
/// happen on one thread; a new `request_step` cancels any in-flight
/// transition outright, last request wins.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::anim::{Channel, Composite, Track};
use crate::config::{StepConfig, EXPAND_MARK};
use crate::error::{ConfigError, InvalidStep, RestoreError};
use crate::layout::Layout;
use crate::render::{DashPattern, Renderer};
use crate::style::StyleSet;

/// How a requested step relates to the one before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepTransition {
    /// No animation: same step, or a multi-step jump (snap to the new
    /// static state).
    Idle,
    /// Moved up by exactly one step.
    AdvancingOneStep,
    /// Moved down by exactly one step.
    RetreatingOneStep,
}

/// The animatable slice of widget state. One live instance per widget,
/// mutated only by `request_step`, `tick`, and `restore_state`.
#[derive(Clone, Copy, Debug)]
pub struct TransitionState {
    pub current_step: usize,
    pub previous_step: usize,
    /// Drives the dash phase of the in-transit line, 0..1.
    pub anim_progress: f32,
    pub anim_indicator_radius: f32,
    pub anim_check_radius: f32,
}

#[derive(Serialize, Deserialize)]
struct SavedState {
    current_step: usize,
}

pub type StepClickListener = Box<dyn Fn(usize)>;

pub struct StepIndicator {
    config: StepConfig,
    styles: StyleSet,
    layout: Layout,
    state: TransitionState,
    composite: Option<Composite>,
    dash: Option<DashPattern>,
    width: f32,
    height: f32,
    listeners: Vec<StepClickListener>,
}

impl StepIndicator {
    /// Validates the configuration and resolves all styles up front;
    /// a bad color/label list fails here, never at first draw.
    pub fn new(config: StepConfig) -> Result<StepIndicator, ConfigError> {
        config.validate()?;
        let styles = StyleSet::resolve(&config);
        let layout = Layout::compute(&config, 0.0, 0.0);
        let state = TransitionState {
            current_step: 0,
            previous_step: 0,
            anim_progress: 0.0,
            anim_indicator_radius: config.indicator_radius,
            anim_check_radius: config.check_radius(),
        };
        Ok(StepIndicator {
            config,
            styles,
            layout,
            state,
            composite: None,
            dash: None,
            width: 0.0,
            height: 0.0,
            listeners: Vec::new(),
        })
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn step_count(&self) -> usize {
        self.config.step_count
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn is_animating(&self) -> bool {
        self.composite.is_some()
    }

    /// Viewport changed; geometry is recomputed, the transition state is
    /// left alone.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.layout = Layout::compute(&self.config, width, height);
    }

    /// Change the number of steps. Resets the current step to 0 and
    /// recomputes layout. Fails if the new count breaks validation
    /// (too few steps, or per-step lists no longer line up).
    pub fn set_step_count(&mut self, step_count: usize) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        config.step_count = step_count;
        config.validate()?;
        self.config = config;
        self.styles = StyleSet::resolve(&self.config);
        self.composite = None;
        self.state.current_step = 0;
        self.state.previous_step = 0;
        self.layout = Layout::compute(&self.config, self.width, self.height);
        Ok(())
    }

    /// Move to `step`. Rejects out-of-range input instead of clamping.
    /// Any in-flight transition is cancelled on the spot, leaving the
    /// animated values wherever they were. The host redraws once right
    /// after this returns, so an `Idle` snap is never silently skipped.
    pub fn request_step(&mut self, step: usize) -> Result<StepTransition, InvalidStep> {
        if step >= self.config.step_count {
            return Err(InvalidStep {
                step,
                step_count: self.config.step_count,
            });
        }

        self.composite = None;
        self.state.previous_step = self.state.current_step;
        self.state.current_step = step;

        let transition = if step == self.state.previous_step + 1 {
            StepTransition::AdvancingOneStep
        } else if step + 1 == self.state.previous_step {
            StepTransition::RetreatingOneStep
        } else {
            StepTransition::Idle
        };
        trace!(
            from = self.state.previous_step,
            to = step,
            ?transition,
            "step requested"
        );

        let line_duration = self.config.line_duration_ms();
        let pop_duration = line_duration / 2;
        let indicator_radius = self.config.indicator_radius;
        let check_radius = self.config.check_radius();

        match transition {
            StepTransition::AdvancingOneStep => {
                // Line wipes closed while the check pops in; the new
                // step's indicator pops only after both are done.
                self.state.anim_indicator_radius = 0.0;
                self.composite = Some(Composite::new(vec![
                    vec![
                        Track::new(Channel::LineProgress, vec![1.0, 0.0], line_duration),
                        Track::new(
                            Channel::CheckRadius,
                            vec![indicator_radius, check_radius * EXPAND_MARK, check_radius],
                            pop_duration,
                        ),
                    ],
                    vec![Track::new(
                        Channel::IndicatorRadius,
                        vec![0.0, indicator_radius * 1.4, indicator_radius],
                        pop_duration,
                    )],
                ]));
            }
            StepTransition::RetreatingOneStep => {
                // Indicator pops out, the line wipes open, then the check
                // shrinks back to an indicator. Dash overlay starts clean.
                self.state.anim_progress = 1.0;
                self.state.anim_check_radius = check_radius;
                self.dash = None;
                self.composite = Some(Composite::new(vec![
                    vec![Track::new(
                        Channel::IndicatorRadius,
                        vec![indicator_radius, 0.0],
                        pop_duration,
                    )],
                    vec![Track::new(Channel::LineProgress, vec![0.0, 1.0], line_duration)],
                    vec![Track::new(
                        Channel::CheckRadius,
                        vec![check_radius, indicator_radius],
                        pop_duration,
                    )],
                ]));
            }
            StepTransition::Idle => {}
        }

        Ok(transition)
    }

    /// Advance the running transition by `dt_ms`. Returns true when the
    /// tick was consumed and the host must redraw — exactly once per tick
    /// while a composite is live.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        let Some(composite) = self.composite.as_mut() else {
            return false;
        };

        let updates = composite.tick(dt_ms);
        let finished = !composite.is_running();

        for (channel, value) in updates {
            match channel {
                Channel::LineProgress => {
                    self.state.anim_progress = value;
                    self.dash = Some(DashPattern {
                        interval: self.layout.line_length,
                        phase: (value * self.layout.line_length).max(0.0),
                    });
                }
                Channel::IndicatorRadius => self.state.anim_indicator_radius = value,
                Channel::CheckRadius => self.state.anim_check_radius = value,
            }
        }

        if finished {
            self.composite = None;
        }
        true
    }

    /// Map a tapped point to a step. On a hit, every registered click
    /// listener is notified, then the step is applied exactly as
    /// `request_step` would apply it.
    pub fn handle_tap(&mut self, x: f32, y: f32) -> Option<usize> {
        let step = self.layout.hit_test(x, y)?;
        for listener in &self.listeners {
            listener(step);
        }
        // A hit index is always within range.
        let _ = self.request_step(step);
        Some(step)
    }

    pub fn add_step_click_listener(&mut self, listener: impl Fn(usize) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn clear_step_click_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Serialize the slice of state that survives a host teardown:
    /// only the current step.
    pub fn save_state(&self) -> Vec<u8> {
        let saved = SavedState {
            current_step: self.state.current_step,
        };
        serde_json::to_vec(&saved).unwrap_or_default()
    }

    /// Restore a previously saved state. Triggers a full relayout and no
    /// transition animation.
    pub fn restore_state(&mut self, bytes: &[u8]) -> Result<(), RestoreError> {
        let saved: SavedState = serde_json::from_slice(bytes)?;
        if saved.current_step >= self.config.step_count {
            return Err(InvalidStep {
                step: saved.current_step,
                step_count: self.config.step_count,
            }
            .into());
        }
        self.composite = None;
        self.dash = None;
        self.state.current_step = saved.current_step;
        self.state.previous_step = saved.current_step;
        self.state.anim_progress = 0.0;
        self.state.anim_indicator_radius = self.config.indicator_radius;
        self.state.anim_check_radius = self.config.check_radius();
        self.layout = Layout::compute(&self.config, self.width, self.height);
        Ok(())
    }

    /// Draw the whole widget from cached geometry and the latest animated
    /// values.
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let cy = self.layout.center_y;
        let r = self.config.circle_radius;
        let current = self.state.current_step;
        let previous = self.state.previous_step;

        let in_animation = self.composite.is_some();
        let in_line = self
            .composite
            .as_ref()
            .is_some_and(|c| c.channel_running(Channel::LineProgress));
        let in_indicator = self
            .composite
            .as_ref()
            .is_some_and(|c| c.channel_running(Channel::IndicatorRadius));

        let advancing = previous + 1 == current;
        let retreating = previous == current + 1;

        for i in 0..self.config.step_count {
            let x = self.layout.indicators[i];

            renderer.stroke_circle(x, cy, r, self.styles.circle(i));
            self.draw_step_number(renderer, i, x, cy);

            // Current step's indicator dot; while retreating it still sits
            // on the step being left until the pop-out finishes.
            if (i == current && !retreating) || (i == previous && retreating && in_animation) {
                renderer.fill_circle(x, cy, self.state.anim_indicator_radius, self.styles.indicator(i));
            }

            // Done check circle; mid-transition steps use the animated
            // radius.
            let draw_check = i < current || (retreating && i == current);
            if draw_check && self.config.show_done_icon {
                let radius = if (i == previous && advancing) || (i == current && retreating) {
                    self.state.anim_check_radius
                } else {
                    self.config.check_radius()
                };
                renderer.fill_circle(x, cy, radius, self.styles.indicator(i));
            }

            if i < self.layout.lines.len() {
                let segment = self.layout.lines[i];
                if i >= current {
                    renderer.draw_line(segment, self.styles.line_pending, None);
                    if i == current && retreating && (in_line || in_indicator) {
                        // Coming back from i + 1: wipe the done overlay open.
                        renderer.draw_line(segment, self.styles.line_done, self.dash);
                    }
                } else if i + 1 == current && advancing && in_line {
                    // Going to i + 1: wipe the done overlay closed.
                    renderer.draw_line(segment, self.styles.line_pending, None);
                    renderer.draw_line(segment, self.styles.line_done, self.dash);
                } else {
                    renderer.draw_line(segment, self.styles.line_done, None);
                }
            }

            if self.config.show_labels {
                self.draw_label(renderer, i, x, cy);
            }
        }
    }

    /// Numeric counter centered in the circle's bounding box, vertically
    /// balanced with the font's ascent/descent.
    fn draw_step_number(&self, renderer: &mut dyn Renderer, step: usize, x: f32, cy: f32) {
        let r = self.config.circle_radius;
        let label = (step + 1).to_string();
        let style = self.styles.number(step);
        let metrics = renderer.measure_text(&label, style.size);

        let tx = (x - r) + (2.0 * r - metrics.width) / 2.0;
        let baseline = (cy - r) + (2.0 * r - metrics.height()) / 2.0 + metrics.ascent;
        renderer.draw_text(&label, tx, baseline, style);
    }

    fn draw_label(&self, renderer: &mut dyn Renderer, step: usize, x: f32, cy: f32) {
        let Some(labels) = self.config.labels.as_ref() else {
            return;
        };
        let Some(text) = labels.get(step) else {
            return;
        };
        let style = self.styles.label;
        let metrics = renderer.measure_text(text, style.size);
        let baseline = cy
            + self.config.circle_radius * EXPAND_MARK
            + self.config.label_margin_top
            + metrics.ascent;
        renderer.draw_text(text, x - metrics.width / 2.0, baseline, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn widget(step_count: usize) -> StepIndicator {
        let mut w = StepIndicator::new(StepConfig {
            step_count,
            ..StepConfig::default()
        })
        .unwrap();
        w.on_resize(800.0, 160.0);
        w
    }

    /// Run the current transition to completion in fixed-size ticks,
    /// returning how many ticks were consumed.
    fn run_to_idle(w: &mut StepIndicator, dt_ms: f32) -> usize {
        let mut ticks = 0;
        while w.tick(dt_ms) {
            ticks += 1;
            assert!(ticks < 10_000, "transition never finished");
        }
        ticks
    }

    #[test]
    fn construction_rejects_bad_config() {
        let err = StepIndicator::new(StepConfig {
            step_count: 0,
            ..StepConfig::default()
        });
        assert!(err.is_err());
    }

    #[test]
    fn classification_matches_delta() {
        let mut w = widget(4);
        assert_eq!(w.request_step(1), Ok(StepTransition::AdvancingOneStep));
        run_to_idle(&mut w, 16.0);
        assert_eq!(w.request_step(0), Ok(StepTransition::RetreatingOneStep));
        run_to_idle(&mut w, 16.0);
        assert_eq!(w.request_step(0), Ok(StepTransition::Idle));
        assert_eq!(w.request_step(3), Ok(StepTransition::Idle));
        assert_eq!(w.current_step(), 3);
        assert!(!w.is_animating());
    }

    #[test]
    fn out_of_range_step_is_rejected_not_clamped() {
        let mut w = widget(3);
        assert_eq!(
            w.request_step(3),
            Err(InvalidStep {
                step: 3,
                step_count: 3
            })
        );
        // The rejected request left nothing behind.
        assert_eq!(w.current_step(), 0);
        assert!(!w.is_animating());
    }

    #[test]
    fn idle_transition_schedules_nothing_but_tick_still_false() {
        let mut w = widget(4);
        w.request_step(2).unwrap();
        assert!(!w.is_animating());
        assert!(!w.tick(16.0));
    }

    #[test]
    fn advance_settles_at_final_radii() {
        let mut w = widget(3);
        w.request_step(1).unwrap();
        assert!(w.is_animating());
        // Indicator is zeroed immediately while its pop waits its turn.
        assert_eq!(w.state().anim_indicator_radius, 0.0);

        run_to_idle(&mut w, 16.0);
        let cfg = w.config();
        assert_eq!(w.state().anim_indicator_radius, cfg.indicator_radius);
        assert_eq!(w.state().anim_check_radius, cfg.check_radius());
        assert_eq!(w.state().anim_progress, 0.0);
    }

    #[test]
    fn retreat_runs_channels_strictly_in_sequence() {
        let mut w = widget(3);
        w.request_step(1).unwrap();
        run_to_idle(&mut w, 16.0);
        w.request_step(0).unwrap();

        // Stage 1: only the indicator moves; line progress stays preset.
        w.tick(10.0);
        assert!(w.state().anim_indicator_radius < w.config().indicator_radius);
        assert_eq!(w.state().anim_progress, 1.0);

        run_to_idle(&mut w, 16.0);
        assert_eq!(w.state().anim_check_radius, w.config().indicator_radius);
        assert_eq!(w.state().anim_progress, 1.0);
    }

    #[test]
    fn duration_law_line_then_half_pops() {
        // 200 ms line phase: advance stage 0 takes 200 ms (line) with the
        // 100 ms check inside it, stage 1 another 100 ms.
        let mut w = widget(3);
        w.request_step(1).unwrap();

        // After 199 ms the line is still running.
        w.tick(199.0);
        assert!(w.state().anim_progress > 0.0);
        assert!(w.is_animating());
        // One more ms finishes stage 0; the pop stage takes 100 ms more.
        w.tick(1.0);
        assert!(w.is_animating());
        assert!(w.tick(100.0));
        assert!(!w.is_animating());
    }

    #[test]
    fn capped_duration_applies_to_long_configs() {
        let mut w = StepIndicator::new(StepConfig {
            step_count: 3,
            anim_duration_ms: 5000,
            ..StepConfig::default()
        })
        .unwrap();
        w.on_resize(800.0, 160.0);
        w.request_step(1).unwrap();
        // 500 ms line + 250 ms indicator pop, with slack for tick rounding.
        w.tick(500.0);
        w.tick(250.0);
        w.tick(1.0);
        assert!(!w.is_animating());
    }

    #[test]
    fn new_request_cancels_in_flight_run_without_settling() {
        let mut w = widget(4);
        w.request_step(1).unwrap();
        w.tick(30.0);
        let mid_check = w.state().anim_check_radius;
        assert_ne!(mid_check, w.config().check_radius());

        // Jump request: cancel-and-replace, values stay where they were.
        w.request_step(3).unwrap();
        assert!(!w.is_animating());
        assert_eq!(w.state().anim_check_radius, mid_check);
        assert_eq!(w.current_step(), 3);
    }

    #[test]
    fn dash_phase_follows_line_progress() {
        let mut w = widget(3);
        w.request_step(1).unwrap();
        w.tick(50.0);
        let dash = w.dash.expect("line tick must set the dash pattern");
        assert_eq!(dash.interval, w.layout().line_length);
        let expected = (w.state().anim_progress * w.layout().line_length).max(0.0);
        assert!((dash.phase - expected).abs() < 1e-4);
    }

    #[test]
    fn tap_notifies_then_applies_idle_jump() {
        let mut w = widget(4);
        let clicked: Rc<Cell<Option<usize>>> = Rc::new(Cell::new(None));
        let seen = clicked.clone();
        w.add_step_click_listener(move |step| seen.set(Some(step)));

        let x = w.layout().indicators[2];
        let y = w.layout().center_y;
        assert_eq!(w.handle_tap(x, y), Some(2));
        assert_eq!(clicked.get(), Some(2));
        assert_eq!(w.current_step(), 2);
        assert!(!w.is_animating()); // delta 2 takes the Idle path
    }

    #[test]
    fn tap_outside_all_areas_does_nothing() {
        let mut w = widget(3);
        let hits = Rc::new(Cell::new(0));
        let seen = hits.clone();
        w.add_step_click_listener(move |_| seen.set(seen.get() + 1));
        assert_eq!(w.handle_tap(-10.0, -10.0), None);
        assert_eq!(hits.get(), 0);
        assert_eq!(w.current_step(), 0);
    }

    #[test]
    fn save_restore_round_trip_without_animation() {
        let mut w = widget(4);
        w.request_step(1).unwrap();
        run_to_idle(&mut w, 16.0);
        w.request_step(2).unwrap();
        let bytes = w.save_state();

        let mut fresh = widget(4);
        fresh.restore_state(&bytes).unwrap();
        assert_eq!(fresh.current_step(), 2);
        assert_eq!(fresh.state().previous_step, 2);
        assert!(!fresh.is_animating());
    }

    #[test]
    fn restore_rejects_out_of_range_step() {
        let mut w = widget(2);
        let bytes = br#"{"current_step": 7}"#;
        assert!(w.restore_state(bytes).is_err());
        assert_eq!(w.current_step(), 0);
    }

    #[test]
    fn set_step_count_resets_and_relayouts() {
        let mut w = widget(3);
        w.request_step(1).unwrap();
        run_to_idle(&mut w, 16.0);
        w.set_step_count(5).unwrap();
        assert_eq!(w.current_step(), 0);
        assert_eq!(w.layout().indicators.len(), 5);
        assert!(w.set_step_count(1).is_err());
    }

    #[test]
    fn round_trip_leaves_layout_unchanged() {
        let mut w = widget(3);
        let before = w.layout().clone();
        for step in [1, 2, 1, 0] {
            w.request_step(step).unwrap();
            run_to_idle(&mut w, 16.0);
        }
        assert_eq!(w.layout(), &before);
        assert_eq!(w.current_step(), 0);
        assert_eq!(w.state().previous_step, 1);
    }
}
