//! stepcircle — a host-agnostic step/progress indicator core.
//!
//! A row of circles connected by lines: done steps render as filled check
//! circles, the current step carries an indicator dot, and single-step
//! transitions animate through a line wipe and two radius pops. The crate
//! is split into a pure layout engine, a staged transition animator, and
//! a `Renderer` seam with a tiny-skia reference backend; the host owns
//! the frame loop and feeds in resizes, taps, and elapsed time.

pub mod anim;
pub mod config;
pub mod error;
pub mod layout;
pub mod render;
pub mod skia;
pub mod style;
pub mod theme;
pub mod widget;

pub use config::StepConfig;
pub use error::{ConfigError, InvalidStep, RestoreError};
pub use layout::{HitRect, Layout, Segment};
pub use render::{DashPattern, Renderer, TextMetrics};
pub use skia::PixmapRenderer;
pub use style::{LineStyle, StrokeStyle, StyleSet, TextStyle};
pub use theme::Color;
pub use widget::{StepIndicator, StepTransition, TransitionState};
