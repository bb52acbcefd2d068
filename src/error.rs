/// Error types. Configuration problems are fatal at construction; step
/// index problems are rejected by `request_step` and `restore_state`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("step count must be at least 2, got {0}")]
    StepCount(usize),

    #[error("expected {expected} circle colors, got {found}")]
    CircleColorCount { expected: usize, found: usize },

    #[error("expected {expected} indicator colors, got {found}")]
    IndicatorColorCount { expected: usize, found: usize },

    #[error("expected {expected} labels, got {found}")]
    LabelCount { expected: usize, found: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("step {step} is out of range, valid steps are 0..{step_count}")]
pub struct InvalidStep {
    pub step: usize,
    pub step_count: usize,
}

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("malformed saved state: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidStep(#[from] InvalidStep),
}
