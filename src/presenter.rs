use std::time::Duration;

use crate::error::AppError;
use crate::session::{Phase, SessionState};

/// Named sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Error,
    Change,
    Upload,
}

impl Cue {
    pub fn name(&self) -> &str {
        match self {
            Self::Error => "error",
            Self::Change => "change",
            Self::Upload => "upload",
        }
    }
}

/// Snapshot of what the timer screen shows for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerView {
    pub task: String,
    pub phase: Phase,
    pub elapsed_secs: u64,
    pub duration_secs: u64,
    pub progress: f64,
    pub minutes_this_run: u64,
    pub task_total: Option<u64>,
}

impl TimerView {
    pub fn from_state(state: &SessionState, task_total: Option<u64>) -> Self {
        Self {
            task: state.task.clone(),
            phase: state.phase,
            elapsed_secs: state.elapsed_secs,
            duration_secs: state.phase_duration(),
            progress: state.progress_ratio(),
            minutes_this_run: state.minutes_this_run,
            task_total,
        }
    }
}

/// Everything the timer does that a user can see or hear.
///
/// `render`, `play` and `notify` must not fail the timer; implementations
/// log and swallow their own errors. `celebrate` blocks for `settle` and
/// only returns an error when the user interrupts.
pub trait Presenter {
    fn render(&mut self, view: &TimerView);
    fn play(&mut self, cue: Cue, repeat: u32);
    fn notify(&mut self, title: &str, body: &str);
    fn celebrate(&mut self, finished: Phase, settle: Duration) -> Result<(), AppError>;
}
