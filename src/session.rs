use crate::preset::Preset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Working,
    OnBreak,
}

impl Phase {
    pub fn name(&self) -> &str {
        match self {
            Self::Working => "working",
            Self::OnBreak => "on break",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Working => Self::OnBreak,
            Self::OnBreak => Self::Working,
        }
    }
}

/// Trims and lowercases a task name so it can be used as a store key.
pub fn normalize_task(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub task: String,
    pub preset: Preset,
    pub phase: Phase,
    pub elapsed_secs: u64,
    pub minutes_this_run: u64,
}

impl SessionState {
    pub fn new(task: &str, preset: Preset) -> Self {
        Self {
            task: normalize_task(task),
            preset,
            phase: Phase::Working,
            elapsed_secs: 0,
            minutes_this_run: 0,
        }
    }

    pub fn phase_duration(&self) -> u64 {
        match self.phase {
            Phase::Working => self.preset.work_secs,
            Phase::OnBreak => self.preset.break_secs,
        }
    }

    pub fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.elapsed_secs = 0;
    }

    // elapsed may run one tick past the duration before completion is noticed
    pub fn progress_ratio(&self) -> f64 {
        let total = self.phase_duration();
        if total == 0 {
            return 1.0;
        }
        (self.elapsed_secs as f64 / total as f64).clamp(0.0, 1.0)
    }
}
