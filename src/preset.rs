use crate::error::AppError;

pub const CLASSIC_LABEL: &str = "25-minute work, 5-minute break";
pub const EXTENDED_LABEL: &str = "50-minute work, 10-minute break";

/// Choices offered by the preset prompt, in display order.
pub const PRESET_LABELS: [&str; 2] = [CLASSIC_LABEL, EXTENDED_LABEL];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub label: &'static str,
    pub work_secs: u64,
    pub break_secs: u64,
}

impl Preset {
    pub fn work_minutes(&self) -> u64 {
        self.work_secs / 60
    }
}

const PRESETS: [Preset; 2] = [
    Preset {
        label: CLASSIC_LABEL,
        work_secs: 25 * 60,
        break_secs: 5 * 60,
    },
    Preset {
        label: EXTENDED_LABEL,
        work_secs: 50 * 60,
        break_secs: 10 * 60,
    },
];

pub fn resolve(label: &str) -> Result<Preset, AppError> {
    PRESETS
        .iter()
        .find(|p| p.label == label)
        .copied()
        .ok_or_else(|| AppError::InvalidChoice {
            label: label.to_string(),
        })
}
