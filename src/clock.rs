use std::time::Duration;

use crate::presenter::{Presenter, TimerView};
use crate::session::{Phase, SessionState};

pub const DEFAULT_CADENCE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    PhaseComplete(Phase),
}

/// Advances a session one second per tick.
#[derive(Debug, Clone, Copy)]
pub struct PhaseClock {
    cadence: Duration,
}

impl PhaseClock {
    pub fn new(cadence: Duration) -> Self {
        Self { cadence }
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Renders the current progress, then counts one second.
    ///
    /// Completion is checked after the increment with a strict `>`, so a
    /// phase of `n` seconds completes on tick `n + 1`.
    pub fn advance(
        &self,
        state: &mut SessionState,
        task_total: Option<u64>,
        presenter: &mut dyn Presenter,
    ) -> TickOutcome {
        presenter.render(&TimerView::from_state(state, task_total));

        state.elapsed_secs += 1;

        if state.elapsed_secs > state.phase_duration() {
            TickOutcome::PhaseComplete(state.phase)
        } else {
            TickOutcome::Continue
        }
    }
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self::new(DEFAULT_CADENCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::Preset;
    use crate::presenter::recording::{RecordingPresenter, Shown};

    fn short(work: u64, brk: u64) -> SessionState {
        SessionState::new(
            "coding",
            Preset {
                label: "test",
                work_secs: work,
                break_secs: brk,
            },
        )
    }

    #[test]
    fn completes_on_tick_after_duration() {
        let clock = PhaseClock::default();
        let mut state = short(2, 1);
        let mut presenter = RecordingPresenter::default();

        assert_eq!(clock.advance(&mut state, None, &mut presenter), TickOutcome::Continue);
        assert_eq!(clock.advance(&mut state, None, &mut presenter), TickOutcome::Continue);
        assert_eq!(
            clock.advance(&mut state, None, &mut presenter),
            TickOutcome::PhaseComplete(Phase::Working)
        );
        assert_eq!(state.elapsed_secs, 3);
    }

    #[test]
    fn renders_before_incrementing() {
        let clock = PhaseClock::default();
        let mut state = short(2, 1);
        let mut presenter = RecordingPresenter::default();

        clock.advance(&mut state, None, &mut presenter);
        clock.advance(&mut state, None, &mut presenter);

        assert_eq!(
            presenter.shown,
            vec![
                Shown::Frame { phase: Phase::Working, elapsed: 0 },
                Shown::Frame { phase: Phase::Working, elapsed: 1 },
            ]
        );
    }

    #[test]
    fn fires_exactly_once_per_phase() {
        let clock = PhaseClock::default();
        let mut state = short(5, 2);
        let mut presenter = RecordingPresenter::default();

        let mut completions = Vec::new();
        for _ in 1..=6 {
            if clock.advance(&mut state, None, &mut presenter) != TickOutcome::Continue {
                completions.push(state.elapsed_secs);
            }
        }

        assert_eq!(completions, vec![6]);
    }

    #[test]
    fn elapsed_never_exceeds_duration_plus_one() {
        let clock = PhaseClock::default();
        let mut state = short(3, 1);
        let mut presenter = RecordingPresenter::default();

        while clock.advance(&mut state, None, &mut presenter) == TickOutcome::Continue {
            assert!(state.elapsed_secs <= state.phase_duration());
        }
        assert_eq!(state.elapsed_secs, state.phase_duration() + 1);
    }
}
