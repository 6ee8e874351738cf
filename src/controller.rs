use std::time::Duration;

use crate::clock::{PhaseClock, TickOutcome};
use crate::error::{AppError, StoreError};
use crate::history::{check_key, HistoryAdapter, TaskTotals};
use crate::presenter::{Cue, Presenter};
use crate::session::{Phase, SessionState};

pub const APP_TITLE: &str = "CLI Pomodoro";
pub const WORK_DONE_MESSAGE: &str = "Great work! Let's have a break!";
pub const BREAK_DONE_MESSAGE: &str = "Time to get back to work!";

const DEFAULT_SETTLE: Duration = Duration::from_secs(5);
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Where completed work gets written, and what was there when the run
/// started.
pub struct Ledger {
    history: HistoryAdapter,
    username: String,
    prior_total: u64,
}

impl Ledger {
    pub fn new(history: HistoryAdapter, username: &str, prior_total: u64) -> Self {
        Self {
            history,
            username: username.to_string(),
            prior_total,
        }
    }
}

/// Loads `username`'s totals and builds the ledger for `task`.
///
/// A store failure is fatal unless `tolerate_offline` is set, in which case
/// the run goes unsaved (`Ok(None)`): writing `0 + minutes` over a total
/// that was never read could lower it. Invalid names are always fatal.
pub fn load_ledger(
    history: Result<HistoryAdapter, StoreError>,
    username: &str,
    task: &str,
    tolerate_offline: bool,
) -> Result<Option<(Ledger, TaskTotals)>, AppError> {
    check_key(username)?;
    check_key(task)?;

    let loaded = history.and_then(|history| {
        let totals = history.load(username)?;
        Ok((history, totals))
    });

    match loaded {
        Ok((history, totals)) => {
            tracing::info!(user = username, tasks = totals.len(), "history loaded");
            let prior = totals.get(task).copied().unwrap_or(0);
            Ok(Some((Ledger::new(history, username, prior), totals)))
        }
        Err(e) if tolerate_offline => {
            tracing::warn!(user = username, "history unavailable, running unsaved: {}", e);
            Ok(None)
        }
        Err(e) => {
            tracing::error!(user = username, "history unavailable: {}", e);
            Err(e.into())
        }
    }
}

/// Runs work and break phases back to back, forever.
pub struct SessionController {
    state: SessionState,
    clock: PhaseClock,
    ledger: Option<Ledger>,
    settle: Duration,
    retry_backoff: Duration,
}

impl SessionController {
    pub fn new(state: SessionState, clock: PhaseClock, ledger: Option<Ledger>) -> Self {
        Self {
            state,
            clock,
            ledger,
            settle: DEFAULT_SETTLE,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    pub fn with_timing(mut self, settle: Duration, retry_backoff: Duration) -> Self {
        self.settle = settle;
        self.retry_backoff = retry_backoff;
        self
    }

    #[cfg(test)]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn cadence(&self) -> Duration {
        self.clock.cadence()
    }

    #[cfg(test)]
    pub fn history(&self) -> Option<&HistoryAdapter> {
        self.ledger.as_ref().map(|l| &l.history)
    }

    /// Stored total for the current task including this run, when history
    /// is enabled.
    pub fn task_total(&self) -> Option<u64> {
        self.ledger
            .as_ref()
            .map(|l| l.prior_total + self.state.minutes_this_run)
    }

    pub fn tick(&mut self, presenter: &mut dyn Presenter) -> Result<TickOutcome, AppError> {
        let total = self.task_total();
        let outcome = self.clock.advance(&mut self.state, total, presenter);

        if let TickOutcome::PhaseComplete(finished) = outcome {
            self.complete(finished, presenter)?;
        }

        Ok(outcome)
    }

    fn complete(&mut self, finished: Phase, presenter: &mut dyn Presenter) -> Result<(), AppError> {
        let message = match finished {
            Phase::Working => {
                self.state.minutes_this_run += self.state.preset.work_minutes();
                self.commit(presenter);
                WORK_DONE_MESSAGE
            }
            Phase::OnBreak => BREAK_DONE_MESSAGE,
        };

        tracing::info!(
            task = %self.state.task,
            minutes_this_run = self.state.minutes_this_run,
            "{} phase complete",
            finished.name()
        );

        presenter.notify(APP_TITLE, message);
        presenter.play(Cue::Upload, 3);
        presenter.celebrate(finished, self.settle)?;

        self.state.enter(finished.next());
        Ok(())
    }

    // Writes the absolute running total, so one retry can never double count
    // and a later success covers any earlier dropped write.
    fn commit(&mut self, presenter: &mut dyn Presenter) {
        let Some(ledger) = self.ledger.as_mut() else {
            return;
        };
        let task = &self.state.task;
        let total = ledger.prior_total + self.state.minutes_this_run;

        let first = ledger.history.record(&ledger.username, task, total);
        let Err(e) = first else {
            tracing::info!(user = %ledger.username, task = %task, total, "committed");
            return;
        };

        tracing::warn!(user = %ledger.username, task = %task, "commit failed, retrying once: {}", e);
        std::thread::sleep(self.retry_backoff);

        match ledger.history.record(&ledger.username, task, total) {
            Ok(()) => {
                tracing::info!(user = %ledger.username, task = %task, total, "committed on retry");
            }
            Err(e) => {
                tracing::error!(user = %ledger.username, task = %task, total, "commit dropped: {}", e);
                presenter.play(Cue::Error, 1);
            }
        }
    }
}
