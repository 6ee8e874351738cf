use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use std::{io, time::{Duration, Instant}};

use crate::alerts;
use crate::error::AppError;
use crate::history::TaskTotals;
use crate::presenter::{Cue, Presenter, TimerView};
use crate::session::Phase;
use crate::ui::{self, Step};

pub type Term = Terminal<CrosstermBackend<io::Stdout>>;

const ANIMATION_STEP: Duration = Duration::from_millis(120);
const SLEEP_DELAY: Duration = Duration::from_secs(2);

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn is_quit(key: &KeyEvent) -> bool {
    is_ctrl_c(key) || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
}

fn next_key() -> Result<KeyEvent, AppError> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Release {
                return Ok(key);
            }
        }
    }
}

/// Sleeps for `timeout` while watching the keyboard. Ctrl+C, `q` or Esc
/// abort the wait with [`AppError::Interrupted`].
pub fn wait_or_interrupt(timeout: Duration) -> Result<(), AppError> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(());
        }
        if event::poll(remaining)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release && is_quit(&key) {
                    return Err(AppError::Interrupted);
                }
            }
        }
    }
}

// ============================================================================
// Prompts
// ============================================================================

pub fn ask_text(terminal: &mut Term, question: &str, default: &str) -> Result<String, AppError> {
    let mut input = String::new();
    loop {
        terminal.draw(|f| ui::render_text_prompt(f, question, &input, default))?;

        let key = next_key()?;
        if is_ctrl_c(&key) {
            return Err(AppError::Interrupted);
        }
        match key.code {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Enter => {
                let answer = input.trim();
                return Ok(if answer.is_empty() { default.to_string() } else { answer.to_string() });
            }
            _ => {}
        }
    }
}

pub fn ask_choice(terminal: &mut Term, question: &str, choices: &[&str]) -> Result<usize, AppError> {
    let mut selected = 0;
    loop {
        terminal.draw(|f| ui::render_choice_prompt(f, question, choices, selected))?;

        let key = next_key()?;
        if is_ctrl_c(&key) {
            return Err(AppError::Interrupted);
        }
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => selected = (selected + 1) % choices.len(),
            KeyCode::Up | KeyCode::Char('k') => {
                selected = if selected == 0 { choices.len() - 1 } else { selected - 1 };
            }
            KeyCode::Enter => return Ok(selected),
            _ => {}
        }
    }
}

// ============================================================================
// Intro screens
// ============================================================================

pub fn show_welcome(terminal: &mut Term, sound: bool, notifications: bool) -> Result<(), AppError> {
    terminal.draw(ui::render_welcome)?;
    if notifications {
        alerts::notify(crate::controller::APP_TITLE, "This is a notification!", sound);
    }
    if sound {
        alerts::play(Cue::Upload, 3);
    }

    if is_ctrl_c(&next_key()?) {
        return Err(AppError::Interrupted);
    }
    Ok(())
}

/// Spins each step for a second, ticking it off with the "change" cue.
pub fn show_startup(terminal: &mut Term, steps: &[String], sound: bool) -> Result<(), AppError> {
    let mut shown: Vec<Step> = Vec::new();

    for text in steps {
        shown.push(Step { text: text.clone(), done: false });
        let started = Instant::now();
        let mut frame = 0;
        while started.elapsed() < Duration::from_secs(1) {
            terminal.draw(|f| ui::render_steps(f, &shown, frame))?;
            wait_or_interrupt(Duration::from_millis(80))?;
            frame += 1;
        }
        if let Some(last) = shown.last_mut() {
            last.done = true;
        }
        if sound {
            alerts::play(Cue::Change, 1);
        }
    }

    terminal.draw(|f| ui::render_steps(f, &shown, 0))?;
    wait_or_interrupt(SLEEP_DELAY)
}

pub fn show_history(terminal: &mut Term, username: &str, totals: &TaskTotals) -> Result<(), AppError> {
    terminal.draw(|f| ui::render_history(f, username, totals))?;
    wait_or_interrupt(SLEEP_DELAY)
}

// ============================================================================
// Presenter
// ============================================================================

pub struct TerminalPresenter<'a> {
    terminal: &'a mut Term,
    sound: bool,
    notifications: bool,
}

impl<'a> TerminalPresenter<'a> {
    pub fn new(terminal: &'a mut Term, sound: bool, notifications: bool) -> Self {
        Self { terminal, sound, notifications }
    }
}

impl Presenter for TerminalPresenter<'_> {
    fn render(&mut self, view: &TimerView) {
        if let Err(e) = self.terminal.draw(|f| ui::render_timer(f, view)) {
            tracing::warn!("failed to draw timer: {}", e);
        }
    }

    fn play(&mut self, cue: Cue, repeat: u32) {
        if self.sound {
            alerts::play(cue, repeat);
        }
    }

    fn notify(&mut self, title: &str, body: &str) {
        if self.notifications {
            alerts::notify(title, body, self.sound);
        }
    }

    fn celebrate(&mut self, finished: Phase, settle: Duration) -> Result<(), AppError> {
        let started = Instant::now();
        let mut frame = 0;
        while started.elapsed() < settle {
            if let Err(e) = self.terminal.draw(|f| ui::render_celebration(f, finished, frame)) {
                tracing::warn!("failed to draw celebration: {}", e);
            }
            wait_or_interrupt(ANIMATION_STEP.min(settle.saturating_sub(started.elapsed())))?;
            frame += 1;
        }
        Ok(())
    }
}
