use ratatui::{prelude::*, widgets::*};

use crate::history::TaskTotals;
use crate::presenter::TimerView;
use crate::session::Phase;

const BANNER: [&str; 4] = [
    r"  ___ _    ___   ___                  _               ",
    r" / __| |  |_ _| | _ \___ _ __  ___  __| |___ _ _ ___  ",
    r"| (__| |__ | |  |  _/ _ \ '  \/ _ \/ _` / _ \ '_/ _ \ ",
    r" \___|____|___| |_| \___/_|_|_\___/\__,_\___/_| \___/ ",
];

const PASTEL: [Color; 4] = [
    Color::Rgb(116, 235, 213),
    Color::Rgb(135, 206, 235),
    Color::Rgb(172, 182, 229),
    Color::Rgb(222, 170, 230),
];

const RAINBOW: [Color; 7] = [
    Color::Rgb(255, 85, 85),
    Color::Rgb(255, 170, 60),
    Color::Rgb(250, 230, 90),
    Color::Rgb(90, 230, 120),
    Color::Rgb(80, 200, 255),
    Color::Rgb(120, 120, 255),
    Color::Rgb(200, 110, 255),
];

const ACCENT: Color = Color::Cyan;

pub const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

// ============================================================================
// Shared pieces
// ============================================================================

pub fn banner_lines() -> Vec<Line<'static>> {
    BANNER
        .iter()
        .zip(PASTEL)
        .map(|(text, color)| {
            Line::from(Span::styled(*text, Style::default().fg(color).add_modifier(Modifier::BOLD)))
        })
        .collect()
}

fn framed(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(PASTEL[1]))
}

fn hint(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)))
}

fn with_banner(f: &mut Frame, body_height: u16) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(BANNER.len() as u16),
            Constraint::Length(1),
            Constraint::Length(body_height),
            Constraint::Min(0),
        ])
        .split(f.size());

    f.render_widget(Paragraph::new(banner_lines()).alignment(Alignment::Center), chunks[1]);
    chunks[3]
}

pub fn format_clock(elapsed_secs: u64) -> String {
    format!("{:02}m{:02}s", elapsed_secs / 60, elapsed_secs % 60)
}

// ============================================================================
// Screens
// ============================================================================

pub fn render_welcome(f: &mut Frame) {
    let area = with_banner(f, 14);
    let key = |s: &'static str| Span::styled(s, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));

    let lines = vec![
        Line::from(""),
        hint("A simple Pomodoro timer that works in your command line."),
        Line::from(""),
        Line::from(vec![Span::raw("Let's start working together!")]),
        Line::from(vec![
            Span::raw("Enter your "),
            key("Task"),
            Span::raw(" and choose your "),
            key("Session Period"),
        ]),
        Line::from(vec![Span::raw("Then press "), key("Enter"), Span::raw(" to start!")]),
        Line::from(""),
        Line::from(vec![
            key("CLI Pomodoro"),
            Span::raw(" will play a sound and show a notification"),
        ]),
        Line::from("when work/break time's up. Something like this!"),
        Line::from(""),
        hint("Press any key to continue"),
    ];

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(framed(" Welcome ")),
        centered_cols(64, area),
    );
}

pub fn render_text_prompt(f: &mut Frame, question: &str, input: &str, default: &str) {
    let area = with_banner(f, 7);
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("? ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(question, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!(" ({})", default), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(input, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::styled("█", Style::default().fg(ACCENT)),
        ]),
        Line::from(""),
    ];

    f.render_widget(Paragraph::new(lines).block(framed(" CLI Pomodoro ")), centered_cols(64, area));
}

pub fn render_choice_prompt(f: &mut Frame, question: &str, choices: &[&str], selected: usize) {
    let area = with_banner(f, choices.len() as u16 + 6);
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("? ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(question, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
    ];

    for (i, choice) in choices.iter().enumerate() {
        let line = if i == selected {
            Line::from(Span::styled(format!("❯ {}", choice), Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)))
        } else {
            Line::from(Span::styled(format!("  {}", choice), Style::default().fg(Color::Gray)))
        };
        lines.push(line);
    }
    lines.push(Line::from(""));
    lines.push(hint("↑↓/jk: Move  •  Enter: Select"));

    f.render_widget(Paragraph::new(lines).block(framed(" CLI Pomodoro ")), centered_cols(64, area));
}

/// One line of the startup checklist: done steps get a tick, the current
/// one a spinner frame.
pub struct Step {
    pub text: String,
    pub done: bool,
}

pub fn render_steps(f: &mut Frame, steps: &[Step], frame: usize) {
    let area = with_banner(f, steps.len() as u16 + 4);
    let mut lines = vec![Line::from("")];

    for step in steps {
        let (mark, color) = if step.done {
            ("✔", Color::Green)
        } else {
            (SPINNER[frame % SPINNER.len()], Color::Yellow)
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", mark), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw(step.text.as_str()),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(framed(" Session ")), centered_cols(72, area));
}

pub fn render_history(f: &mut Frame, username: &str, totals: &TaskTotals) {
    let area = with_banner(f, totals.len().max(1) as u16 + 6);
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("Welcome back, "),
            Span::styled(username, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::raw("!"),
        ]),
        Line::from(""),
    ];

    if totals.is_empty() {
        lines.push(Line::from(Span::styled("  No sessions yet, let's make the first one!", Style::default().fg(Color::Gray))));
    } else {
        for (task, minutes) in totals {
            lines.push(Line::from(vec![
                Span::raw(format!("  {:<24}", task)),
                Span::styled(format_minutes(*minutes), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines).block(framed(" History ")), centered_cols(64, area));
}

pub fn format_minutes(minutes: u64) -> String {
    if minutes >= 60 {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

pub fn render_timer(f: &mut Frame, view: &TimerView) {
    let area = with_banner(f, 12);
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(centered_cols(72, area));

    // Status
    let status = match view.phase {
        Phase::Working => Line::from(vec![
            Span::raw("++ We are "),
            Span::styled(view.task.as_str(), Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::raw(" 💪..."),
        ]),
        Phase::OnBreak => Line::from(vec![
            Span::raw("++ We are "),
            Span::styled("Having a Break", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::raw(" 🍵..."),
        ]),
    };
    f.render_widget(Paragraph::new(status), sections[0]);

    // Progress
    let label = format!(
        "{} - {}/{}m | {}%",
        chrono::Local::now().format("%I:%M %p"),
        format_clock(view.elapsed_secs),
        view.duration_secs / 60,
        (view.progress * 100.0).round() as u16
    );
    let color = match view.phase {
        Phase::Working => Color::Cyan,
        Phase::OnBreak => Color::Green,
    };
    f.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .label(label)
            .ratio(view.progress),
        sections[2],
    );

    // Totals
    let mut totals = vec![Span::styled(
        format!("This run: {}", format_minutes(view.minutes_this_run)),
        Style::default().fg(Color::Gray),
    )];
    if let Some(total) = view.task_total {
        totals.push(Span::styled(
            format!("  •  All time on {}: {}", view.task, format_minutes(total)),
            Style::default().fg(Color::Gray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(totals)), sections[4]);

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("++ If you want to stop "),
            Span::styled("CLI Pomodoro", Style::default().fg(ACCENT)),
            Span::raw(", just press "),
            Span::styled("Ctrl + C", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw("!"),
        ])),
        sections[6],
    );
}

pub fn celebration_text(finished: Phase) -> &'static str {
    match finished {
        Phase::Working => "You did great! Let's have a break!",
        Phase::OnBreak => "What a nice break! Let's get back to work!",
    }
}

pub fn rainbow_line(text: &str, frame: usize) -> Line<'static> {
    Line::from(
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                Span::styled(
                    c.to_string(),
                    Style::default().fg(RAINBOW[(i + frame) % RAINBOW.len()]).add_modifier(Modifier::BOLD),
                )
            })
            .collect::<Vec<_>>(),
    )
}

pub fn render_celebration(f: &mut Frame, finished: Phase, frame: usize) {
    let text = celebration_text(finished);
    let area = with_banner(f, 5);
    let lines = vec![Line::from(""), rainbow_line(text, frame), Line::from("")];

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(RAINBOW[frame % RAINBOW.len()])),
        ),
        centered_cols(text.chars().count() as u16 + 8, area),
    );
}

fn centered_cols(width: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    Rect {
        x: r.x + (r.width - width) / 2,
        width,
        ..r
    }
}
