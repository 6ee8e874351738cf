use notify_rust::{Notification, Urgency};
use std::{path::Path, process::{Command, Stdio}, thread, time::Duration};

use crate::presenter::Cue;

const REPEAT_GAP: Duration = Duration::from_millis(500);

fn candidates(cue: Cue) -> &'static [(&'static str, &'static str)] {
    match cue {
        Cue::Error => &[
            ("paplay", "/usr/share/sounds/freedesktop/stereo/dialog-error.oga"),
            ("aplay", "/usr/share/sounds/generic.wav"),
        ],
        Cue::Change => &[
            ("paplay", "/usr/share/sounds/freedesktop/stereo/message.oga"),
            ("aplay", "/usr/share/sounds/sound-icons/prompt.wav"),
        ],
        Cue::Upload => &[
            ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
            ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
            ("aplay", "/usr/share/sounds/generic.wav"),
        ],
    }
}

/// Plays `cue` `repeat` times on a background thread.
pub fn play(cue: Cue, repeat: u32) {
    thread::spawn(move || {
        let Some((cmd, file)) = candidates(cue).iter().find(|(_, f)| Path::new(f).exists()) else {
            tracing::debug!(cue = cue.name(), "no sound file available");
            return;
        };
        for i in 0..repeat {
            if i > 0 {
                thread::sleep(REPEAT_GAP);
            }
            let status = Command::new(cmd)
                .arg(file)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            if let Err(e) = status {
                tracing::warn!(cue = cue.name(), "sound playback failed: {}", e);
                return;
            }
        }
    });
}

pub fn notify(title: &str, body: &str, sound: bool) {
    let mut notification = Notification::new();
    notification
        .summary(title)
        .body(body)
        .appname("cli-pomodoro")
        .icon("alarm-clock")
        .urgency(Urgency::Critical);
    if sound {
        notification.sound_name("message-new-instant");
    }
    if let Err(e) = notification.show() {
        tracing::warn!("desktop notification failed: {}", e);
    }
}
