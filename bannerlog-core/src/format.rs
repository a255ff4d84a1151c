//! Rendering of a single log line: `tag + timestamp + banner + ' ' + message + '\n'`.

use std::{borrow::Cow, fmt};

use chrono::{DateTime, Datelike, TimeZone};
use colored::Color;

use crate::Level;

const RESET: &str = "\x1b[m";
const BLINK: &str = "5";
const REVERSE: &str = "7";

/// Plain severity tag, padded to seven columns.
pub const fn plain_tag(level: Level) -> &'static str {
    match level {
        Level::Trace => "[TRACE]",
        Level::Debug => "[DEBUG]",
        Level::Info => " [INFO]",
        Level::Warn => " [WARN]",
        Level::Error => "[ERROR]",
        Level::Fatal => "[FATAL]",
        Level::Panic => "[PANIC]",
    }
}

fn sgr_codes(level: Level) -> String {
    let (color, styles): (Color, &[&str]) = match level {
        Level::Trace => (Color::BrightBlue, &[]),
        Level::Debug => (Color::BrightGreen, &[]),
        Level::Info => (Color::BrightWhite, &[]),
        Level::Warn => (Color::BrightYellow, &[]),
        Level::Error => (Color::BrightRed, &[]),
        Level::Fatal => (Color::BrightRed, &[BLINK]),
        Level::Panic => (Color::BrightRed, &[BLINK, REVERSE]),
    };
    let mut codes = color.to_fg_str().into_owned();
    for style in styles {
        codes.push(';');
        codes.push_str(style);
    }
    codes
}

/// Severity tag, wrapped in the level's ANSI color when `color` is set.
pub fn tag(level: Level, color: bool) -> Cow<'static, str> {
    let plain = plain_tag(level);
    if color {
        Cow::Owned(format!("\x1b[{}m{plain}{RESET}", sgr_codes(level)))
    } else {
        Cow::Borrowed(plain)
    }
}

/// Replaces every newline by a visible, bright white `\n` marker.
/// The marker is colored whatever the handle's color setting.
pub fn escape_newlines(message: &str) -> Cow<'_, str> {
    if message.contains('\n') {
        let marker = format!("\x1b[{}m\\n{RESET}", Color::BrightWhite.to_fg_str());
        Cow::Owned(message.replace('\n', &marker))
    } else {
        Cow::Borrowed(message)
    }
}

/// Remembers the month and day of the last rendered timestamp so that a date only
/// shows up on the first line of a new month or day.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateTracker {
    month: u32,
    day: u32,
}

impl DateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the bracketed timestamp for `now` and records its month and day.
    pub fn stamp<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        let (month, day) = (now.month(), now.day());
        let pattern = if month != self.month {
            "[%H:%M-|%m/%d]"
        } else if day != self.day {
            "[%H:%M:%S-|%d]"
        } else {
            "[%H:%M:%S%.3f]"
        };
        self.month = month;
        self.day = day;
        now.format(pattern).to_string()
    }
}

/// Part of a line rendered before the timestamp is known: the tag, then banner and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLine {
    pub tag: Cow<'static, str>,
    pub body: String,
}

impl PendingLine {
    pub fn new(
        level: Level,
        color: bool,
        escape_newline: bool,
        banner: &str,
        message: &str,
    ) -> Self {
        let message = if escape_newline {
            escape_newlines(message)
        } else {
            Cow::Borrowed(message)
        };
        let mut body = String::with_capacity(banner.len() + message.len() + 2);
        body.push_str(banner);
        body.push(' ');
        body.push_str(&message);
        body.push('\n');
        Self {
            tag: tag(level, color),
            body,
        }
    }

    pub fn finish(&self, timestamp: &str) -> String {
        let mut line = String::with_capacity(self.tag.len() + timestamp.len() + self.body.len());
        line.push_str(&self.tag);
        line.push_str(timestamp);
        line.push_str(&self.body);
        line
    }
}
