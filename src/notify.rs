// src/notify.rs
// =============================================================================
// This module shows short-lived notifications ("toasts") to the user.
//
// Behavior:
// - A toast is rendered immediately, colored by severity
// - It stays live for a fixed display time plus a short exit animation,
//   then it is gone
// - There is no queue: two toasts shown back to back are both live at the
//   same time, even if they carry the same message
//
// Rust concepts:
// - Mutex: interior mutability so notify() can take &self
// - Generics: ToastBoard<W> writes to any io::Write (stderr, or a Vec in tests)
// - tokio::time::Instant: follows tokio's clock, so tests can pause time
// =============================================================================

use colored::Colorize;
use log::warn;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};
use tokio::time::{Duration, Instant};

/// How long a toast is fully visible
pub const DISPLAY_DURATION: Duration = Duration::from_millis(3000);

/// How long the exit animation runs after the display time
pub const EXIT_DURATION: Duration = Duration::from_millis(300);

/// How a notification should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    Success,
    Warning,
    Error,
    #[default]
    Info,
}

impl Severity {
    /// Background color (RGB)
    pub fn background(self) -> (u8, u8, u8) {
        match self {
            Severity::Success => (0xd4, 0xed, 0xda),
            Severity::Warning => (0xff, 0xf3, 0xcd),
            Severity::Error => (0xf8, 0xd7, 0xda),
            Severity::Info => (0xd1, 0xec, 0xf1),
        }
    }

    /// Text color (RGB)
    pub fn foreground(self) -> (u8, u8, u8) {
        match self {
            Severity::Success => (0x15, 0x57, 0x24),
            Severity::Warning => (0x85, 0x64, 0x04),
            Severity::Error => (0x72, 0x1c, 0x24),
            Severity::Info => (0x0c, 0x54, 0x60),
        }
    }
}

/// Anything that can tell the user what happened
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

/// A toast that has been shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    /// When the exit animation finishes and the toast is removed
    pub expires_at: Instant,
}

/// Renders toasts to a terminal and tracks which are still on screen
pub struct ToastBoard<W: Write> {
    out: Mutex<W>,
    live: Mutex<Vec<Toast>>,
}

impl ToastBoard<io::Stderr> {
    /// A board that draws on stderr, leaving stdout for command output
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ToastBoard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            live: Mutex::new(Vec::new()),
        }
    }

    /// Toasts that haven't finished their exit animation yet
    ///
    /// Expired toasts are dropped as a side effect.
    pub fn live(&self) -> Vec<Toast> {
        let now = Instant::now();
        let mut live = lock(&self.live);
        live.retain(|toast| toast.expires_at > now);
        live.clone()
    }

    /// Gives back the writer (tests read what was rendered)
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // Draws the message as a padded, colored block, one row per line
    fn render(&self, message: &str, severity: Severity) -> io::Result<()> {
        let width = message.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let (br, bg, bb) = severity.background();
        let (fr, fg, fb) = severity.foreground();

        let mut out = lock(&self.out);
        writeln!(out)?;
        for line in message.lines() {
            let padding = " ".repeat(width - line.chars().count());
            let row = format!("  {}{}  ", line, padding);
            writeln!(out, "{}", row.as_str().truecolor(fr, fg, fb).on_truecolor(br, bg, bb))?;
        }
        out.flush()
    }
}

impl<W: Write> Notifier for ToastBoard<W> {
    fn notify(&self, message: &str, severity: Severity) {
        if let Err(e) = self.render(message, severity) {
            warn!("could not render notification: {}", e);
        }

        lock(&self.live).push(Toast {
            message: message.to_string(),
            severity,
            expires_at: Instant::now() + DISPLAY_DURATION + EXIT_DURATION,
        });
    }
}

// A panic while holding the lock leaves plain data behind; keep using it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
