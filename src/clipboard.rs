// src/clipboard.rs
// =============================================================================
// This module puts rich text on the system clipboard.
//
// The publish flow only needs "copy this HTML", so it talks to the
// ClipboardSink trait. SystemClipboard is the real implementation (arboard);
// tests plug in their own recorder.
//
// On X11/Wayland the copied content is served by the process that set it.
// A CLI exits right after copying, so SystemClipboard keeps serving until
// another program takes the selection (a clipboard manager, or the next
// copy) or the hold time runs out.
//
// Rust concepts:
// - Traits: a small interface the publisher depends on instead of arboard
// - thiserror: derive Display/Error for our error enum
// =============================================================================

use arboard::Clipboard;
#[cfg(all(unix, not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))))]
use arboard::SetExtLinux;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How long the clipboard is served after a copy unless configured otherwise
pub const DEFAULT_HOLD: Duration = Duration::from_secs(60);

/// Errors that can occur while writing to the clipboard
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// Could not open the clipboard (no display, locked by another app, ...)
    #[error("clipboard access error: {0}")]
    Access(String),
    /// The clipboard was opened but refused the content
    #[error("clipboard write error: {0}")]
    Write(String),
}

/// Something that can receive copied rich text
pub trait ClipboardSink {
    /// Copies `html` as rich text, with `plain_text` for apps that can't
    /// paste HTML
    fn copy_html(&self, html: &str, plain_text: &str) -> Result<(), ClipboardError>;
}

/// The operating system clipboard
#[derive(Debug, Clone, Copy)]
pub struct SystemClipboard {
    /// Upper bound on how long copy_html blocks serving the content
    /// (X11/Wayland only; zero means don't wait)
    hold: Duration,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::with_hold(DEFAULT_HOLD)
    }
}

impl SystemClipboard {
    pub fn with_hold(hold: Duration) -> Self {
        Self { hold }
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }

    /// When serving stops for a copy made at `now`, or None to not wait
    pub fn hold_deadline(&self, now: Instant) -> Option<Instant> {
        if self.hold.is_zero() {
            None
        } else {
            Some(now + self.hold)
        }
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy_html(&self, html: &str, plain_text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))?;
        let set = clipboard.set();

        // Blocks until another program owns the selection or the deadline passes
        #[cfg(all(unix, not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))))]
        let set = match self.hold_deadline(Instant::now()) {
            Some(deadline) => {
                eprintln!(
                    "📋 Serving the clipboard for up to {}s: paste now (a clipboard manager takes it at once)",
                    self.hold.as_secs()
                );
                set.wait_until(deadline)
            }
            None => set,
        };

        set.html(html, Some(plain_text))
            .map_err(|e| ClipboardError::Write(e.to_string()))?;

        Ok(())
    }
}
