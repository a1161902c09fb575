// src/publish/error.rs
// =============================================================================
// Errors for the publish flow.
//
// Every variant is recoverable: the user fixes the cause and presses
// publish again. notification() is the text shown in the toast.
// =============================================================================

use thiserror::Error;

use crate::clipboard::ClipboardError;

#[derive(Debug, Error)]
pub enum PublishError {
    /// The request couldn't be sent, or the response wasn't valid JSON
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with success = false
    #[error("publish failed: {0}")]
    Server(String),

    /// The server answered success = true but logged upload failures
    #[error("publish aborted: {} image upload(s) failed", .0.len())]
    Rejected(Vec<String>),

    /// The server answered success = true without any content
    #[error("server reported success without content")]
    MissingContent,

    /// The configured server URL can't have a path appended
    #[error("server url cannot be used as a base: {0}")]
    BaseUrl(String),

    /// Writing to the clipboard failed
    #[error("copy failed: {0}")]
    Clipboard(#[from] ClipboardError),
}

impl PublishError {
    /// User-facing message for this failure
    pub fn notification(&self) -> String {
        match self {
            PublishError::Request(e) => format!("❌ Request failed: {}", e),
            PublishError::Server(message) => format!("❌ Publish failed: {}", message),
            PublishError::Rejected(logs) => format!(
                "⚠️ Publish aborted: these image uploads failed, fix them and try again:\n\n{}",
                logs.join("\n")
            ),
            PublishError::MissingContent | PublishError::BaseUrl(_) => format!("❌ {}", self),
            PublishError::Clipboard(e) => format!(
                "❌ Copy failed\n\n{}\n\nTry selecting the article and copying it by hand.",
                e
            ),
        }
    }
}
