// src/publish/mod.rs
// =============================================================================
// This module implements the "publish" button.
//
// Submodules:
// - endpoint: the HTTP call to the publish server and its JSON response
// - error: everything that can go wrong, and what the user is told
// - flow: the Publisher state machine (upload, swap, format, copy, restore)
//
// Flow at a glance:
//   Idle -> Uploading -> Failed | Rejected | Copying -> Idle
// =============================================================================

mod endpoint;
mod error;
mod flow;

use std::time::Duration;
use url::Url;

pub use endpoint::{AcceptedContent, PublishEndpoint, PublishResponse, PublishedContent};
pub use error::PublishError;
pub use flow::{PublishOutcome, PublishState, Publisher};

/// Server used when none is configured
pub const DEFAULT_SERVER: &str = "http://localhost:8080";

/// Default pause between swapping content in and copying it, in milliseconds
pub const DEFAULT_SETTLE_MS: u64 = 100;

/// Settings for a Publisher
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Base URL of the publish server; the endpoint path is appended to it
    pub server: Url,
    /// Pause after swapping content in, before it is copied
    pub settle_delay: Duration,
}

impl PublishConfig {
    pub fn new(server: Url) -> Self {
        Self {
            server,
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_MS),
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }
}
