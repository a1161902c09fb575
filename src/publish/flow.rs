// src/publish/flow.rs
// =============================================================================
// Publisher: upload images on the server, then copy the result as rich text.
//
// What happens on publish():
// 1. Refuse to start if a publish is already running (in-progress guard)
// 2. POST to the publish endpoint and wait for the JSON answer
// 3. success = false           -> show the server's error, stop
//    success = true with logs  -> show every log line, stop (no copy)
//    success = true, no logs   -> continue
// 4. Save the displayed content, swap in the server's HTML, format it
// 5. Wait the settling delay, then copy the whole content to the clipboard
// 6. Restore the saved content and format it again, whether or not the copy
//    worked; fall back to the saved display if formatting doesn't reproduce it
// 7. Report the number of uploaded images
//
// The guard is an RAII value: it resets the state to Idle when dropped, so
// every exit path (success, rejection, error) releases it.
//
// Rust concepts:
// - AtomicU8 + compare_exchange: a lock-free "am I already running?" flag
// - Drop: cleanup that runs no matter how a function returns
// - Trait objects (Arc<dyn ...>): capabilities plugged in at construction
// =============================================================================

use log::{debug, info, warn};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::endpoint::PublishEndpoint;
use super::{PublishConfig, PublishError};
use crate::clipboard::ClipboardSink;
use crate::content::{ContentContainer, ContentFormatter, NoopFormatter, Snapshot};
use crate::notify::{Notifier, Severity};

/// Where a Publisher is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PublishState {
    Idle = 0,
    Uploading = 1,
    Copying = 2,
}

impl PublishState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => PublishState::Uploading,
            2 => PublishState::Copying,
            _ => PublishState::Idle,
        }
    }
}

/// What a call to publish() ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Content was copied; `uploaded` images were pushed by the server
    Published { uploaded: usize },
    /// Another publish was already running, nothing happened
    Ignored,
}

// Holds the in-progress flag; dropping it marks the publisher Idle again
struct InFlight<'a> {
    state: &'a AtomicU8,
}

impl InFlight<'_> {
    fn advance(&self, next: PublishState) {
        self.state.store(next as u8, Ordering::SeqCst);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.store(PublishState::Idle as u8, Ordering::SeqCst);
    }
}

/// Runs the publish flow for one "publish" control
pub struct Publisher {
    endpoint: PublishEndpoint,
    clipboard: Arc<dyn ClipboardSink>,
    notifier: Arc<dyn Notifier>,
    formatter: Box<dyn ContentFormatter>,
    settle_delay: Duration,
    state: AtomicU8,
}

impl Publisher {
    /// Builds a publisher that leaves content unformatted
    ///
    /// Use [`Publisher::with_formatter`] to plug in a formatter.
    pub fn new(
        config: PublishConfig,
        clipboard: Arc<dyn ClipboardSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, PublishError> {
        Ok(Self {
            endpoint: PublishEndpoint::new(config.server)?,
            clipboard,
            notifier,
            formatter: Box::new(NoopFormatter),
            settle_delay: config.settle_delay,
            state: AtomicU8::new(PublishState::Idle as u8),
        })
    }

    pub fn with_formatter(mut self, formatter: impl ContentFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn state(&self) -> PublishState {
        PublishState::from_u8(self.state.load(Ordering::SeqCst))
    }

    // Takes the in-progress flag, or None if someone else holds it
    fn try_begin(&self) -> Option<InFlight<'_>> {
        self.state
            .compare_exchange(
                PublishState::Idle as u8,
                PublishState::Uploading as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .ok()
            .map(|_| InFlight { state: &self.state })
    }

    /// Publishes `article_id` and copies the result from `container`
    ///
    /// Every failure is shown to the user before it is returned. The
    /// container always ends up showing what it showed before the call.
    pub async fn publish(
        &self,
        container: &mut ContentContainer,
        article_id: &str,
    ) -> Result<PublishOutcome, PublishError> {
        let Some(flight) = self.try_begin() else {
            debug!("publish already in progress, ignoring request for {}", article_id);
            return Ok(PublishOutcome::Ignored);
        };

        info!("publishing article {}", article_id);

        match self.upload_and_copy(&flight, container, article_id).await {
            Ok(uploaded) => {
                self.notifier.notify(&success_message(uploaded), Severity::Success);
                Ok(PublishOutcome::Published { uploaded })
            }
            Err(e) => {
                warn!("publishing {} failed: {}", article_id, e);
                self.notifier.notify(&e.notification(), Severity::Error);
                Err(e)
            }
        }
        // `flight` drops here and the publisher is Idle again
    }

    async fn upload_and_copy(
        &self,
        flight: &InFlight<'_>,
        container: &mut ContentContainer,
        article_id: &str,
    ) -> Result<usize, PublishError> {
        let accepted = self.endpoint.publish(article_id).await?.into_accepted()?;

        flight.advance(PublishState::Copying);
        let saved = container.snapshot();

        container.set_inner_html(&accepted.html);
        self.formatter.format(container);

        // Give the swapped content time to settle before it is read back
        tokio::time::sleep(self.settle_delay).await;

        let copied = self
            .clipboard
            .copy_html(&container.inner_html(), &container.text());

        self.restore(container, saved);

        copied?;
        debug!("copied article {} ({} uploaded)", article_id, accepted.uploaded);
        Ok(accepted.uploaded)
    }

    // Reloads the clean source and formats it again. If that doesn't
    // reproduce what was on screen (content edited in place by someone
    // other than our formatter), the saved display is put back verbatim.
    fn restore(&self, container: &mut ContentContainer, saved: Snapshot) {
        container.restore(saved.clone());
        self.formatter.format(container);

        if container.inner_html() != saved.displayed() {
            debug!("re-formatted content differs from the display, restoring it verbatim");
            container.restore_displayed(saved);
        }
    }
}

fn success_message(uploaded: usize) -> String {
    let mut message = String::from("✅ Published!\n");
    if uploaded > 0 {
        message.push_str(&format!("🚀 uploaded {} image(s)\n", uploaded));
    } else {
        message.push_str("📝 no images needed upload (or all were already uploaded)\n");
    }
    message.push_str("\nThe content with remote image links is on the clipboard.");
    message
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does compare_exchange do?
//    - "If the value is Idle, set it to Uploading" as one atomic step
//    - It returns Err if the value wasn't Idle, so a second click is ignored
//
// 2. Why restore before `copied?`
//    - `?` returns early on error
//    - Restoring first means the content comes back even when the copy fails
//
// 3. Why Arc<dyn ClipboardSink> and not a generic parameter?
//    - Tests hold a clone of the same Arc to inspect what was copied
//    - The concrete type is chosen at runtime (real clipboard or recorder)
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::LinkAnnotator;
    use crate::clipboard::ClipboardError;
    use serde_json::json;
    use std::sync::Mutex;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingClipboard {
        copies: Mutex<Vec<String>>,
        broken: bool,
    }

    impl ClipboardSink for RecordingClipboard {
        fn copy_html(&self, html: &str, _plain_text: &str) -> Result<(), ClipboardError> {
            if self.broken {
                return Err(ClipboardError::Access("no display".to_string()));
            }
            self.copies.lock().unwrap().push(html.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        seen: Mutex<Vec<(String, Severity)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str, severity: Severity) {
            self.seen.lock().unwrap().push((message.to_string(), severity));
        }
    }

    struct Harness {
        server: MockServer,
        clipboard: Arc<RecordingClipboard>,
        notifier: Arc<RecordingNotifier>,
        publisher: Publisher,
    }

    async fn harness(clipboard: RecordingClipboard) -> Harness {
        let server = MockServer::start().await;
        let clipboard = Arc::new(clipboard);
        let notifier = Arc::new(RecordingNotifier::default());
        let config = PublishConfig::new(Url::parse(&server.uri()).unwrap())
            .with_settle_delay(Duration::from_millis(1));
        let publisher = Publisher::new(config, clipboard.clone(), notifier.clone())
            .unwrap()
            .with_formatter(LinkAnnotator::default());

        Harness {
            server,
            clipboard,
            notifier,
            publisher,
        }
    }

    async fn respond_with(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/api/publish/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    // Content as the page shows it: loaded, then formatted once
    fn displayed(html: &str) -> ContentContainer {
        let mut container = ContentContainer::from_html(html);
        LinkAnnotator::default().annotate(&mut container);
        container
    }

    fn last_notification(notifier: &RecordingNotifier) -> (String, Severity) {
        notifier.seen.lock().unwrap().last().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_logs_reject_publish_without_copy() {
        let h = harness(RecordingClipboard::default()).await;
        respond_with(
            &h.server,
            json!({"success": true, "logs": ["img1 failed"], "content": {"html": "<p>x</p>"}}),
        )
        .await;
        let mut container = displayed(r#"<p>draft <a href="https://a.dev">a</a></p>"#);
        let before = container.inner_html();

        let result = h.publisher.publish(&mut container, "42").await;

        assert!(matches!(result, Err(PublishError::Rejected(_))));
        assert!(h.clipboard.copies.lock().unwrap().is_empty());
        assert_eq!(container.inner_html(), before);
        let (message, severity) = last_notification(&h.notifier);
        assert_eq!(severity, Severity::Error);
        assert!(message.contains("img1 failed"));
        assert_eq!(h.publisher.state(), PublishState::Idle);
    }

    #[tokio::test]
    async fn test_success_reports_uploads_and_restores_content() {
        let h = harness(RecordingClipboard::default()).await;
        respond_with(
            &h.server,
            json!({"success": true, "logs": [], "uploaded": ["a.png", "b.png"], "content": {"html": "<p>hi</p>"}}),
        )
        .await;
        let mut container = displayed(r#"<p>draft <a href="https://a.dev">a</a></p>"#);
        let before = container.inner_html();

        let result = h.publisher.publish(&mut container, "42").await.unwrap();

        assert_eq!(result, PublishOutcome::Published { uploaded: 2 });
        assert_eq!(*h.clipboard.copies.lock().unwrap(), vec!["<p>hi</p>".to_string()]);
        assert_eq!(container.inner_html(), before);
        let (message, severity) = last_notification(&h.notifier);
        assert_eq!(severity, Severity::Success);
        assert!(message.contains("uploaded 2 image(s)"));
    }

    #[tokio::test]
    async fn test_copied_content_is_formatted() {
        let h = harness(RecordingClipboard::default()).await;
        respond_with(
            &h.server,
            json!({"success": true, "logs": null, "uploaded": null,
                   "content": {"html": r#"<p><a href="https://cdn.dev/x">x</a></p>"#}}),
        )
        .await;
        let mut container = ContentContainer::from_html("<p>draft</p>");

        let result = h.publisher.publish(&mut container, "42").await.unwrap();

        assert_eq!(result, PublishOutcome::Published { uploaded: 0 });
        let copies = h.clipboard.copies.lock().unwrap();
        assert!(copies[0].contains("[1]</sup>"));
        assert!(copies[0].contains("references-section"));
        let (message, _) = last_notification(&h.notifier);
        assert!(message.contains("no images needed upload"));
    }

    #[tokio::test]
    async fn test_server_failure_shows_error_and_keeps_content() {
        let h = harness(RecordingClipboard::default()).await;
        respond_with(&h.server, json!({"success": false, "error": "quota exceeded"})).await;
        let mut container = displayed("<p>draft</p>");
        let before = container.inner_html();

        let result = h.publisher.publish(&mut container, "42").await;

        assert!(matches!(result, Err(PublishError::Server(_))));
        assert_eq!(container.inner_html(), before);
        let (message, severity) = last_notification(&h.notifier);
        assert_eq!(severity, Severity::Error);
        assert!(message.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_request_failure_and_releases_guard() {
        let h = harness(RecordingClipboard::default()).await;
        Mock::given(method("POST"))
            .and(path("/api/publish/42"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .expect(2)
            .mount(&h.server)
            .await;
        let mut container = displayed("<p>draft</p>");

        let first = h.publisher.publish(&mut container, "42").await;
        assert!(matches!(first, Err(PublishError::Request(_))));
        assert!(last_notification(&h.notifier).0.contains("Request failed"));
        assert_eq!(h.publisher.state(), PublishState::Idle);

        // Not stuck: a retry issues a new request
        let second = h.publisher.publish(&mut container, "42").await;
        assert!(matches!(second, Err(PublishError::Request(_))));
    }

    #[tokio::test]
    async fn test_clipboard_failure_still_restores_content() {
        let h = harness(RecordingClipboard {
            broken: true,
            ..Default::default()
        })
        .await;
        respond_with(
            &h.server,
            json!({"success": true, "logs": [], "uploaded": [], "content": {"html": "<p>cdn</p>"}}),
        )
        .await;
        let mut container = displayed(r#"<p><a href="https://a.dev">a</a></p>"#);
        let before = container.inner_html();

        let result = h.publisher.publish(&mut container, "42").await;

        assert!(matches!(result, Err(PublishError::Clipboard(_))));
        assert_eq!(container.inner_html(), before);
        assert!(last_notification(&h.notifier).0.contains("Copy failed"));
        assert_eq!(h.publisher.state(), PublishState::Idle);
    }

    #[tokio::test]
    async fn test_unformatted_publisher_keeps_in_place_edits() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            json!({"success": true, "logs": [], "uploaded": ["a.png"], "content": {"html": "<p>cdn</p>"}}),
        )
        .await;
        let clipboard = Arc::new(RecordingClipboard::default());
        let config = PublishConfig::new(Url::parse(&server.uri()).unwrap())
            .with_settle_delay(Duration::from_millis(1));
        let publisher = Publisher::new(config, clipboard.clone(), Arc::new(RecordingNotifier::default()))
            .unwrap();

        let mut container = ContentContainer::from_html("<p>a</p>");
        container.append_fragment("<p>edited</p>");
        let before = container.inner_html();

        let result = publisher.publish(&mut container, "42").await.unwrap();

        assert_eq!(result, PublishOutcome::Published { uploaded: 1 });
        assert_eq!(*clipboard.copies.lock().unwrap(), vec!["<p>cdn</p>".to_string()]);
        assert_eq!(container.inner_html(), before);
    }

    #[tokio::test]
    async fn test_foreign_edits_survive_alongside_formatter() {
        let h = harness(RecordingClipboard::default()).await;
        respond_with(
            &h.server,
            json!({"success": true, "logs": [], "content": {"html": "<p>cdn</p>"}}),
        )
        .await;
        let mut container = displayed(r#"<p><a href="https://a.dev">a</a></p>"#);
        container.append_fragment("<p>note added by hand</p>");
        let before = container.inner_html();

        h.publisher.publish(&mut container, "42").await.unwrap();

        assert_eq!(container.inner_html(), before);
    }

    #[tokio::test]
    async fn test_second_publish_while_pending_is_ignored() {
        let h = harness(RecordingClipboard::default()).await;
        Mock::given(method("POST"))
            .and(path("/api/publish/42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "content": {"html": "<p>hi</p>"}}))
                    .set_delay(Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&h.server)
            .await;
        let mut first = ContentContainer::from_html("<p>one</p>");
        let mut second = ContentContainer::from_html("<p>two</p>");

        let (a, b) = tokio::join!(h.publisher.publish(&mut first, "42"), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            assert_eq!(h.publisher.state(), PublishState::Uploading);
            h.publisher.publish(&mut second, "42").await
        });

        assert_eq!(a.unwrap(), PublishOutcome::Published { uploaded: 0 });
        assert_eq!(b.unwrap(), PublishOutcome::Ignored);
        assert_eq!(h.server.received_requests().await.unwrap().len(), 1);
        assert_eq!(second.inner_html(), "<p>two</p>");
        // Only the first call notified
        assert_eq!(h.notifier.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_success_message_wording() {
        assert!(success_message(0).contains("no images needed upload"));
        assert!(success_message(3).contains("uploaded 3 image(s)"));
    }
}
