// src/publish/endpoint.rs
// =============================================================================
// This module talks to the publish server.
//
// Protocol:
//   POST {server}/api/publish/{articleId}      (no request body)
//   -> { "success": bool,
//        "content": { "html": "...", "markdown": "..." },   (on success)
//        "uploaded": [ ... ],                              (only the count matters)
//        "logs": [ "..." ],                                (per-image failures)
//        "error": "..." }                                  (on failure)
//
// The server may send null instead of an empty list, and error statuses
// (404, 500) still carry a JSON body with "error", so we decode the body
// whatever the status code is.
//
// No timeout is set on the client: a request waits as long as the
// transport allows.
// =============================================================================

use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::PublishError;

/// HTML (and source) of the article with remote image links
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishedContent {
    pub html: String,
    #[serde(default)]
    pub markdown: Option<String>,
}

/// Body of the publish response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PublishResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub content: Option<PublishedContent>,
    #[serde(default)]
    pub uploaded: Option<Vec<String>>,
    #[serde(default)]
    pub logs: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Content that passed every check and can be copied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedContent {
    pub html: String,
    /// Number of assets the server uploaded
    pub uploaded: usize,
}

impl PublishResponse {
    /// Applies the acceptance rules to a decoded response
    ///
    /// A success with any log lines is a failure: partial success is not
    /// success.
    pub fn into_accepted(self) -> Result<AcceptedContent, PublishError> {
        if !self.success {
            let message = self.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(PublishError::Server(message));
        }

        let logs = self.logs.unwrap_or_default();
        if !logs.is_empty() {
            return Err(PublishError::Rejected(logs));
        }

        let content = self.content.ok_or(PublishError::MissingContent)?;

        Ok(AcceptedContent {
            html: content.html,
            uploaded: self.uploaded.map_or(0, |uploaded| uploaded.len()),
        })
    }
}

/// HTTP client bound to one publish server
#[derive(Debug, Clone)]
pub struct PublishEndpoint {
    client: Client,
    base: Url,
}

impl PublishEndpoint {
    pub fn new(base: Url) -> Result<Self, PublishError> {
        if base.cannot_be_a_base() {
            return Err(PublishError::BaseUrl(base.to_string()));
        }

        let client = Client::builder().build()?;

        Ok(Self { client, base })
    }

    /// Endpoint URL for one article
    ///
    /// The id is added as a single path segment, so characters like '/'
    /// or ' ' are percent-encoded instead of changing the path.
    pub fn url_for(&self, article_id: &str) -> Url {
        let mut url = self.base.clone();

        // new() rejected cannot-be-a-base URLs, so this always succeeds
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "publish", article_id]);
        }

        url
    }

    /// Sends the publish request and decodes the response body
    pub async fn publish(&self, article_id: &str) -> Result<PublishResponse, PublishError> {
        let url = self.url_for(article_id);
        debug!("POST {}", url);

        let response = self.client.post(url).send().await?;
        debug!("publish server answered HTTP {}", response.status().as_u16());

        let body = response.json::<PublishResponse>().await?;
        Ok(body)
    }
}
