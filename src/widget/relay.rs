//! Conversation relay to the chat gateway
//!
//! Posts recognized text plus its locale to the gateway and applies the
//! language-fidelity retry policy: a Kannada exchange whose reply slips
//! into Latin script is re-issued once, discarding the first reply. That
//! retry is a content-level correction, distinct from connectivity
//! failures, which are never retried.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::locale::Locale;
use crate::{Error, Result};

static LATIN_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[A-Za-z]").expect("valid literal pattern"));

/// Request body for `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Locale instruction followed by the raw user text
    pub message: String,
    /// Locale wire code
    pub language: Locale,
    /// Session key for backend context scoping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}

/// Response body from `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Reply text; absent replies fall back to a localized placeholder
    pub reply: Option<String>,
}

/// Transport to the chat gateway
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Post one chat request and return the parsed reply
    ///
    /// # Errors
    ///
    /// Returns [`Error::Relay`] on any non-2xx status or transport
    /// failure (treated uniformly as connectivity failure).
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// Ask the gateway to drop its held context for a session
    ///
    /// # Errors
    ///
    /// Returns [`Error::Relay`] on any non-2xx status or transport failure.
    async fn clear_context(&self, session: &str) -> Result<()>;
}

#[async_trait]
impl<B: ChatBackend> ChatBackend for std::sync::Arc<B> {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.as_ref().send(request).await
    }

    async fn clear_context(&self, session: &str) -> Result<()> {
        self.as_ref().clear_context(session).await
    }
}

/// HTTP transport to the gateway relay endpoint
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a transport targeting `base_url` (e.g. `http://localhost:7860`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Relay(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Relay(format!("gateway returned {status}")));
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| Error::Relay(e.to_string()))
    }

    async fn clear_context(&self, session: &str) -> Result<()> {
        let url = format!("{}/api/chat/clear", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "session": session }))
            .send()
            .await
            .map_err(|e| Error::Relay(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Relay(format!("gateway returned {status}")));
        }
        Ok(())
    }
}

/// Trigger condition for the language-fidelity retry
///
/// A heuristic correction for a model that occasionally ignores the
/// requested output locale, not a guaranteed contract; the pattern is
/// policy, not a fixed character class.
#[derive(Debug, Clone)]
pub struct FidelityPolicy {
    pattern: Regex,
}

impl Default for FidelityPolicy {
    fn default() -> Self {
        Self {
            pattern: LATIN_LETTERS.clone(),
        }
    }
}

impl FidelityPolicy {
    /// Build a policy with a custom trigger pattern
    #[must_use]
    pub const fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// Whether `reply` violates the fidelity expectation for `locale`
    ///
    /// Only secondary-locale replies are checked; primary-locale replies
    /// never trigger regardless of content.
    #[must_use]
    pub fn violates(&self, locale: Locale, reply: &str) -> bool {
        locale == Locale::Kn && self.pattern.is_match(reply)
    }
}

/// Sends utterances to the gateway and enforces reply-locale fidelity
pub struct ConversationRelay<B: ChatBackend> {
    backend: B,
    policy: FidelityPolicy,
    session: String,
}

impl<B: ChatBackend> ConversationRelay<B> {
    /// Create a relay over `backend` scoped to `session`
    #[must_use]
    pub fn new(backend: B, session: impl Into<String>) -> Self {
        Self {
            backend,
            policy: FidelityPolicy::default(),
            session: session.into(),
        }
    }

    /// Override the fidelity retry policy
    #[must_use]
    pub fn with_policy(mut self, policy: FidelityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Session key this relay is scoped to
    #[must_use]
    pub fn session(&self) -> &str {
        &self.session
    }

    /// Exchange one utterance with the gateway
    ///
    /// Composes the locale instruction ahead of the raw text, posts it,
    /// and retries at most once when a secondary-locale reply trips the
    /// fidelity policy, keeping only the second reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Relay`] on connectivity failure; never retried.
    pub async fn exchange(&self, text: &str, locale: Locale) -> Result<String> {
        let request = ChatRequest {
            message: format!("{}{text}", locale.instruction()),
            language: locale,
            session: Some(self.session.clone()),
        };

        let reply = self.dispatch(&request, locale).await?;

        if self.policy.violates(locale, &reply) {
            tracing::debug!(locale = %locale, "reply failed locale fidelity, retrying once");
            return self.dispatch(&request, locale).await;
        }

        Ok(reply)
    }

    /// Ask the gateway to drop this session's context
    ///
    /// # Errors
    ///
    /// Returns [`Error::Relay`] on connectivity failure.
    pub async fn clear_context(&self) -> Result<()> {
        self.backend.clear_context(&self.session).await
    }

    async fn dispatch(&self, request: &ChatRequest, locale: Locale) -> Result<String> {
        let reply = self.backend.send(request).await?;
        Ok(reply
            .reply
            .unwrap_or_else(|| locale.no_answer().to_string()))
    }
}
