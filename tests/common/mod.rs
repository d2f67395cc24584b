//! Shared test utilities

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vaani::server::upstream::{ChatMessage, CompletionClient};
use vaani::{AppState, Error, Result};

/// Upstream stand-in returning scripted replies and recording requests
pub struct MockUpstream {
    replies: Mutex<Vec<Result<String>>>,
    fallback: Option<String>,
    pub calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockUpstream {
    /// Returns the scripted replies in order, then fails
    #[must_use]
    pub fn scripted(replies: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            fallback: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Always replies with the same text
    #[must_use]
    pub fn echoing(text: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(Vec::new()),
            fallback: Some(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Always fails, as an unreachable upstream would
    #[must_use]
    pub fn failing() -> Arc<Self> {
        Self::scripted(Vec::new())
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for MockUpstream {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let mut replies = self.replies.lock().unwrap();
        if !replies.is_empty() {
            return replies.remove(0);
        }
        self.fallback
            .clone()
            .ok_or_else(|| Error::Upstream("upstream unreachable".to_string()))
    }
}

/// Build a gateway router over a mock upstream
#[must_use]
pub fn build_test_router(upstream: Arc<MockUpstream>) -> axum::Router {
    let state = Arc::new(AppState::new(upstream));
    vaani::server::router(state)
}
