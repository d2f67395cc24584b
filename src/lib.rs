//! Vaani - bilingual voice chat widget core and relay gateway
//!
//! This library provides the core functionality for Vaani:
//! - Voice interaction coordination (speech input/output, transcript)
//! - Script-based language detection (Kannada / English)
//! - Language-fidelity retry policy for model replies
//! - HTTP relay gateway to an upstream completion API
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      Widget                          │
//! │   Input Coord  │  Output Coord  │  Transcript       │
//! └────────────────────┬────────────────────────────────┘
//!                      │ Conversation Relay (POST /api/chat)
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Relay Gateway                        │
//! │   Locale prompt  │  Context window (10 / session)   │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │         Upstream completion API (OpenAI-style)       │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod locale;
pub mod server;
pub mod widget;

pub use config::{Config, PreferenceStore};
pub use error::{Error, Result};
pub use locale::Locale;
pub use server::{AppState, context::ContextStore, upstream::CompletionClient};
pub use widget::{
    ChatBackend, ConversationRelay, FidelityPolicy, HttpBackend, InputCoordinator,
    OutputCoordinator, Transcript, Widget,
};
