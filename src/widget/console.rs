//! Console capability pair for running the widget in a terminal
//!
//! Stands in for platform speech services: "recognition" is a line read
//! by the chat loop while a session is pending, and "synthesis" prints
//! the utterance. Lets the full coordinator loop run on a headless
//! machine, in the spirit of a mic/speaker smoke test.

use std::sync::{Arc, Mutex};

use crate::locale::Locale;
use crate::widget::input::{Recognizer, SessionToken};
use crate::widget::output::{Synthesizer, Voice};
use crate::Result;

/// Shared handle to the recognizer's pending session
#[derive(Clone, Default)]
pub struct PendingSession(Arc<Mutex<Option<SessionToken>>>);

impl PendingSession {
    /// Take the pending session token, if a session is waiting for input
    #[must_use]
    pub fn take(&self) -> Option<SessionToken> {
        self.0.lock().map(|mut slot| slot.take()).unwrap_or(None)
    }
}

/// Recognition capability backed by terminal input
pub struct ConsoleRecognizer {
    pending: PendingSession,
}

impl ConsoleRecognizer {
    /// Create the recognizer and the handle the chat loop polls
    #[must_use]
    pub fn new() -> (Self, PendingSession) {
        let pending = PendingSession::default();
        (
            Self {
                pending: pending.clone(),
            },
            pending,
        )
    }
}

impl Recognizer for ConsoleRecognizer {
    fn is_available(&self) -> bool {
        true
    }

    fn begin(&mut self, locale: Locale, token: SessionToken) -> Result<()> {
        println!("🎙  listening ({locale}) — type your utterance:");
        if let Ok(mut slot) = self.pending.0.lock() {
            *slot = Some(token);
        }
        Ok(())
    }

    fn cancel(&mut self) {
        if let Ok(mut slot) = self.pending.0.lock() {
            *slot = None;
        }
    }
}

/// Synthesis capability that prints instead of playing audio
pub struct ConsoleSynthesizer;

impl Synthesizer for ConsoleSynthesizer {
    fn is_available(&self) -> bool {
        true
    }

    fn voices(&self) -> Vec<Voice> {
        vec![
            Voice::new("Samantha", "en-US"),
            Voice::new("Veena", "kn-IN"),
        ]
    }

    fn speak(&mut self, text: &str, voice: Option<&Voice>) -> Result<()> {
        let name = voice.map_or("default", |v| v.name.as_str());
        println!("🔊 [{name}] {text}");
        Ok(())
    }

    fn cancel(&mut self) {}
}
