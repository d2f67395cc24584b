//! Speech input coordination
//!
//! Owns a single single-utterance recognition session and its lifecycle.
//! Sessions are numbered; events carrying a stale session token are
//! ignored so that a locale toggle or stop cannot race with a
//! late-arriving platform event.

use crate::locale::Locale;
use crate::{Error, Result};

/// State of the input coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    /// No recognition session active
    Idle,
    /// A recognition session is capturing one utterance
    Listening,
}

/// Token identifying one recognition session
///
/// Platform events echo the token they were started with; events bearing
/// an invalidated token are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(pub u64);

/// Event produced by a recognition session
#[derive(Debug, Clone)]
pub enum RecognitionEvent {
    /// Final transcript for the utterance
    Transcript(String),
    /// Session-level error
    Error(String),
    /// Session ended without a result
    Ended,
}

/// What a recognition event amounted to, after staleness filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSignal {
    /// The session completed with a non-empty transcript
    Utterance(String),
    /// The session failed; the caller surfaces a localized bubble
    Failed,
}

/// Platform speech-recognition capability
///
/// A session captures exactly one utterance bound to one locale and then
/// ends. `cancel` must be idempotent.
pub trait Recognizer: Send {
    /// Whether the platform offers recognition at all
    fn is_available(&self) -> bool;

    /// Acquire a recognition session bound to `locale`, tagged with `token`
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be started
    fn begin(&mut self, locale: Locale, token: SessionToken) -> Result<()>;

    /// Tear down any in-flight session
    fn cancel(&mut self);
}

/// Coordinates the recognition session lifecycle and mic visual state
pub struct InputCoordinator {
    recognizer: Box<dyn Recognizer>,
    state: InputState,
    locale: Locale,
    generation: u64,
    mic_indicator: Option<Box<dyn FnMut(bool) + Send>>,
}

impl InputCoordinator {
    /// Create a coordinator around a platform recognizer
    #[must_use]
    pub fn new(recognizer: Box<dyn Recognizer>, locale: Locale) -> Self {
        Self {
            recognizer,
            state: InputState::Idle,
            locale,
            generation: 0,
            mic_indicator: None,
        }
    }

    /// Register the cosmetic mic affordance callback
    pub fn set_mic_indicator(&mut self, indicator: Box<dyn FnMut(bool) + Send>) {
        self.mic_indicator = Some(indicator);
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> InputState {
        self.state
    }

    /// Whether a recognition session is active
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.state == InputState::Listening
    }

    /// Active locale for new sessions
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Start a recognition session bound to the current locale
    ///
    /// No-op if already listening. Returns the token the session was
    /// started with so the driver can tag incoming platform events.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Capability`] when the platform offers no
    /// recognition support, or the recognizer's error if the session
    /// cannot be acquired. Either way the coordinator stays `Idle`.
    pub fn start(&mut self) -> Result<SessionToken> {
        if self.state == InputState::Listening {
            return Ok(SessionToken(self.generation));
        }

        if !self.recognizer.is_available() {
            tracing::warn!("speech recognition unavailable on this platform");
            return Err(Error::Capability("speech recognition"));
        }

        self.generation += 1;
        let token = SessionToken(self.generation);
        self.recognizer.begin(self.locale, token)?;
        self.state = InputState::Listening;
        self.set_mic(true);

        tracing::debug!(locale = %self.locale, token = token.0, "recognition session started");
        Ok(token)
    }

    /// Stop any active session; idempotent
    ///
    /// Invalidates the current token so late-arriving events from the
    /// torn-down session are ignored.
    pub fn stop(&mut self) {
        self.recognizer.cancel();
        self.generation += 1;
        if self.state == InputState::Listening {
            self.state = InputState::Idle;
            self.set_mic(false);
            tracing::debug!("recognition session stopped");
        }
    }

    /// Switch the active locale
    ///
    /// Tears down and invalidates any in-flight session so it cannot
    /// silently continue with a stale locale binding; a new session is
    /// created on the next start.
    pub fn set_locale(&mut self, locale: Locale) {
        if locale == self.locale {
            return;
        }
        tracing::debug!(from = %self.locale, to = %locale, "locale toggled");
        self.stop();
        self.locale = locale;
    }

    /// Feed a platform event into the state machine
    ///
    /// Stale-token events, empty transcripts, and plain session ends
    /// yield `None`. A non-empty transcript yields
    /// [`InputSignal::Utterance`]; a session error yields
    /// [`InputSignal::Failed`] for the caller to surface as a localized
    /// bubble. Any terminal event returns the coordinator to `Idle`.
    pub fn handle_event(
        &mut self,
        token: SessionToken,
        event: RecognitionEvent,
    ) -> Option<InputSignal> {
        if token.0 != self.generation {
            tracing::trace!(token = token.0, current = self.generation, "stale recognition event ignored");
            return None;
        }

        // Sessions are single-utterance: any terminal event returns to Idle
        self.state = InputState::Idle;
        self.set_mic(false);

        match event {
            RecognitionEvent::Transcript(text) => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    None
                } else {
                    tracing::info!(transcript = %text, "utterance recognized");
                    Some(InputSignal::Utterance(text))
                }
            }
            RecognitionEvent::Error(message) => {
                tracing::warn!(error = %message, "recognition session failed");
                Some(InputSignal::Failed)
            }
            RecognitionEvent::Ended => None,
        }
    }

    fn set_mic(&mut self, active: bool) {
        if let Some(indicator) = self.mic_indicator.as_mut() {
            indicator(active);
        }
    }
}
