//! Voice chat widget core
//!
//! Composition root for the voice-interaction coordinators. Control
//! flow: mic toggle -> input coordinator produces a final transcript ->
//! locale detection tags it -> conversation relay posts it to the
//! gateway -> reply lands in the transcript and is spoken -> listening
//! resumes after playback if it was active before.

pub mod console;
pub mod input;
pub mod output;
pub mod relay;
pub mod session;
pub mod transcript;

pub use input::{InputCoordinator, InputSignal, InputState, RecognitionEvent, Recognizer, SessionToken};
pub use output::{OutputCoordinator, PlaybackEvent, ResumeListening, Synthesizer, Voice, select_voice};
pub use relay::{ChatBackend, ChatReply, ChatRequest, ConversationRelay, FidelityPolicy, HttpBackend};
pub use session::SessionState;
pub use transcript::{Role, Transcript, TranscriptEntry};

use crate::locale::Locale;
use crate::Error;

/// The assembled widget: coordinators, relay, and transcript view
pub struct Widget<B: ChatBackend> {
    input: InputCoordinator,
    output: OutputCoordinator,
    relay: ConversationRelay<B>,
    transcript: Transcript,
    locale: Locale,
    capability_alerted: bool,
}

impl<B: ChatBackend> Widget<B> {
    /// Assemble a widget from its parts
    #[must_use]
    pub fn new(
        input: InputCoordinator,
        output: OutputCoordinator,
        relay: ConversationRelay<B>,
        locale: Locale,
    ) -> Self {
        Self {
            input,
            output,
            relay,
            transcript: Transcript::new(),
            locale,
            capability_alerted: false,
        }
    }

    /// Current locale
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// The transcript view
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Snapshot of the session flags derived from the coordinators
    #[must_use]
    pub fn session_state(&self) -> SessionState {
        SessionState {
            listening: self.input.is_listening(),
            speaking: self.output.is_speaking(),
            resume_after_speech: self.output.resume_pending(),
        }
    }

    /// Mutable access to the input coordinator (mic indicator wiring)
    pub fn input_mut(&mut self) -> &mut InputCoordinator {
        &mut self.input
    }

    /// Toggle the mic: start listening when idle, stop when active
    ///
    /// Returns the session token when a session was started. A missing
    /// recognition capability is surfaced as a localized bubble once and
    /// swallowed thereafter.
    pub fn toggle_mic(&mut self) -> Option<SessionToken> {
        if self.input.is_listening() {
            self.input.stop();
            return None;
        }

        match self.input.start() {
            Ok(token) => Some(token),
            Err(Error::Capability(_)) => {
                if !self.capability_alerted {
                    self.capability_alerted = true;
                    self.transcript
                        .push_assistant(self.locale.capability_error());
                }
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to start recognition");
                self.transcript
                    .push_assistant(self.locale.recognition_error());
                None
            }
        }
    }

    /// Switch the user-selected locale
    ///
    /// Tears down any in-flight recognition session (recreated on the
    /// next start with the new binding).
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
        self.input.set_locale(locale);
    }

    /// Feed a recognition event; on a completed utterance, runs the full
    /// relay exchange and speaks the accepted reply
    pub async fn on_recognition(&mut self, token: SessionToken, event: RecognitionEvent) {
        match self.input.handle_event(token, event) {
            Some(InputSignal::Utterance(text)) => self.submit_utterance(&text).await,
            Some(InputSignal::Failed) => {
                self.transcript
                    .push_assistant(self.locale.recognition_error());
            }
            None => {}
        }
    }

    /// Send an utterance through the relay and render the outcome
    ///
    /// Locale auto-detection tags the utterance and updates the widget
    /// locale. Failures never propagate: connectivity errors become a
    /// localized bubble and the session flags stay coherent.
    pub async fn submit_utterance(&mut self, text: &str) {
        let locale = Locale::detect(text);
        if locale != self.locale {
            self.set_locale(locale);
        }

        self.transcript.push_user(text);

        match self.relay.exchange(text, locale).await {
            Ok(reply) => {
                self.transcript.push_assistant(reply.clone());
                if let Err(e) = self.output.speak(&reply, locale, &mut self.input) {
                    tracing::warn!(error = %e, "failed to speak reply");
                    self.output.stop();
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "relay exchange failed");
                self.transcript
                    .push_assistant(locale.connectivity_error());
            }
        }
    }

    /// Feed a playback event; returns the resume directive when
    /// listening should restart after the debounce delay
    pub fn on_playback(&mut self, event: PlaybackEvent) -> Option<ResumeListening> {
        self.output.handle_event(event)
    }

    /// Restart listening after a resume directive's delay has elapsed
    ///
    /// Returns the new session token, or `None` when speech started
    /// again in the meantime or the capability is gone.
    pub fn resume_listening(&mut self) -> Option<SessionToken> {
        if self.output.is_speaking() {
            return None;
        }
        self.input.start().ok()
    }

    /// Interrupt playback; idempotent
    pub fn stop_speaking(&mut self) {
        self.output.stop();
    }

    /// Clear the visible transcript and, independently, ask the gateway
    /// to drop this session's context
    pub async fn clear_conversation(&mut self) {
        self.transcript.clear();
        if let Err(e) = self.relay.clear_context().await {
            tracing::warn!(error = %e, "failed to clear gateway context");
        }
    }

    /// Close the widget: tear down both coordinators and reset flags
    pub fn close(&mut self) {
        self.input.stop();
        self.output.stop();
    }
}
