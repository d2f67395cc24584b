//! Speech output coordination
//!
//! Plays at most one synthesized utterance at a time, picks a voice via
//! a layered heuristic, and arbitrates with the input coordinator so the
//! widget never transcribes its own voice.

use std::time::Duration;

use crate::locale::Locale;
use crate::widget::input::InputCoordinator;
use crate::Result;

/// Debounce between playback end and listening restart, against
/// audio-hardware echo tail
pub const RESUME_DELAY: Duration = Duration::from_millis(300);

/// Voice-name hints checked by the selection heuristic, lowercase
const VOICE_NAME_HINTS: &[&str] = &[
    "female", "woman", "samantha", "veena", "lekha", "zira", "heera", "susan",
];

/// A synthesis voice offered by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Display name, e.g. "Veena"
    pub name: String,
    /// BCP-47 tag, e.g. "kn-IN"
    pub lang: String,
}

impl Voice {
    /// Convenience constructor
    #[must_use]
    pub fn new(name: &str, lang: &str) -> Self {
        Self {
            name: name.to_string(),
            lang: lang.to_string(),
        }
    }

    fn matches_locale(&self, locale: Locale) -> bool {
        let prefix = &locale.voice_tag()[..2];
        self.lang.to_lowercase().starts_with(prefix)
    }

    fn matches_hint(&self) -> bool {
        let name = self.name.to_lowercase();
        VOICE_NAME_HINTS.iter().any(|hint| name.contains(hint))
    }
}

/// Pick a voice for `locale` from the platform's available voices
///
/// Layered preference: locale match + name hint, else locale match, else
/// name hint, else the first voice, else none (playback proceeds with
/// the system default).
#[must_use]
pub fn select_voice(voices: &[Voice], locale: Locale) -> Option<&Voice> {
    voices
        .iter()
        .find(|v| v.matches_locale(locale) && v.matches_hint())
        .or_else(|| voices.iter().find(|v| v.matches_locale(locale)))
        .or_else(|| voices.iter().find(|v| v.matches_hint()))
        .or_else(|| voices.first())
}

/// Event produced by utterance playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Playback began
    Started,
    /// Playback finished or was cancelled by the platform
    Ended,
}

/// Platform speech-synthesis capability
///
/// `cancel` must be idempotent and drop any queued utterance.
pub trait Synthesizer: Send {
    /// Whether the platform offers synthesis at all
    fn is_available(&self) -> bool;

    /// Voices the platform currently offers
    fn voices(&self) -> Vec<Voice>;

    /// Queue one utterance for playback
    ///
    /// # Errors
    ///
    /// Returns error if the utterance cannot be queued
    fn speak(&mut self, text: &str, voice: Option<&Voice>) -> Result<()>;

    /// Cancel any in-progress or queued utterance
    fn cancel(&mut self);
}

/// Directive emitted once when playback ends and listening should resume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumeListening {
    /// How long the driver must wait before restarting the input session
    pub after: Duration,
}

/// Coordinates utterance playback and listening suspension
pub struct OutputCoordinator {
    synthesizer: Box<dyn Synthesizer>,
    speaking: bool,
    resume_after_speech: bool,
    resume_delay: Duration,
}

impl OutputCoordinator {
    /// Create a coordinator around a platform synthesizer
    #[must_use]
    pub fn new(synthesizer: Box<dyn Synthesizer>) -> Self {
        Self {
            synthesizer,
            speaking: false,
            resume_after_speech: false,
            resume_delay: RESUME_DELAY,
        }
    }

    /// Override the resume debounce delay
    #[must_use]
    pub fn with_resume_delay(mut self, delay: Duration) -> Self {
        self.resume_delay = delay;
        self
    }

    /// Whether an utterance is currently playing
    #[must_use]
    pub const fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Whether listening was active when the current utterance began
    #[must_use]
    pub const fn resume_pending(&self) -> bool {
        self.resume_after_speech
    }

    /// Speak `text` in `locale`, suspending the input coordinator
    ///
    /// Cancels any current utterance first (at most one concurrent).
    /// Listening is stopped synchronously and whether it was active is
    /// recorded so the driver can resume it after playback ends.
    /// Absence of a synthesis capability is a no-op, not a failure.
    ///
    /// # Errors
    ///
    /// Returns the synthesizer's error if the utterance cannot be
    /// queued; listening state is already suspended at that point and
    /// the recorded resume intent is kept so the driver restores it.
    pub fn speak(
        &mut self,
        text: &str,
        locale: Locale,
        input: &mut InputCoordinator,
    ) -> Result<()> {
        if !self.synthesizer.is_available() {
            tracing::debug!("speech synthesis unavailable, skipping playback");
            return Ok(());
        }

        // At most one concurrent utterance
        self.synthesizer.cancel();

        // Speech output always suspends listening
        self.resume_after_speech = input.is_listening();
        input.stop();
        self.speaking = true;

        let voices = self.synthesizer.voices();
        let voice = select_voice(&voices, locale);
        tracing::debug!(
            locale = %locale,
            voice = voice.map_or("<default>", |v| v.name.as_str()),
            "speaking"
        );

        self.synthesizer.speak(text, voice)
    }

    /// Feed a playback event into the coordinator
    ///
    /// Returns the one-shot resume directive when playback ends and
    /// listening was active before it began.
    pub fn handle_event(&mut self, event: PlaybackEvent) -> Option<ResumeListening> {
        match event {
            PlaybackEvent::Started => {
                self.speaking = true;
                None
            }
            PlaybackEvent::Ended => {
                self.speaking = false;
                if std::mem::take(&mut self.resume_after_speech) {
                    Some(ResumeListening {
                        after: self.resume_delay,
                    })
                } else {
                    None
                }
            }
        }
    }

    /// Cancel any in-progress or queued utterance; idempotent
    pub fn stop(&mut self) {
        self.synthesizer.cancel();
        self.speaking = false;
        self.resume_after_speech = false;
    }
}
