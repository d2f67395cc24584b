//! Shared widget session state
//!
//! Single-owner flags mutated only by the input/output coordinators.
//! `listening` and `speaking` are mutually exclusive by construction:
//! entering speech playback unconditionally stops active listening and
//! records whether it should resume.

/// Transient per-widget session flags
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionState {
    /// A recognition session is active
    pub listening: bool,
    /// An utterance is being played back
    pub speaking: bool,
    /// Listening was active when playback started and should resume
    /// after it ends
    pub resume_after_speech: bool,
}

impl SessionState {
    /// Reset all flags, as happens when the widget is closed
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
