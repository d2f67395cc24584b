//! Widget end-to-end tests over fake platform capabilities

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vaani::widget::{
    ChatBackend, ChatReply, ChatRequest, InputCoordinator, OutputCoordinator, PlaybackEvent,
    RecognitionEvent, Recognizer, SessionToken, Synthesizer, Voice, Widget,
};
use vaani::{Error, Locale, Result};

struct FakeRecognizer {
    available: bool,
}

impl Recognizer for FakeRecognizer {
    fn is_available(&self) -> bool {
        self.available
    }

    fn begin(&mut self, _locale: Locale, _token: SessionToken) -> Result<()> {
        Ok(())
    }

    fn cancel(&mut self) {}
}

struct FakeSynthesizer {
    spoken: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl Synthesizer for FakeSynthesizer {
    fn is_available(&self) -> bool {
        true
    }

    fn voices(&self) -> Vec<Voice> {
        vec![Voice::new("Samantha", "en-US"), Voice::new("Veena", "kn-IN")]
    }

    fn speak(&mut self, text: &str, voice: Option<&Voice>) -> Result<()> {
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), voice.map(|v| v.name.clone())));
        Ok(())
    }

    fn cancel(&mut self) {}
}

/// Returns queued replies in order; empty queue means connectivity failure
struct ScriptedBackend {
    replies: Mutex<Vec<Result<ChatReply>>>,
    requests: Mutex<Vec<ChatRequest>>,
    clears: Mutex<usize>,
}

impl ScriptedBackend {
    fn new(replies: Vec<Result<ChatReply>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
            clears: Mutex::new(0),
        }
    }

    fn reply(text: &str) -> Result<ChatReply> {
        Ok(ChatReply {
            reply: Some(text.to_string()),
        })
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.requests.lock().unwrap().push(request.clone());
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            Err(Error::Relay("gateway unreachable".to_string()))
        } else {
            replies.remove(0)
        }
    }

    async fn clear_context(&self, _session: &str) -> Result<()> {
        *self.clears.lock().unwrap() += 1;
        Ok(())
    }
}

struct Harness {
    widget: Widget<Arc<ScriptedBackend>>,
    backend: Arc<ScriptedBackend>,
    spoken: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

fn harness(replies: Vec<Result<ChatReply>>) -> Harness {
    harness_with(replies, true)
}

fn harness_with(replies: Vec<Result<ChatReply>>, recognition_available: bool) -> Harness {
    let backend = Arc::new(ScriptedBackend::new(replies));
    let spoken = Arc::new(Mutex::new(Vec::new()));

    let input = InputCoordinator::new(
        Box::new(FakeRecognizer {
            available: recognition_available,
        }),
        Locale::En,
    );
    let output = OutputCoordinator::new(Box::new(FakeSynthesizer {
        spoken: Arc::clone(&spoken),
    }));
    let relay = vaani::ConversationRelay::new(Arc::clone(&backend), "test-session");

    Harness {
        widget: Widget::new(input, output, relay, Locale::En),
        backend,
        spoken,
    }
}

#[tokio::test]
async fn test_kannada_utterance_full_loop() {
    let mut h = harness(vec![ScriptedBackend::reply("ನಮಸ್ಕಾರ, ಹೇಗಿದ್ದೀರಾ?")]);

    let token = h.widget.toggle_mic().unwrap();
    h.widget
        .on_recognition(token, RecognitionEvent::Transcript("ನಮಸ್ಕಾರ".into()))
        .await;

    // Locale followed the utterance script
    assert_eq!(h.widget.locale(), Locale::Kn);

    let entries = h.widget.transcript().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, "ನಮಸ್ಕಾರ");
    assert_eq!(entries[1].text, "ನಮಸ್ಕಾರ, ಹೇಗಿದ್ದೀರಾ?");

    // Spoken once with the Kannada voice
    let spoken = h.spoken.lock().unwrap();
    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].1.as_deref(), Some("Veena"));

    // The request carried the locale instruction
    let requests = h.backend.requests.lock().unwrap();
    assert!(requests[0].message.starts_with(Locale::Kn.instruction()));
    assert_eq!(requests[0].language, Locale::Kn);
}

#[tokio::test]
async fn test_connectivity_failure_becomes_one_bubble() {
    let mut h = harness(vec![]);

    h.widget.submit_utterance("ನಮಸ್ಕಾರ").await;

    let entries = h.widget.transcript().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].text, Locale::Kn.connectivity_error());

    // Nothing is spoken on failure
    assert!(h.spoken.lock().unwrap().is_empty());
    assert!(!h.widget.session_state().speaking);
}

#[tokio::test]
async fn test_listening_suspended_while_speaking_then_resumes() {
    let mut h = harness(vec![ScriptedBackend::reply("hello there")]);

    // Mic is on when the typed utterance goes out
    h.widget.toggle_mic().unwrap();
    h.widget.submit_utterance("hi").await;

    // The reply is being spoken and the mic is off
    let state = h.widget.session_state();
    assert!(state.speaking);
    assert!(!state.listening);
    assert!(state.resume_after_speech);

    // Playback completion hands back a one-shot resume directive
    let resume = h.widget.on_playback(PlaybackEvent::Ended);
    assert!(resume.is_some());
    assert!(h.widget.on_playback(PlaybackEvent::Ended).is_none());

    h.widget.resume_listening();
    assert!(h.widget.session_state().listening);
}

#[tokio::test]
async fn test_resume_declined_when_speech_restarted() {
    let mut h = harness(vec![
        ScriptedBackend::reply("first reply"),
        ScriptedBackend::reply("second reply"),
    ]);

    h.widget.toggle_mic().unwrap();
    h.widget.submit_utterance("one").await;
    let resume = h.widget.on_playback(PlaybackEvent::Ended);
    assert!(resume.is_some());

    // A new utterance started speaking before the resume delay elapsed
    h.widget.submit_utterance("two").await;
    assert!(h.widget.resume_listening().is_none());
    assert!(!h.widget.session_state().listening);
}

#[tokio::test]
async fn test_stale_recognition_event_is_dropped() {
    let mut h = harness(vec![ScriptedBackend::reply("never sent")]);

    let token = h.widget.toggle_mic().unwrap();
    // Mic toggled off before the platform delivered the transcript
    h.widget.toggle_mic();

    h.widget
        .on_recognition(token, RecognitionEvent::Transcript("late".into()))
        .await;

    assert!(h.widget.transcript().is_empty());
    assert!(h.backend.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_recognition_error_surfaces_localized_bubble() {
    let mut h = harness(vec![]);

    let token = h.widget.toggle_mic().unwrap();
    h.widget
        .on_recognition(token, RecognitionEvent::Error("no-speech".into()))
        .await;

    let entries = h.widget.transcript().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, Locale::En.recognition_error());
}

#[tokio::test]
async fn test_missing_recognition_alerts_once() {
    let mut h = harness_with(vec![], false);

    assert!(h.widget.toggle_mic().is_none());
    assert!(h.widget.toggle_mic().is_none());

    // The capability bubble appears only for the first attempt
    let entries = h.widget.transcript().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, Locale::En.capability_error());
}

#[tokio::test]
async fn test_fidelity_retry_keeps_only_second_reply() {
    let mut h = harness(vec![
        ScriptedBackend::reply("Sorry, ನಮಸ್ಕಾರ"),
        ScriptedBackend::reply("ನಮಸ್ಕಾರ"),
    ]);

    h.widget.submit_utterance("ನಮಸ್ಕಾರ").await;

    let entries = h.widget.transcript().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].text, "ನಮಸ್ಕಾರ");
    assert_eq!(h.backend.requests.lock().unwrap().len(), 2);
    // Only the accepted reply was spoken
    assert_eq!(h.spoken.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_clear_conversation_empties_transcript_and_backend() {
    let mut h = harness(vec![ScriptedBackend::reply("hi")]);

    h.widget.submit_utterance("hello").await;
    assert!(!h.widget.transcript().is_empty());

    h.widget.clear_conversation().await;
    assert!(h.widget.transcript().is_empty());
    assert_eq!(*h.backend.clears.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_close_tears_down_both_coordinators() {
    let mut h = harness(vec![ScriptedBackend::reply("hi")]);

    h.widget.toggle_mic();
    h.widget.submit_utterance("hello").await;
    h.widget.close();

    let state = h.widget.session_state();
    assert!(!state.listening);
    assert!(!state.speaking);
    assert!(!state.resume_after_speech);
}
