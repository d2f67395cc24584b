//! Locale handling and script-based language detection
//!
//! The widget operates in two locales: English (primary) and Kannada
//! (secondary). Detection is a Unicode script heuristic: any code point
//! in the Kannada block tags the utterance as Kannada.

use serde::{Deserialize, Serialize};

/// Kannada Unicode block
const KANNADA_BLOCK: std::ops::RangeInclusive<char> = '\u{0C80}'..='\u{0CFF}';

/// Spoken/written language mode governing recognition, synthesis, and
/// prompt selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English (primary, default)
    #[default]
    En,
    /// Kannada (secondary)
    Kn,
}

impl Locale {
    /// Classify a text utterance by script
    ///
    /// Returns `Kn` if the text contains any Kannada-block code point,
    /// else `En`. Empty text defaults to `En`.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        if text.chars().any(|c| KANNADA_BLOCK.contains(&c)) {
            Self::Kn
        } else {
            Self::En
        }
    }

    /// Wire code used in the chat request body
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Kn => "kn",
        }
    }

    /// BCP-47 tag used to match synthesis voices
    #[must_use]
    pub const fn voice_tag(self) -> &'static str {
        match self {
            Self::En => "en-US",
            Self::Kn => "kn-IN",
        }
    }

    /// Parse a wire code
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Self::En),
            "kn" => Some(Self::Kn),
            _ => None,
        }
    }

    /// Instruction embedded ahead of the user text so the model answers
    /// in the requested language
    #[must_use]
    pub const fn instruction(self) -> &'static str {
        match self {
            Self::En => "Reply in English. ",
            Self::Kn => "ಕನ್ನಡದಲ್ಲಿ ಮಾತ್ರ ಉತ್ತರಿಸಿ (reply only in Kannada). ",
        }
    }

    /// System prompt the gateway selects for this locale
    #[must_use]
    pub const fn system_prompt(self) -> &'static str {
        match self {
            Self::En => {
                "You are a helpful voice assistant. Keep responses short and \
                 conversational, suitable for being read aloud. Reply in English."
            }
            Self::Kn => {
                "You are a helpful voice assistant for Kannada speakers. Keep \
                 responses short and conversational, suitable for being read \
                 aloud. Reply only in Kannada (ಕನ್ನಡ), never in English."
            }
        }
    }

    /// Localized bubble shown when the relay call fails
    #[must_use]
    pub const fn connectivity_error(self) -> &'static str {
        match self {
            Self::En => "Sorry, I couldn't reach the server. Please try again.",
            Self::Kn => "ಕ್ಷಮಿಸಿ, ಸರ್ವರ್ ತಲುಪಲು ಸಾಧ್ಯವಾಗಲಿಲ್ಲ. ದಯವಿಟ್ಟು ಮತ್ತೆ ಪ್ರಯತ್ನಿಸಿ.",
        }
    }

    /// Localized bubble shown when a recognition session fails
    #[must_use]
    pub const fn recognition_error(self) -> &'static str {
        match self {
            Self::En => "Sorry, I didn't catch that. Tap the mic and try again.",
            Self::Kn => "ಕ್ಷಮಿಸಿ, ಅದು ಕೇಳಿಸಲಿಲ್ಲ. ಮೈಕ್ ಒತ್ತಿ ಮತ್ತೆ ಪ್ರಯತ್ನಿಸಿ.",
        }
    }

    /// Localized bubble shown when speech recognition is unsupported
    #[must_use]
    pub const fn capability_error(self) -> &'static str {
        match self {
            Self::En => "Speech input isn't supported here.",
            Self::Kn => "ಇಲ್ಲಿ ಧ್ವನಿ ಇನ್‌ಪುಟ್ ಬೆಂಬಲಿತವಾಗಿಲ್ಲ.",
        }
    }

    /// Placeholder used when the gateway returns no reply text
    #[must_use]
    pub const fn no_answer(self) -> &'static str {
        match self {
            Self::En => "I don't have an answer for that.",
            Self::Kn => "ಅದಕ್ಕೆ ನನ್ನ ಬಳಿ ಉತ್ತರವಿಲ್ಲ.",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_kannada() {
        assert_eq!(Locale::detect("ನಮಸ್ಕಾರ"), Locale::Kn);
        assert_eq!(Locale::detect("hello ನಮಸ್ಕಾರ"), Locale::Kn);
        // A single Kannada code point is enough
        assert_eq!(Locale::detect("x\u{0C85}x"), Locale::Kn);
    }

    #[test]
    fn test_detect_english() {
        assert_eq!(Locale::detect("hello world"), Locale::En);
        assert_eq!(Locale::detect("123 !?"), Locale::En);
    }

    #[test]
    fn test_detect_empty_defaults_to_primary() {
        assert_eq!(Locale::detect(""), Locale::En);
    }

    #[test]
    fn test_detect_other_scripts_are_primary() {
        // Devanagari is not in the Kannada block
        assert_eq!(Locale::detect("नमस्ते"), Locale::En);
    }

    #[test]
    fn test_wire_codes_roundtrip() {
        assert_eq!(Locale::from_code("en"), Some(Locale::En));
        assert_eq!(Locale::from_code("kn"), Some(Locale::Kn));
        assert_eq!(Locale::from_code("fr"), None);
        assert_eq!(Locale::Kn.code(), "kn");
    }

    #[test]
    fn test_serde_wire_format() {
        assert_eq!(serde_json::to_string(&Locale::Kn).unwrap(), "\"kn\"");
        let parsed: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Locale::En);
    }
}
