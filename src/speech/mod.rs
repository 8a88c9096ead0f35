pub mod say;

pub use say::SayEngine;

use crate::core::WordflashError;

const PRONUNCIATION_LANG: &str = "en-US";

/// Name fragments tried in order after the female voice check.
const PREFERRED_VOICES: [&str; 2] = ["Samantha", "Google US English"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub lang: String, // BCP 47 tag, e.g. "en-US"
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self { name: name.into(), lang: normalize_lang(&lang.into()) }
    }

    fn is_us_english(&self) -> bool {
        self.lang.eq_ignore_ascii_case(PRONUNCIATION_LANG)
    }

    fn is_female(&self) -> bool {
        self.name.contains("Female")
    }
}

/// `en_US` and `en-us` both become `en-US`.
pub fn normalize_lang(lang: &str) -> String {
    let mut parts = lang.trim().split(['-', '_']);
    let language = parts.next().unwrap_or("").to_ascii_lowercase();
    match parts.next() {
        Some(region) if !region.is_empty() => format!("{}-{}", language, region.to_ascii_uppercase()),
        _ => language,
    }
}

/// Picks the voice used for pronunciation: a female US English voice, then
/// Samantha, then Google US English, then any US English voice.
pub fn select_voice(voices: &[Voice]) -> Option<&Voice> {
    let us_english: Vec<&Voice> = voices.iter().filter(|v| v.is_us_english()).collect();

    us_english
        .iter()
        .find(|v| v.is_female())
        .or_else(|| {
            PREFERRED_VOICES
                .iter()
                .find_map(|name| us_english.iter().find(|v| v.name.contains(name)))
        })
        .or_else(|| us_english.first())
        .copied()
}

/// A text to speech backend.
pub trait SpeechEngine: Send {
    fn voices(&self) -> Vec<Voice>;
    fn speak(&mut self, text: &str, voice: &Voice) -> Result<(), WordflashError>;
}

/// Best-effort pronunciation. Without an engine, or without a usable
/// voice, words are skipped silently.
#[derive(Default)]
pub struct Pronouncer {
    engine: Option<Box<dyn SpeechEngine>>,
    voice: Option<Voice>,
}

impl Pronouncer {
    pub fn new(engine: Box<dyn SpeechEngine>) -> Self {
        let voices = engine.voices();
        log::debug!("[Speech] Available voices: {:?}", voices);

        let voice = select_voice(&voices).cloned();
        match &voice {
            Some(v) => log::info!("[Speech] Using voice {} ({})", v.name, v.lang),
            None => log::info!("[Speech] No {} voice available, pronunciation disabled", PRONUNCIATION_LANG),
        }

        Self { engine: Some(engine), voice }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn voice(&self) -> Option<&Voice> {
        self.voice.as_ref()
    }

    pub fn pronounce(&mut self, word: &str) {
        let (Some(engine), Some(voice)) = (self.engine.as_mut(), self.voice.as_ref()) else {
            return;
        };

        if let Err(e) = engine.speak(word, voice) {
            log::debug!("[Speech] Failed to pronounce {:?}: {}", word, e);
        }
    }
}
