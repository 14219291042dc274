//! Voice Command Responder
//!
//! A lookup table, not a parser: the command is lowercased and checked for
//! keyword substrings group by group, in a fixed order. The first group that
//! matches picks the canned response.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Speech rate used for all spoken output
pub const SPEECH_RATE: f32 = 0.9;

/// UI languages with a speech locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Kn,
    Ta,
    Te,
    Ml,
    Bn,
    Mr,
    Gu,
    Pa,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[
            Language::En,
            Language::Hi,
            Language::Kn,
            Language::Ta,
            Language::Te,
            Language::Ml,
            Language::Bn,
            Language::Mr,
            Language::Gu,
            Language::Pa,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Kn => "kn",
            Language::Ta => "ta",
            Language::Te => "te",
            Language::Ml => "ml",
            Language::Bn => "bn",
            Language::Mr => "mr",
            Language::Gu => "gu",
            Language::Pa => "pa",
        }
    }

    /// BCP 47 tag handed to speech recognition and synthesis
    pub fn speech_tag(&self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Hi => "hi-IN",
            Language::Kn => "kn-IN",
            Language::Ta => "ta-IN",
            Language::Te => "te-IN",
            Language::Ml => "ml-IN",
            Language::Bn => "bn-IN",
            Language::Mr => "mr-IN",
            Language::Gu => "gu-IN",
            Language::Pa => "pa-IN",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Language::all()
            .iter()
            .copied()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| format!("Unsupported language: {}", s))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Speech tag for an arbitrary language code; unknown codes speak en-US
pub fn speech_tag_for(code: &str) -> &'static str {
    code.parse::<Language>()
        .map(|lang| lang.speech_tag())
        .unwrap_or("en-US")
}

/// What a command was understood to be about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Weather,
    Route,
    Traffic,
    Pollution,
    Fallback,
}

/// Keyword groups in match order
const KEYWORD_GROUPS: &[(Topic, &[&str])] = &[
    (Topic::Weather, &["weather", "मौसम"]),
    (Topic::Route, &["route", "navigate", "रास्ता"]),
    (Topic::Traffic, &["traffic", "यातायात"]),
    (Topic::Pollution, &["pollution", "co2", "प्रदूषण"]),
];

/// Map a free-text command to its topic
pub fn classify(command: &str) -> Topic {
    let command = command.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| command.contains(k)))
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::Fallback)
}

/// A canned answer to a voice command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceReply {
    pub response: String,
    pub topic: Topic,
    pub source: String,
    pub language: Language,
}

/// Rule-based responder
#[derive(Debug, Clone, Copy, Default)]
pub struct VoiceResponder;

impl VoiceResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn respond(&self, command: &str, language: Language) -> VoiceReply {
        let topic = classify(command);
        VoiceReply {
            response: response_text(topic, language).to_string(),
            topic,
            source: "rules".to_string(),
            language,
        }
    }
}

/// Languages without their own table answer in English
fn response_text(topic: Topic, language: Language) -> &'static str {
    match (language, topic) {
        (Language::Hi, Topic::Weather) => {
            "मौसम सुखद है और वायु गुणवत्ता अच्छी है। पर्यावरण-अनुकूल यात्रा के लिए बिल्कुल सही!"
        }
        (Language::Hi, Topic::Route) => "मैं आपको सबसे हरा रास्ता खोजने में मदद कर सकता हूं।",
        (Language::Hi, Topic::Traffic) => "यातायात मध्यम है। मैं इको रूट की सिफारिश करता हूं।",
        (Language::Hi, Topic::Pollution) => {
            "इको रूट पारंपरिक मार्गों की तुलना में CO2 उत्सर्जन को 60% कम करता है।"
        }
        (Language::Hi, Topic::Fallback) => "मैं आज आपकी हरित यात्रा में कैसे मदद कर सकता हूं?",

        (Language::Kn, Topic::Weather) => "ಹವಾಮಾನ ಆಹ್ಲಾದಕರವಾಗಿದೆ ಮತ್ತು ವಾಯು ಗುಣಮಟ್ಟ ಉತ್ತಮವಾಗಿದೆ!",
        (Language::Kn, Topic::Route) => "ನಾನು ನಿಮಗೆ ಹಸಿರು ಮಾರ್ಗವನ್ನು ಹುಡುಕಲು ಸಹಾಯ ಮಾಡಬಹುದು।",
        (Language::Kn, Topic::Traffic) => "ಸಂಚಾರ ಮಧ್ಯಮವಾಗಿದೆ। ನಾನು ಇಕೋ ಮಾರ್ಗವನ್ನು ಶಿಫಾರಸು ಮಾಡುತ್ತೇನೆ।",
        (Language::Kn, Topic::Pollution) => {
            "ಇಕೋ ಮಾರ್ಗವು ಸಾಂಪ್ರದಾಯಿಕ ಮಾರ್ಗಗಳಿಗಿಂತ CO2 ಹೊರಸೂಸುವಿಕೆಯನ್ನು 60% ರಷ್ಟು ಕಡಿಮೆ ಮಾಡುತ್ತದೆ।"
        }
        (Language::Kn, Topic::Fallback) => "ನಾನು ಇಂದು ನಿಮ್ಮ ಹಸಿರು ಪ್ರಯಾಣದಲ್ಲಿ ಹೇಗೆ ಸಹಾಯ ಮಾಡಬಹುದು?",

        (_, Topic::Weather) => {
            "Current weather is 28 degrees Celsius, partly cloudy with good air quality."
        }
        (_, Topic::Route) => {
            "Please enter your destination on the left panel to find eco-friendly routes."
        }
        (_, Topic::Traffic) => {
            "Heavy traffic detected at Connaught Place. Moderate traffic at India Gate."
        }
        (_, Topic::Pollution) => {
            "Current CO2 level is 420 parts per million. Eco route will reduce emissions by 60%."
        }
        (_, Topic::Fallback) => "How can I assist you with navigation today?",
    }
}

/// A request to speak `text` aloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub rate: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            lang: language.speech_tag().to_string(),
            rate: SPEECH_RATE,
        }
    }
}
