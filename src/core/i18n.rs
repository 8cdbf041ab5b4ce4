//! # Localization
//!
//! Every user-facing string goes through a [`Phrase`] so the whole UI can be
//! switched between Turkish and English from config or the CLI.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Language {
    #[serde(rename = "tr")]
    #[value(name = "tr")]
    Turkish,
    #[serde(rename = "en")]
    #[value(name = "en")]
    #[default]
    English,
}

impl Language {
    /// Parses `tr`/`en` (case-insensitive), as used by env vars.
    pub fn parse(code: &str) -> Option<Language> {
        match code.trim().to_ascii_lowercase().as_str() {
            "tr" => Some(Language::Turkish),
            "en" => Some(Language::English),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Turkish => "tr",
            Language::English => "en",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phrase {
    Title,
    Subtitle,
    Placeholder,
    Send,
    Thinking,
    CloseHint,
    You,
    Assistant,
    ErrorNetwork,
    ErrorApiConnection,
}

impl Phrase {
    pub fn text(self, lang: Language) -> &'static str {
        use Language::{English, Turkish};
        match (self, lang) {
            (Phrase::Title, _) => "Flowchat",
            (Phrase::Subtitle, English) => "Ask anything. Your flow is listening.",
            (Phrase::Subtitle, Turkish) => "Her şeyi sorun. Akışınız dinliyor.",
            (Phrase::Placeholder, English) => "Type your message...",
            (Phrase::Placeholder, Turkish) => "Mesajınızı yazın...",
            (Phrase::Send, English) => "Enter to send",
            (Phrase::Send, Turkish) => "Göndermek için Enter",
            (Phrase::Thinking, English) => "Thinking",
            (Phrase::Thinking, Turkish) => "Düşünüyor",
            (Phrase::CloseHint, English) => "Esc to close",
            (Phrase::CloseHint, Turkish) => "Kapatmak için Esc",
            (Phrase::You, English) => "you",
            (Phrase::You, Turkish) => "siz",
            (Phrase::Assistant, English) => "assistant",
            (Phrase::Assistant, Turkish) => "asistan",
            (Phrase::ErrorNetwork, English) => {
                "Could not reach the server. Please check your internet connection and try again."
            }
            (Phrase::ErrorNetwork, Turkish) => {
                "Sunucuya bağlanılamadı. Lütfen internet bağlantınızı kontrol edin ve tekrar deneyin."
            }
            (Phrase::ErrorApiConnection, English) => {
                "Sorry, something went wrong while talking to the assistant. Please try again."
            }
            (Phrase::ErrorApiConnection, Turkish) => {
                "Üzgünüz, asistanla iletişim kurulurken bir hata oluştu. Lütfen tekrar deneyin."
            }
        }
    }
}

/// Units used when formatting response times.
pub(crate) fn duration_units(lang: Language) -> (&'static str, &'static str) {
    match lang {
        Language::English => ("m", "s"),
        Language::Turkish => ("d", "sn"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_codes_case_insensitively() {
        assert_eq!(Language::parse("TR"), Some(Language::Turkish));
        assert_eq!(Language::parse(" en "), Some(Language::English));
        assert_eq!(Language::parse("de"), None);
    }

    #[test]
    fn error_phrases_differ_per_language() {
        assert_ne!(
            Phrase::ErrorNetwork.text(Language::English),
            Phrase::ErrorNetwork.text(Language::Turkish)
        );
        assert_ne!(
            Phrase::ErrorNetwork.text(Language::English),
            Phrase::ErrorApiConnection.text(Language::English)
        );
    }

    #[test]
    fn language_toml_codes() {
        #[derive(Deserialize)]
        struct Wrapper {
            language: Language,
        }
        let w: Wrapper = toml::from_str("language = \"tr\"").unwrap();
        assert_eq!(w.language, Language::Turkish);
        assert_eq!(w.language.code(), "tr");
    }
}
