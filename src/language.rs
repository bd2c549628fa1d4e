//! Supported response languages and code normalization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language the advisor can answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "mr")]
    Marathi,
    #[serde(rename = "hi")]
    Hindi,
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "gu")]
    Gujarati,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "kn")]
    Kannada,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::Marathi,
        Language::Hindi,
        Language::English,
        Language::Gujarati,
        Language::Tamil,
        Language::Telugu,
        Language::Kannada,
    ];

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::Marathi => "mr",
            Language::Hindi => "hi",
            Language::English => "en",
            Language::Gujarati => "gu",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Kannada => "kn",
        }
    }

    /// English display name, as used inside prompts.
    pub fn name(self) -> &'static str {
        match self {
            Language::Marathi => "Marathi",
            Language::Hindi => "Hindi",
            Language::English => "English",
            Language::Gujarati => "Gujarati",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Kannada => "Kannada",
        }
    }

    /// Exact code lookup, no normalization.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Normalize a raw code (user input or model output) to a supported
    /// language.
    ///
    /// Trims, lower-cases and keeps the first two characters. Missing, empty
    /// or unsupported input yields English.
    pub fn normalize(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Language::English;
        };
        let code: String = raw.trim().to_lowercase().chars().take(2).collect();
        Self::from_code(&code).unwrap_or(Language::English)
    }
}

/// Display name for a code; unknown codes get the English name.
pub fn name_of(code: &str) -> &'static str {
    Language::from_code(code).unwrap_or_default().name()
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    /// Strict parse for user-supplied options: accepts a code or a display
    /// name in any case, rejects anything unsupported.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == needle || lang.name().to_lowercase() == needle)
            .ok_or_else(|| {
                let codes: Vec<&str> = Self::ALL.iter().map(|l| l.code()).collect();
                format!("unsupported language '{}' (expected one of {})", s, codes.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_defaults_to_english() {
        assert_eq!(Language::normalize(Some("")), Language::English);
        assert_eq!(Language::normalize(Some("xx")), Language::English);
        assert_eq!(Language::normalize(Some("zz")), Language::English);
        assert_eq!(Language::normalize(None), Language::English);
    }

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(Language::normalize(Some("HI")), Language::Hindi);
        assert_eq!(Language::normalize(Some("MR")).code(), "mr");
    }

    #[test]
    fn test_normalize_truncates_model_output() {
        assert_eq!(Language::normalize(Some("ta\n")), Language::Tamil);
        assert_eq!(Language::normalize(Some("  kn (Kannada)")), Language::Kannada);
        assert_eq!(Language::normalize(Some("Error: All models failed")), Language::English);
    }

    #[test]
    fn test_normalize_non_ascii_input() {
        assert_eq!(Language::normalize(Some("मराठी")), Language::English);
    }

    #[test]
    fn test_name_of() {
        assert_eq!(name_of("gu"), "Gujarati");
        assert_eq!(name_of("te"), "Telugu");
        assert_eq!(name_of("fr"), "English");
        assert_eq!(name_of(""), "English");
    }

    #[test]
    fn test_from_str_strict() {
        assert_eq!("Hindi".parse::<Language>(), Ok(Language::Hindi));
        assert_eq!("KN".parse::<Language>(), Ok(Language::Kannada));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::Marathi).unwrap(), "\"mr\"");
        let lang: Language = serde_json::from_str("\"te\"").unwrap();
        assert_eq!(lang, Language::Telugu);
    }
}
