//! Prompt construction for each advisory task.
//!
//! Pure string building; every function takes the display name of the answer
//! language (see [`Language::name`](crate::Language::name)).

use crate::language::Language;
use once_cell::sync::Lazy;

/// "mr (Marathi), hi (Hindi), ..." built once from the supported set.
static SUPPORTED_CODES: Lazy<String> = Lazy::new(|| {
    Language::ALL
        .iter()
        .map(|lang| format!("{} ({})", lang.code(), lang.name()))
        .collect::<Vec<_>>()
        .join(", ")
});

fn supported_codes() -> &'static str {
    &SUPPORTED_CODES
}

/// Ask the model for the ISO 639-1 code of `text`, restricted to the
/// supported set.
pub fn language_detection_prompt(text: &str) -> String {
    format!(
        r#"Detect the language of the following text and respond with ONLY the
ISO 639-1 language code.
Supported codes: {codes}.
If uncertain, default to 'en'.

Text: "{text}"

Respond with only the 2-letter code."#,
        codes = supported_codes(),
        text = text
    )
}

/// Farming Q&A answered only in `language_name`.
pub fn advisory_prompt(query: &str, language_name: &str) -> String {
    format!(
        r#"You are Krishi Mitra, an expert agricultural advisor for Indian farmers.
Respond ONLY in {language_name} language.
Give practical, actionable advice suited to small and marginal farmers.

Farmer's Question: {query}"#
    )
}

/// Structured crop photo report. An empty `context` is rendered as "None".
pub fn image_analysis_prompt(context: &str, language_name: &str) -> String {
    let context = match context.trim() {
        "" => "None",
        c => c,
    };
    format!(
        r#"You are an agricultural expert. Analyze this crop image.
Respond in {language_name} language.

Farmer's context: {context}

Provide:
1. Crop identification
2. Health assessment
3. Disease/Pest detection
4. Treatment recommendations
5. Care tips"#
    )
}

/// Lifecycle, season and economics overview for one crop.
pub fn knowledge_prompt(crop_name: &str, language_name: &str) -> String {
    format!(
        r#"You are an agricultural expert. Provide complete information about {crop_name}.
Respond entirely in {language_name} language.

Include:
- Crop overview
- Complete lifecycle
- Seasonal calendar
- Input requirements
- Economics
- Best practices"#
    )
}

/// Government scheme lookup.
pub fn scheme_prompt(query: &str, language_name: &str) -> String {
    format!(
        r#"You are a government scheme expert for Indian agriculture.
Respond in {language_name} language.

Query: {query}

Provide:
- Scheme overview
- Eligibility criteria
- Benefits
- Application process
- Contact information"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_prompt_lists_supported_codes() {
        let prompt = language_detection_prompt("माझ्या पिकाला पाणी किती द्यावे?");
        assert!(prompt.contains("माझ्या पिकाला"));
        for lang in Language::ALL {
            assert!(prompt.contains(&format!("{} ({})", lang.code(), lang.name())));
        }
        assert!(prompt.contains("2-letter code"));
    }

    #[test]
    fn test_advisory_prompt_names_language() {
        let prompt = advisory_prompt("When to sow soybean?", "Marathi");
        assert!(prompt.contains("Respond ONLY in Marathi language"));
        assert!(prompt.contains("When to sow soybean?"));
    }

    #[test]
    fn test_image_prompt_sections() {
        let prompt = image_analysis_prompt("", "Hindi");
        assert!(prompt.contains("Hindi"));
        assert!(prompt.contains("Farmer's context: None"));
        for section in [
            "Crop identification",
            "Health assessment",
            "Disease/Pest detection",
            "Treatment recommendations",
            "Care tips",
        ] {
            assert!(prompt.contains(section), "missing section {section}");
        }
    }

    #[test]
    fn test_image_prompt_keeps_context() {
        let prompt = image_analysis_prompt("yellow spots on lower leaves", "English");
        assert!(prompt.contains("Farmer's context: yellow spots on lower leaves"));
    }

    #[test]
    fn test_knowledge_prompt_sections() {
        let prompt = knowledge_prompt("Cotton", "Gujarati");
        assert!(prompt.contains("about Cotton"));
        assert!(prompt.contains("Gujarati"));
        assert!(prompt.contains("Complete lifecycle"));
        assert!(prompt.contains("Seasonal calendar"));
        assert!(prompt.contains("Economics"));
    }

    #[test]
    fn test_scheme_prompt_sections() {
        let prompt = scheme_prompt("PM-KISAN", "Tamil");
        assert!(prompt.contains("Query: PM-KISAN"));
        for section in [
            "Scheme overview",
            "Eligibility criteria",
            "Benefits",
            "Application process",
            "Contact information",
        ] {
            assert!(prompt.contains(section));
        }
    }
}
