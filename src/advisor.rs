//! Advisory session
//!
//! The farmer-facing tasks (Q&A, crop photo analysis, crop knowledge,
//! scheme lookup), each one prompt through the fallback controller.

use crate::dispatch::GenerationRequest;
use crate::fallback::{FallbackController, Generation};
use crate::language::Language;
use crate::prompts;
use crate::provider::ImageAttachment;
use crate::roster::ModelRoster;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// An answer together with the language it was requested in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub language: Language,
    #[serde(flatten)]
    pub generation: Generation,
}

/// One user's session: a shared controller plus a roster of its own.
///
/// The roster keeps its cursor across calls, so a model that answered stays
/// first choice for this session until it fails.
pub struct AdvisorySession {
    controller: Arc<FallbackController>,
    roster: ModelRoster,
}

impl AdvisorySession {
    pub fn new(controller: Arc<FallbackController>, roster: ModelRoster) -> Self {
        Self { controller, roster }
    }

    pub fn roster(&self) -> &ModelRoster {
        &self.roster
    }

    async fn run(&mut self, request: GenerationRequest) -> Generation {
        self.controller.generate(&mut self.roster, &request).await
    }

    /// Detect the language of `text`. Falls back to English on empty input,
    /// unsupported codes and exhaustion.
    pub async fn detect_language(&mut self, text: &str) -> Language {
        if text.trim().is_empty() {
            return Language::English;
        }
        let request =
            GenerationRequest::text(prompts::language_detection_prompt(text), Language::English);
        let detected = Language::normalize(self.run(request).await.text());
        debug!(language = %detected, "detected input language");
        detected
    }

    pub async fn farming_answer(&mut self, query: &str, language: Language) -> Generation {
        let prompt = prompts::advisory_prompt(query, language.name());
        self.run(GenerationRequest::text(prompt, language)).await
    }

    pub async fn analyze_crop_image(
        &mut self,
        image: ImageAttachment,
        context: &str,
        language: Language,
    ) -> Generation {
        let prompt = prompts::image_analysis_prompt(context, language.name());
        self.run(GenerationRequest::with_image(prompt, image, language))
            .await
    }

    pub async fn crop_knowledge(&mut self, crop_name: &str, language: Language) -> Generation {
        let prompt = prompts::knowledge_prompt(crop_name, language.name());
        self.run(GenerationRequest::text(prompt, language)).await
    }

    pub async fn scheme_info(&mut self, query: &str, language: Language) -> Generation {
        let prompt = prompts::scheme_prompt(query, language.name());
        self.run(GenerationRequest::text(prompt, language)).await
    }

    /// Answer a farming question in the language it was asked in.
    pub async fn ask(&mut self, query: &str) -> Advice {
        let language = self.detect_language(query).await;
        let generation = self.farming_answer(query, language).await;
        Advice {
            language,
            generation,
        }
    }

    /// Crop knowledge in the language the crop name was typed in.
    pub async fn ask_knowledge(&mut self, crop_name: &str) -> Advice {
        let language = self.detect_language(crop_name).await;
        let generation = self.crop_knowledge(crop_name, language).await;
        Advice {
            language,
            generation,
        }
    }

    /// Scheme information in the language of the query.
    pub async fn ask_scheme(&mut self, query: &str) -> Advice {
        let language = self.detect_language(query).await;
        let generation = self.scheme_info(query, language).await;
        Advice {
            language,
            generation,
        }
    }

    /// Image analysis in the language of the farmer's context note, English
    /// when there is none.
    pub async fn ask_about_image(&mut self, image: ImageAttachment, context: &str) -> Advice {
        let language = self.detect_language(context).await;
        let generation = self.analyze_crop_image(image, context, language).await;
        Advice {
            language,
            generation,
        }
    }
}
