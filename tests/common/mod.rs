//! Scripted in-memory backend shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use krishi_mitra::{FailureKind, ImageAttachment, ModelBackend, ProviderError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// How a model responds to every call.
#[derive(Debug, Clone)]
pub enum Behavior {
    Answer(String),
    Fail(FailureKind),
    Hang,
}

/// One recorded call.
#[derive(Debug, Clone)]
pub struct Call {
    pub model: String,
    pub prompt: String,
    pub image: Option<ImageAttachment>,
}

#[derive(Default)]
pub struct ScriptedBackend {
    behaviors: HashMap<String, Behavior>,
    detected_code: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, model: &str, text: &str) -> Self {
        self.behaviors
            .insert(model.to_string(), Behavior::Answer(text.to_string()));
        self
    }

    pub fn fail(mut self, model: &str, kind: FailureKind) -> Self {
        self.behaviors.insert(model.to_string(), Behavior::Fail(kind));
        self
    }

    /// Answer language-detection prompts with `code` instead of the model's
    /// scripted text.
    pub fn detects(mut self, code: &str) -> Self {
        self.detected_code = Some(code.to_string());
        self
    }

    pub fn hang(mut self, model: &str) -> Self {
        self.behaviors.insert(model.to_string(), Behavior::Hang);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_models(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.model).collect()
    }
}

/// A provider error that classifies as `kind`.
pub fn error_for(kind: FailureKind) -> ProviderError {
    match kind {
        FailureKind::RateLimited => ProviderError::Http {
            status: 429,
            body: "RESOURCE_EXHAUSTED: Quota exceeded".to_string(),
        },
        FailureKind::NotFound => ProviderError::Http {
            status: 404,
            body: "NOT_FOUND: model is not found".to_string(),
        },
        FailureKind::Transient => ProviderError::Timeout("deadline elapsed".to_string()),
        FailureKind::Unknown => ProviderError::Other("unexpected payload".to_string()),
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(Call {
            model: model.to_string(),
            prompt: prompt.to_string(),
            image: image.cloned(),
        });

        match self.behaviors.get(model) {
            Some(Behavior::Answer(text)) => match &self.detected_code {
                Some(code) if prompt.starts_with("Detect the language") => Ok(code.clone()),
                _ => Ok(text.clone()),
            },
            Some(Behavior::Fail(kind)) => Err(error_for(*kind)),
            Some(Behavior::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok("too late".to_string())
            }
            None => Err(error_for(FailureKind::NotFound)),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
