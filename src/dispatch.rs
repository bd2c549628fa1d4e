//! Request dispatch
//!
//! One attempt against one model. Provider errors stop here and come out as
//! a classified [`GenerationOutcome::Failure`]; retry policy lives in
//! [`FallbackController`](crate::FallbackController).

use crate::error::ProviderError;
use crate::language::Language;
use crate::provider::{ImageAttachment, ModelBackend};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default per-attempt time budget.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Prompt, optional image and target language for one logical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    image: Option<ImageAttachment>,
    language: Language,
}

impl GenerationRequest {
    /// Text-only request.
    pub fn text(prompt: impl Into<String>, language: Language) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            language,
        }
    }

    /// Prompt plus image, sent as multimodal content.
    pub fn with_image(
        prompt: impl Into<String>,
        image: ImageAttachment,
        language: Language,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            image: Some(image),
            language,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn image(&self) -> Option<&ImageAttachment> {
        self.image.as_ref()
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

/// Why a single attempt failed.
///
/// The controller treats every kind the same way; the kind is recorded for
/// logs and for the exhaustion report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Quota or rate limit hit (HTTP 429, "quota", "exhausted").
    RateLimited,
    /// Model id unknown to or retired by the provider.
    NotFound,
    /// Timeout, 5xx or dropped connection.
    Transient,
    /// Anything else.
    Unknown,
}

impl FailureKind {
    pub const ALL: [FailureKind; 4] = [
        FailureKind::RateLimited,
        FailureKind::NotFound,
        FailureKind::Transient,
        FailureKind::Unknown,
    ];

    /// Classify a provider error.
    pub fn classify(err: &ProviderError) -> Self {
        match err {
            ProviderError::Http { status: 429, .. } => FailureKind::RateLimited,
            ProviderError::Http { status: 404, .. } => FailureKind::NotFound,
            ProviderError::Http { status: 408 | 500..=599, .. } => FailureKind::Transient,
            ProviderError::Http { body, .. } => Self::classify_message(body),
            ProviderError::Timeout(_) | ProviderError::Connection(_) => FailureKind::Transient,
            ProviderError::Decode(_) | ProviderError::EmptyResponse => FailureKind::Unknown,
            ProviderError::Other(message) => Self::classify_message(message),
        }
    }

    /// Classify free-form error text from a provider that exposes no status.
    pub fn classify_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if has_rate_limit_marker(&lower) {
            FailureKind::RateLimited
        } else if ["404", "not found", "not_found", "is not supported"]
            .iter()
            .any(|m| lower.contains(m))
        {
            FailureKind::NotFound
        } else if [
            "timeout",
            "timed out",
            "connection reset",
            "connection refused",
            "unavailable",
            "500",
            "502",
            "503",
            "504",
        ]
        .iter()
        .any(|m| lower.contains(m))
        {
            FailureKind::Transient
        } else {
            FailureKind::Unknown
        }
    }
}

fn has_rate_limit_marker(lower: &str) -> bool {
    ["429", "quota", "exhausted", "rate limit", "rate_limit"]
        .iter()
        .any(|m| lower.contains(m))
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::RateLimited => "rate_limited",
            FailureKind::NotFound => "not_found",
            FailureKind::Transient => "transient",
            FailureKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Result of exactly one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(String),
    Failure { kind: FailureKind, detail: String },
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success(_))
    }
}

/// Sends one request to one model through a [`ModelBackend`].
#[derive(Clone)]
pub struct RequestDispatcher {
    backend: Arc<dyn ModelBackend>,
    attempt_timeout: Duration,
}

impl RequestDispatcher {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self::with_timeout(backend, DEFAULT_ATTEMPT_TIMEOUT)
    }

    pub fn with_timeout(backend: Arc<dyn ModelBackend>, attempt_timeout: Duration) -> Self {
        Self {
            backend,
            attempt_timeout,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Perform a single attempt. Never retries, never panics on provider
    /// errors; an attempt that outlives the timeout is `Transient`.
    pub async fn dispatch(&self, model: &str, request: &GenerationRequest) -> GenerationOutcome {
        debug!(
            provider = self.backend.name(),
            model,
            multimodal = request.image().is_some(),
            "dispatching generation request"
        );

        let call = self
            .backend
            .generate(model, request.prompt(), request.image());

        match tokio::time::timeout(self.attempt_timeout, call).await {
            Ok(Ok(text)) => GenerationOutcome::Success(text),
            Ok(Err(err)) => GenerationOutcome::Failure {
                kind: FailureKind::classify(&err),
                detail: err.to_string(),
            },
            Err(_) => GenerationOutcome::Failure {
                kind: FailureKind::Transient,
                detail: format!(
                    "no response within {}s",
                    self.attempt_timeout.as_secs_f64()
                ),
            },
        }
    }
}
