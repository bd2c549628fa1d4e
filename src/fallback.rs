//! Fallback controller
//!
//! Tries roster candidates in rotation until one answers or every candidate
//! has failed once for this request.
//!
//! Policy:
//! - a success leaves the cursor where it is, so the working model stays
//!   preferred for the next request
//! - every failure advances the cursor, whatever its [`FailureKind`]
//! - rotation is strict round-robin in roster order

use crate::dispatch::{FailureKind, GenerationOutcome, GenerationRequest, RequestDispatcher};
use crate::roster::ModelRoster;
use serde::Serialize;
use tracing::{error, info, warn};

/// Prefix shared by every rendered failure, so presentation layers that only
/// deal in strings can still tell it apart from a model answer.
pub const ERROR_PREFIX: &str = "Error:";

/// Text rendered when all candidates failed.
pub const EXHAUSTION_MESSAGE: &str = "Error: All models failed. Please try again later.";

/// One failed attempt within a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedAttempt {
    pub model: String,
    pub kind: FailureKind,
    pub detail: String,
}

/// Result of a logical request across the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Generation {
    /// A model answered.
    Answer { text: String, model: String },
    /// Every candidate failed once.
    Exhausted { attempts: Vec<FailedAttempt> },
}

impl Generation {
    pub fn is_answer(&self) -> bool {
        matches!(self, Generation::Answer { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Generation::Answer { text, .. } => Some(text),
            Generation::Exhausted { .. } => None,
        }
    }

    /// Render for a string-only presentation layer: the answer text, or
    /// [`EXHAUSTION_MESSAGE`].
    pub fn render(&self) -> String {
        match self {
            Generation::Answer { text, .. } => text.clone(),
            Generation::Exhausted { .. } => EXHAUSTION_MESSAGE.to_string(),
        }
    }
}

/// Drives a [`RequestDispatcher`] across a [`ModelRoster`].
///
/// The roster is passed in rather than owned, so its lifetime is whatever the
/// caller chooses (one per session, one per request). `&mut` access means
/// two requests can never rotate the same roster at once.
#[derive(Clone)]
pub struct FallbackController {
    dispatcher: RequestDispatcher,
}

impl FallbackController {
    pub fn new(dispatcher: RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    /// Run `request` against the roster, starting at its current cursor.
    ///
    /// Performs at most `roster.size()` dispatches.
    pub async fn generate(
        &self,
        roster: &mut ModelRoster,
        request: &GenerationRequest,
    ) -> Generation {
        let total = roster.size();
        let mut attempts = Vec::with_capacity(total);

        while attempts.len() < total {
            let model = roster.current().to_string();

            match self.dispatcher.dispatch(&model, request).await {
                GenerationOutcome::Success(text) => {
                    if !attempts.is_empty() {
                        info!(model = %model, failed = attempts.len(), "fallback model answered");
                    }
                    return Generation::Answer { text, model };
                }
                GenerationOutcome::Failure { kind, detail } => {
                    warn!(model = %model, %kind, %detail, "model attempt failed, rotating");
                    roster.advance();
                    attempts.push(FailedAttempt {
                        model,
                        kind,
                        detail,
                    });
                }
            }
        }

        error!(
            provider = self.dispatcher.backend_name(),
            attempts = attempts.len(),
            "all models failed"
        );
        Generation::Exhausted { attempts }
    }

    /// [`generate`](Self::generate) rendered to a display string.
    pub async fn generate_text(
        &self,
        roster: &mut ModelRoster,
        request: &GenerationRequest,
    ) -> String {
        self.generate(roster, request).await.render()
    }
}
