//! Krishi Mitra Gateway
//!
//! Resilient multi-model gateway behind the Krishi Mitra farming advisor.
//! Every advisory request goes through a [`FallbackController`], which walks
//! an ordered [`ModelRoster`] until a model answers or every candidate has
//! failed once.
//!
//! # Example
//!
//! ```no_run
//! use krishi_mitra::{gemini_controller, AdvisorySession, GatewayConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GatewayConfig::from_env()?;
//! let controller = Arc::new(gemini_controller(&config)?);
//! let mut session = AdvisorySession::new(controller, config.roster()?);
//!
//! let advice = session.ask("When should I sow soybean in Vidarbha?").await;
//! println!("[{}] {}", advice.language, advice.generation.render());
//! # Ok(())
//! # }
//! ```

mod advisor;
mod config;
mod dispatch;
mod error;
mod fallback;
mod gemini;
mod language;
pub mod prompts;
mod provider;
mod roster;

pub use advisor::{Advice, AdvisorySession};
pub use config::{DEFAULT_BASE_URL, DEFAULT_MODELS, GatewayConfig};
pub use dispatch::{
    DEFAULT_ATTEMPT_TIMEOUT, FailureKind, GenerationOutcome, GenerationRequest, RequestDispatcher,
};
pub use error::{ConfigError, ImageError, ProviderError};
pub use fallback::{ERROR_PREFIX, EXHAUSTION_MESSAGE, FailedAttempt, FallbackController, Generation};
pub use gemini::GeminiClient;
pub use language::{Language, name_of};
pub use provider::{ImageAttachment, MAX_IMAGE_SIZE_MB, ModelBackend};
pub use roster::ModelRoster;

use std::sync::Arc;

/// Build a controller that talks to Gemini with the configured timeout.
pub fn gemini_controller(config: &GatewayConfig) -> Result<FallbackController, ProviderError> {
    let client = GeminiClient::from_config(config)?;
    let dispatcher = RequestDispatcher::with_timeout(Arc::new(client), config.attempt_timeout);
    Ok(FallbackController::new(dispatcher))
}
