//! Model roster
//!
//! Ordered candidate list with a rotation cursor. The cursor only moves when
//! an attempt fails; see [`FallbackController`](crate::FallbackController).

use crate::error::ConfigError;

/// Ordered, non-empty list of model identifiers plus the index of the next
/// candidate to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRoster {
    models: Vec<String>,
    cursor: usize,
}

impl ModelRoster {
    /// Build a roster with the cursor at the first model.
    ///
    /// Fails with [`ConfigError::EmptyRoster`] when `models` is empty.
    pub fn new<I, S>(models: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let models: Vec<String> = models.into_iter().map(Into::into).collect();
        if models.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        Ok(Self { models, cursor: 0 })
    }

    /// The model the next attempt will use.
    pub fn current(&self) -> &str {
        &self.models[self.cursor]
    }

    /// Rotate to the next candidate, wrapping at the end.
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.models.len();
    }

    pub fn size(&self) -> usize {
        self.models.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Fresh copy of this roster with the cursor back at the first model.
    pub fn reset(&self) -> Self {
        Self {
            models: self.models.clone(),
            cursor: 0,
        }
    }
}
