//! Sizing chunks from a model's context window.
//!
//! A chunk does not get the whole window. The prompt around it and the
//! model's answer need room too:
//!
//! ```text
//! |<------------------- max_context (4096) ------------------->|
//! | prompt (500) | chunk (3096 tokens ≈ 12 384 chars) | reply (500) |
//! ```
//!
//! Characters per token is a rough conversion (about 4 for English).

use serde::{Deserialize, Serialize};

use crate::{Error, ModelTable, Result, SplitConfig};

/// Token budget for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBudget {
    /// The model's context window in tokens.
    pub max_context: usize,
    /// Tokens kept free for instructions around the chunk.
    pub reserved_for_prompt: usize,
    /// Tokens kept free for the model's answer.
    pub reserved_for_response: usize,
    /// Characters per token used to convert to a character budget.
    pub chars_per_token: usize,
}

impl ContextBudget {
    /// Budget for a window of `max_context` tokens with the default reservations.
    #[must_use]
    pub fn new(max_context: usize) -> Self {
        Self {
            max_context,
            ..Self::default()
        }
    }

    /// Budget for a model in `table`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownModel`] if the table has no entry for `model`.
    pub fn for_model(table: &ModelTable, model: &str) -> Result<Self> {
        table
            .limit(model)
            .map(Self::new)
            .ok_or_else(|| Error::UnknownModel(model.to_string()))
    }

    /// Set the prompt and response reservations.
    #[must_use]
    pub fn reserve(mut self, prompt: usize, response: usize) -> Self {
        self.reserved_for_prompt = prompt;
        self.reserved_for_response = response;
        self
    }

    /// Tokens left for document text.
    ///
    /// # Errors
    ///
    /// [`Error::BudgetExhausted`] if the reservations fill the window.
    ///
    /// ```rust
    /// use ctxwindow::ContextBudget;
    ///
    /// assert_eq!(ContextBudget::default().available_tokens().unwrap(), 3096);
    /// assert!(ContextBudget::new(800).available_tokens().is_err());
    /// ```
    pub fn available_tokens(&self) -> Result<usize> {
        let reserved = self
            .reserved_for_prompt
            .saturating_add(self.reserved_for_response);
        match self.max_context.checked_sub(reserved) {
            Some(available) if available > 0 => Ok(available),
            _ => Err(Error::BudgetExhausted {
                max_context: self.max_context,
                reserved,
            }),
        }
    }

    /// Recommended chunk size in characters, saturating at `usize::MAX`.
    pub fn chunk_size_chars(&self) -> Result<usize> {
        Ok(self.available_tokens()?.saturating_mul(self.chars_per_token))
    }

    /// A validated character-based splitter configuration for this budget.
    pub fn split_config(&self, chunk_overlap: usize) -> Result<SplitConfig> {
        let config = SplitConfig::new(self.chunk_size_chars()?, chunk_overlap);
        config.validate()?;
        Ok(config)
    }

    /// A validated configuration with `chunk_size` in tokens, for splitters
    /// built with [`TokenSizer`](crate::TokenSizer).
    pub fn token_split_config(&self, chunk_overlap: usize) -> Result<SplitConfig> {
        let config = SplitConfig::new(self.available_tokens()?, chunk_overlap);
        config.validate()?;
        Ok(config)
    }
}

impl Default for ContextBudget {
    fn default() -> Self {
        Self {
            max_context: 4096,
            reserved_for_prompt: 500,
            reserved_for_response: 500,
            chars_per_token: 4,
        }
    }
}
