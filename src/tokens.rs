//! Token counting.
//!
//! Models count tokens, not characters. With the `tokens` feature the count
//! comes from the model's BPE vocabulary (`tiktoken-rs`). Without it, or for
//! a model the tokenizer has never heard of, we fall back to the usual rule
//! of thumb:
//!
//! ```text
//! tokens ≈ words × 1.3
//! ```
//!
//! The estimate is flagged so callers can tell the two apart.

use serde::{Deserialize, Serialize};

/// Tokens per whitespace-separated word in the fallback estimate.
pub const TOKENS_PER_WORD: f64 = 1.3;

/// Estimate tokens from the word count: `round(words × 1.3)`.
///
/// ```rust
/// assert_eq!(ctxwindow::estimate_tokens("hello world"), 3);
/// assert_eq!(ctxwindow::estimate_tokens(""), 0);
/// ```
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    let words = text.split_whitespace().count();
    (words as f64 * TOKENS_PER_WORD).round() as usize
}

/// A token count and how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    /// Number of tokens.
    pub tokens: usize,
    /// `true` when the word-count heuristic was used.
    pub estimated: bool,
}

impl TokenCount {
    /// A heuristic count for `text`.
    #[must_use]
    pub fn estimate(text: &str) -> Self {
        Self {
            tokens: estimate_tokens(text),
            estimated: true,
        }
    }
}

/// Size statistics for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Characters.
    pub chars: usize,
    /// Whitespace-separated words.
    pub words: usize,
    /// Estimated tokens (`round(words × 1.3)`).
    pub estimated_tokens: usize,
}

impl DocumentStats {
    /// Measure `text`.
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self {
            chars: text.chars().count(),
            words: text.split_whitespace().count(),
            estimated_tokens: estimate_tokens(text),
        }
    }

    /// Whether the estimate is over a `context_window`-token limit.
    #[must_use]
    pub fn exceeds(&self, context_window: usize) -> bool {
        self.estimated_tokens > context_window
    }
}

#[cfg(feature = "tokens")]
pub use bpe::{TokenCounter, TokenSizer};

#[cfg(feature = "tokens")]
mod bpe {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex, MutexGuard};

    use tiktoken_rs::CoreBPE;
    use tracing::{debug, warn};

    use super::TokenCount;
    use crate::{ChunkSizer, Error, Result};

    /// Counts tokens with the BPE encoder of a named model.
    ///
    /// Encoders are built on first use and cached per model name; the
    /// counter is cheap to share behind an `Arc`.
    ///
    /// ```rust
    /// use ctxwindow::TokenCounter;
    ///
    /// let counter = TokenCounter::new();
    /// let exact = counter.count("hello world", "gpt-3.5-turbo");
    /// assert_eq!(exact.tokens, 2);
    /// assert!(!exact.estimated);
    ///
    /// let fallback = counter.count("hello world", "no-such-model");
    /// assert_eq!(fallback.tokens, 3);
    /// assert!(fallback.estimated);
    /// ```
    #[derive(Default)]
    pub struct TokenCounter {
        encoders: Mutex<HashMap<String, Arc<CoreBPE>>>,
    }

    impl std::fmt::Debug for TokenCounter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            let cached = self.encoders.lock().map(|m| m.len()).unwrap_or_default();
            f.debug_struct("TokenCounter")
                .field("cached_encoders", &cached)
                .finish()
        }
    }

    impl TokenCounter {
        /// Create a counter with an empty encoder cache.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// The encoder for `model`.
        ///
        /// # Errors
        ///
        /// [`Error::UnknownModel`] if the tokenizer has no vocabulary for it.
        ///
        /// The vocabulary is built outside the cache lock; if two callers race
        /// on the same model, the first one cached wins.
        pub fn encoder(&self, model: &str) -> Result<Arc<CoreBPE>> {
            if let Some(bpe) = self.cache().get(model) {
                return Ok(Arc::clone(bpe));
            }

            let bpe = tiktoken_rs::get_bpe_from_model(model)
                .map(Arc::new)
                .map_err(|_| Error::UnknownModel(model.to_string()))?;
            debug!(model, "loaded BPE encoder");
            let mut cache = self.cache();
            Ok(Arc::clone(cache.entry(model.to_string()).or_insert(bpe)))
        }

        /// Whether the encoder for `model` is already loaded.
        pub fn is_cached(&self, model: &str) -> bool {
            self.cache().contains_key(model)
        }

        fn cache(&self) -> MutexGuard<'_, HashMap<String, Arc<CoreBPE>>> {
            self.encoders
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }

        /// Count tokens in `text` for `model`, estimating if the model is unknown.
        pub fn count(&self, text: &str, model: &str) -> TokenCount {
            match self.encoder(model) {
                Ok(bpe) => TokenCount {
                    tokens: bpe.encode_with_special_tokens(text).len(),
                    estimated: false,
                },
                Err(err) => {
                    warn!(%err, "falling back to word-count token estimate");
                    TokenCount::estimate(text)
                }
            }
        }
    }

    /// Measures chunk sizes in BPE tokens.
    ///
    /// ```rust
    /// use ctxwindow::{Chunker, RecursiveSplitter, SplitConfig, TokenSizer};
    ///
    /// let sizer = TokenSizer::for_model("gpt-4").unwrap();
    /// let splitter = RecursiveSplitter::with_sizer(SplitConfig::new(8, 2), sizer).unwrap();
    /// let chunks = splitter.chunk("The quick brown fox jumps over the lazy dog again and again.");
    /// assert!(chunks.len() > 1);
    /// ```
    #[derive(Clone)]
    pub struct TokenSizer {
        model: String,
        bpe: Arc<CoreBPE>,
    }

    impl std::fmt::Debug for TokenSizer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("TokenSizer")
                .field("model", &self.model)
                .finish_non_exhaustive()
        }
    }

    impl TokenSizer {
        /// Sizer using the vocabulary of `model`.
        ///
        /// # Errors
        ///
        /// [`Error::UnknownModel`] if the tokenizer has no vocabulary for it.
        pub fn for_model(model: &str) -> Result<Self> {
            let bpe = tiktoken_rs::get_bpe_from_model(model)
                .map_err(|_| Error::UnknownModel(model.to_string()))?;
            Ok(Self {
                model: model.to_string(),
                bpe: Arc::new(bpe),
            })
        }

        /// Sizer sharing an encoder already loaded by a [`TokenCounter`].
        pub fn from_counter(counter: &TokenCounter, model: &str) -> Result<Self> {
            Ok(Self {
                model: model.to_string(),
                bpe: counter.encoder(model)?,
            })
        }

        /// The model whose vocabulary is used.
        #[must_use]
        pub fn model(&self) -> &str {
            &self.model
        }
    }

    impl ChunkSizer for TokenSizer {
        fn size(&self, text: &str) -> usize {
            self.bpe.encode_ordinary(text).len()
        }
    }

}
