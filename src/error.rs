//! Error types for ctxwindow.

/// Errors that can occur while configuring a splitter or a context budget.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// Overlap is not smaller than the chunk size.
    #[error("chunk overlap {overlap} must be smaller than chunk size {size}")]
    OverlapExceedsSize {
        /// The chunk size.
        size: usize,
        /// The overlap that reached or exceeded the size.
        overlap: usize,
    },

    /// The separator list was empty.
    #[error("separator list must not be empty")]
    NoSeparators,

    /// Prompt and response reservations leave no room for document text.
    #[error("reserved {reserved} tokens leave no room in a {max_context}-token context window")]
    BudgetExhausted {
        /// The model's context window.
        max_context: usize,
        /// Tokens reserved for the prompt and the response.
        reserved: usize,
    },

    /// No tokenizer or context window is known for this model.
    #[error("unknown model: {0}")]
    UnknownModel(String),
}

/// Result type for ctxwindow operations.
pub type Result<T> = std::result::Result<T, Error>;
