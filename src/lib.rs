//! # ctxwindow
//!
//! Fitting long documents into LLM context windows.
//!
//! ## The Problem
//!
//! A model accepts a fixed number of tokens per request. A 50-page report
//! does not fit in 4096 of them, so it has to be cut into chunks, and the
//! cuts matter:
//!
//! - A chunk cut mid-word is noise
//! - A chunk cut mid-paragraph loses its argument
//! - Without overlap, a fact straddling a cut is lost to both sides
//!
//! ## Recursive Splitting
//!
//! Try the coarsest boundary first and only go finer where a piece is still
//! too large:
//!
//! ```text
//! Separators: ["\n\n", "\n", " ", ""]
//!
//! 1. Split on "\n\n" (paragraphs)
//! 2. Any piece > chunk_size? Split that piece on "\n" (lines)
//! 3. Still too large? Split on " " (words)
//! 4. Still too large? Split on "" (characters)
//! 5. Merge neighbouring pieces up to chunk_size, repeating the tail of
//!    each chunk (<= chunk_overlap) at the head of the next
//! ```
//!
//! Chunks are measured in characters by default. Plug in a
//! [`ChunkSizer`] to measure in bytes or, with the `tokens` feature, in
//! model tokens ([`TokenSizer`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use ctxwindow::{Chunker, RecursiveSplitter, SplitConfig};
//!
//! let text = "Context windows are finite.\n\nDocuments are not. \
//!             Split them with overlap so nothing falls between chunks.";
//!
//! let splitter = RecursiveSplitter::new(SplitConfig::new(40, 10)).unwrap();
//! let chunks = splitter.chunk(text);
//!
//! assert!(chunks.len() > 1);
//! assert!(chunks.iter().all(|c| c.char_len() <= 40));
//! assert_eq!(ctxwindow::stitch(&chunks), text);
//! ```
//!
//! ## Budgeting
//!
//! ```rust
//! use ctxwindow::{ContextBudget, DocumentStats, ModelTable};
//!
//! let stats = DocumentStats::of("hello world");
//! assert_eq!(stats.estimated_tokens, 3);
//!
//! let models = ModelTable::default();
//! assert!(models.compatible(stats.estimated_tokens).contains(&"gpt-4".to_string()));
//!
//! // 4096 - 500 (prompt) - 500 (response) = 3096 tokens ≈ 12 384 chars
//! assert_eq!(ContextBudget::default().chunk_size_chars().unwrap(), 12_384);
//! ```
//!
//! ## Features
//!
//! | Feature | Adds |
//! |---------|------|
//! | `tokens` | [`TokenCounter`], [`TokenSizer`] (tiktoken BPE) |
//! | `llm` | `llm` module: OpenAI chat client and [`llm::Summarizer`] |
//! | `server` | `server` module and the `ctxwindow-server` binary (default) |

mod budget;
mod character;
mod chunk;
mod config;
mod error;
mod merge;
mod models;
mod recursive;
mod sizer;
mod tokens;

#[cfg(feature = "llm")]
pub mod llm;

#[cfg(feature = "server")]
pub mod server;

pub use budget::ContextBudget;
pub use character::CharacterSplitter;
pub use chunk::{stitch, Chunk};
pub use config::{SplitConfig, DEFAULT_SEPARATORS};
pub use error::{Error, Result};
pub use models::{ModelLimit, ModelTable};
pub use recursive::RecursiveSplitter;
pub use sizer::{Bytes, Characters, ChunkSizer};
pub use tokens::{estimate_tokens, DocumentStats, TokenCount, TOKENS_PER_WORD};

#[cfg(feature = "tokens")]
pub use tokens::{TokenCounter, TokenSizer};

/// A text splitting strategy.
///
/// All splitters implement this trait, enabling polymorphic usage:
///
/// ```rust
/// use ctxwindow::{CharacterSplitter, Chunk, Chunker, RecursiveSplitter};
///
/// fn split_document(splitter: &dyn Chunker, text: &str) -> Vec<Chunk> {
///     splitter.chunk(text)
/// }
///
/// let recursive = RecursiveSplitter::prose(100, 20).unwrap();
/// let words = CharacterSplitter::new(" ", 100, 0).unwrap();
///
/// let text = "Hello world. This is a test.";
/// assert_eq!(split_document(&recursive, text).len(), 1);
/// assert_eq!(split_document(&words, text).len(), 1);
/// ```
pub trait Chunker: Send + Sync {
    /// Split text into chunks.
    ///
    /// Each [`Chunk`] carries its text and byte offsets in the original
    /// document. Empty input gives no chunks.
    fn chunk(&self, text: &str) -> Vec<Chunk>;

    /// Estimate the number of chunks for a given text length.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, text_len: usize) -> usize {
        (text_len / 500).max(1)
    }

    /// Split text and keep only the chunk strings.
    fn split_text(&self, text: &str) -> Vec<String> {
        self.chunk(text).into_iter().map(|c| c.text).collect()
    }
}
