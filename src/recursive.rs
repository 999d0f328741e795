//! Recursive character splitting with overlap (LangChain-style).
//!
//! Tries progressively finer separators until every piece fits, then merges
//! neighbouring pieces back up to the size limit with overlap between them.
//!
//! ## The Algorithm
//!
//! Given separators `["\n\n", "\n", " ", ""]` and `chunk_size = 100`:
//!
//! ```text
//! 1. Pick the first separator that occurs in the text ("" always does)
//! 2. Cut the text on it, keeping the separator at the start of each piece
//! 3. Pieces <= 100 are queued for merging
//! 4. A piece > 100 flushes the queue, then is split again with the
//!    separators that come after the one just used
//! 5. Queued pieces are merged greedily: when the next piece would not fit,
//!    the chunk is emitted and its tail (<= chunk_overlap) starts the next
//! ```
//!
//! Each recursion level consumes at least one separator, so depth is bounded
//! by the separator list. When the list runs out, whatever is left is an
//! atomic unit and is emitted whole, even if it is oversized.
//!
//! ## Lossless
//!
//! Pieces tile the text and carry their separators, so no text is dropped:
//! [`stitch`](crate::stitch) of an untrimmed split reproduces the input.
//!
//! ## Separator Presets
//!
//! ```text
//! prose:    ["\n\n", "\n", " ", ""]
//! markdown: ["\n## ", "\n### ", "\n\n", "\n", ". ", " ", ""]
//! ```

use std::ops::Range;

use tracing::debug;

use crate::merge::{fragments, into_chunks, Merger};
use crate::{Characters, Chunk, ChunkSizer, Chunker, Result, SplitConfig};

/// Recursive overlapping text splitter.
///
/// Generic over the [`ChunkSizer`] used to measure pieces; characters by
/// default.
///
/// ## Example
///
/// ```rust
/// use ctxwindow::{Chunker, RecursiveSplitter, SplitConfig};
///
/// let splitter = RecursiveSplitter::new(SplitConfig::new(50, 10)).unwrap();
/// let text = "Paragraph one.\n\nParagraph two is longer and might need splitting.";
/// let chunks = splitter.chunk(text);
///
/// assert!(chunks.iter().all(|c| c.char_len() <= 50));
/// assert_eq!(ctxwindow::stitch(&chunks), text);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveSplitter<S = Characters> {
    config: SplitConfig,
    sizer: S,
}

impl RecursiveSplitter {
    /// Create a splitter that measures chunks in characters.
    ///
    /// # Errors
    ///
    /// Returns the configuration error if `config` is invalid.
    pub fn new(config: SplitConfig) -> Result<Self> {
        Self::with_sizer(config, Characters)
    }

    /// Splitter for prose with the default separators.
    pub fn prose(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::new(SplitConfig::new(chunk_size, chunk_overlap))
    }

    /// Splitter that prefers Markdown section boundaries.
    pub fn markdown(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::new(
            SplitConfig::new(chunk_size, chunk_overlap)
                .with_separators(&["\n## ", "\n### ", "\n\n", "\n", ". ", " ", ""]),
        )
    }
}

impl<S: ChunkSizer> RecursiveSplitter<S> {
    /// Create a splitter with a custom length function.
    ///
    /// # Errors
    ///
    /// Returns the configuration error if `config` is invalid.
    pub fn with_sizer(config: SplitConfig, sizer: S) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, sizer })
    }

    /// The configuration this splitter was built with.
    #[must_use]
    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    fn split_span(&self, text: &str, span: Range<usize>, separators: &[String], out: &mut Vec<Range<usize>>) {
        let slice = &text[span.clone()];

        let chosen = separators
            .iter()
            .position(|sep| sep.is_empty() || slice.contains(sep.as_str()))
            .unwrap_or(separators.len() - 1);
        let separator = &separators[chosen];
        let finer = &separators[chosen + 1..];

        let merger = Merger::new(
            text,
            &self.sizer,
            self.config.chunk_size,
            self.config.chunk_overlap,
        );
        let mut pending: Vec<Range<usize>> = Vec::new();

        for fragment in fragments(slice, span.start, separator) {
            if self.sizer.size(&text[fragment.clone()]) <= self.config.chunk_size {
                pending.push(fragment);
                continue;
            }

            if !pending.is_empty() {
                merger.merge(&pending, out);
                pending.clear();
            }

            if finer.is_empty() {
                out.push(fragment);
            } else {
                self.split_span(text, fragment, finer, out);
            }
        }

        if !pending.is_empty() {
            merger.merge(&pending, out);
        }
    }
}

impl<S: ChunkSizer> Chunker for RecursiveSplitter<S> {
    fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return vec![];
        }

        let mut spans = Vec::with_capacity(self.estimate_chunks(text.len()));
        self.split_span(text, 0..text.len(), &self.config.separators, &mut spans);

        debug!(
            input_len = text.len(),
            chunks = spans.len(),
            chunk_size = self.config.chunk_size,
            "recursive split"
        );

        into_chunks(text, spans, self.config.trim_whitespace)
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        let step = self.config.chunk_size - self.config.chunk_overlap;
        (text_len / step).max(1)
    }
}
