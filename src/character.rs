//! Single-separator splitting.
//!
//! The simple strategy: cut on one separator, merge pieces up to the size
//! limit. Nothing is split further, so a piece longer than `chunk_size`
//! becomes an oversized chunk of its own.
//!
//! ```text
//! separator = " ", chunk_size = 12
//!
//! "The quick brown fox"
//!   -> ["The quick", " brown fox"]
//! ```
//!
//! Cheaper and more predictable than [`RecursiveSplitter`](crate::RecursiveSplitter),
//! but one long paragraph (or one long word) defeats it.

use tracing::debug;

use crate::merge::{fragments, into_chunks, Merger};
use crate::{Characters, Chunk, ChunkSizer, Chunker, Result, SplitConfig};

/// Splitter that uses only one separator.
///
/// ## Example
///
/// ```rust
/// use ctxwindow::{CharacterSplitter, Chunker};
///
/// let splitter = CharacterSplitter::new(" ", 12, 0).unwrap();
/// let chunks = splitter.chunk("The quick brown fox");
///
/// assert_eq!(chunks[0].text, "The quick");
/// assert_eq!(chunks[1].text, " brown fox");
/// ```
#[derive(Debug, Clone)]
pub struct CharacterSplitter<S = Characters> {
    separator: String,
    config: SplitConfig,
    sizer: S,
}

impl CharacterSplitter {
    /// Create a splitter on `separator`, measuring in characters.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid size/overlap pair.
    pub fn new(separator: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::with_sizer(separator, SplitConfig::new(chunk_size, chunk_overlap), Characters)
    }

    /// Split on blank lines (paragraphs).
    pub fn paragraphs(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::new("\n\n", chunk_size, chunk_overlap)
    }
}

impl<S: ChunkSizer> CharacterSplitter<S> {
    /// Create a splitter with a custom length function.
    ///
    /// Only `chunk_size`, `chunk_overlap` and `trim_whitespace` of `config`
    /// are used; its separator list is replaced by `separator`.
    pub fn with_sizer(separator: &str, config: SplitConfig, sizer: S) -> Result<Self> {
        let config = config.with_separators(&[separator]);
        config.validate()?;
        Ok(Self {
            separator: separator.to_string(),
            config,
            sizer,
        })
    }

    /// The separator this splitter cuts on.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl<S: ChunkSizer> Chunker for CharacterSplitter<S> {
    fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return vec![];
        }

        let pieces = fragments(text, 0, &self.separator);
        let mut spans = Vec::with_capacity(pieces.len());
        Merger::new(
            text,
            &self.sizer,
            self.config.chunk_size,
            self.config.chunk_overlap,
        )
        .merge(&pieces, &mut spans);

        debug!(
            input_len = text.len(),
            chunks = spans.len(),
            separator = ?self.separator,
            "character split"
        );

        into_chunks(text, spans, self.config.trim_whitespace)
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        (text_len / self.config.chunk_size).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stitch;

    #[test]
    fn test_paragraph_merge() {
        let splitter = CharacterSplitter::paragraphs(30, 0).unwrap();
        let text = "First para.\n\nSecond para.\n\nThird paragraph here.";
        let chunks = splitter.chunk(text);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "First para.\n\nSecond para.");
        assert_eq!(stitch(&chunks), text);
    }

    #[test]
    fn test_oversized_piece_kept_whole() {
        let splitter = CharacterSplitter::new(" ", 5, 0).unwrap();
        let chunks = splitter.chunk("a enormous b");

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a", " enormous", " b"]);
    }

    #[test]
    fn test_overlap_between_pieces() {
        let splitter = CharacterSplitter::new(" ", 10, 4).unwrap();
        let chunks = splitter.chunk("one two three four");

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            assert!(pair[1].overlap_with(&pair[0]).chars().count() <= 4);
        }
        assert_eq!(stitch(&chunks), "one two three four");
    }

    #[test]
    fn test_separator_absent_single_chunk() {
        let splitter = CharacterSplitter::paragraphs(100, 10).unwrap();
        let chunks = splitter.chunk("no blank lines at all");
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_invalid_overlap() {
        assert!(CharacterSplitter::new(" ", 10, 10).is_err());
    }
}
