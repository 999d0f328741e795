//! Splitter configuration.
//!
//! ## Size vs Overlap
//!
//! `chunk_size` caps how large a chunk may grow; `chunk_overlap` is how
//! much of the previous chunk's tail is repeated at the head of the next one:
//!
//! ```text
//! chunk_size = 1000, chunk_overlap = 200
//!
//! Chunk 0: [0 ............................. 990]
//! Chunk 1:                       [795 ...................... 1780]
//!                                 ^^^^^^^^^^ <= 200 chars shared
//! ```
//!
//! Both are measured with the splitter's [`ChunkSizer`](crate::ChunkSizer),
//! characters by default.
//!
//! An overlap as large as the chunk would leave no room for new text, so
//! `chunk_overlap >= chunk_size` is rejected rather than clamped.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Separator hierarchy for prose: paragraphs, lines, words, characters.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Configuration shared by the splitters.
///
/// # Examples
///
/// ```rust
/// use ctxwindow::SplitConfig;
///
/// let config = SplitConfig::new(1000, 200);
/// assert!(config.validate().is_ok());
///
/// let bad = SplitConfig::new(100, 100);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Maximum chunk size.
    pub chunk_size: usize,
    /// Amount of the previous chunk repeated at the start of the next.
    pub chunk_overlap: usize,
    /// Boundary strings, most preferred first. `""` splits anywhere.
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,
    /// Shrink chunks to exclude surrounding whitespace.
    #[serde(default)]
    pub trim_whitespace: bool,
}

fn default_separators() -> Vec<String> {
    DEFAULT_SEPARATORS.iter().map(|&s| s.to_string()).collect()
}

impl SplitConfig {
    /// Create a configuration with the default separators.
    #[must_use]
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separators: default_separators(),
            trim_whitespace: false,
        }
    }

    /// Replace the separator hierarchy.
    #[must_use]
    pub fn with_separators(mut self, separators: &[&str]) -> Self {
        self.separators = separators.iter().map(|&s| s.to_string()).collect();
        self
    }

    /// Trim whitespace from chunk edges and drop whitespace-only chunks.
    #[must_use]
    pub fn trimmed(mut self) -> Self {
        self.trim_whitespace = true;
        self
    }

    /// Check the configuration before any splitting happens.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidChunkSize`] if `chunk_size == 0`
    /// - [`Error::OverlapExceedsSize`] if `chunk_overlap >= chunk_size`
    /// - [`Error::NoSeparators`] if `separators` is empty
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidChunkSize(self.chunk_size));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::OverlapExceedsSize {
                size: self.chunk_size,
                overlap: self.chunk_overlap,
            });
        }
        if self.separators.is_empty() {
            return Err(Error::NoSeparators);
        }
        Ok(())
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}
