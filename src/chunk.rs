//! The Chunk type: a piece of a document with position metadata.

use serde::{Deserialize, Serialize};

/// A contiguous piece of a document, produced by a splitter.
///
/// ## Byte Offsets
///
/// `start` and `end` are byte offsets into the original text, always on
/// character boundaries, so slicing the source recovers the chunk:
///
/// ```rust
/// use ctxwindow::Chunk;
///
/// let text = "Hello, world!";
/// let chunk = Chunk::new("world", 7, 12, 0);
///
/// assert_eq!(&text[chunk.span()], "world");
/// ```
///
/// ## Overlap
///
/// Adjacent chunks may share text. The shared region is a suffix of the
/// earlier chunk and a prefix of the later one:
///
/// ```text
/// Original: "The quick brown fox"
/// Chunk 0:  "The quick brown"   [0..15]
/// Chunk 1:  " brown fox"        [9..19]
///                ^^^^^^
///            overlap [9..15]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text.
    pub text: String,
    /// Byte offset where this chunk starts in the original document.
    pub start: usize,
    /// Byte offset where this chunk ends (exclusive) in the original document.
    pub end: usize,
    /// Zero-based index of this chunk in the sequence.
    pub index: usize,
}

impl Chunk {
    /// Create a new chunk.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize, index: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            index,
        }
    }

    /// The length of this chunk in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// The length of this chunk in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether this chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The byte span of this chunk in the original document.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// The text this chunk shares with the chunk before it.
    ///
    /// Empty when the chunks are merely adjacent.
    #[must_use]
    pub fn overlap_with(&self, previous: &Chunk) -> &str {
        if previous.end <= self.start {
            return "";
        }
        let shared = (previous.end.min(self.end)) - self.start;
        &self.text[..shared]
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk {{ index: {}, span: {}..{}, len: {} }}",
            self.index,
            self.start,
            self.end,
            self.len()
        )
    }
}

/// Join chunks back into one string, dropping each chunk's overlap with
/// the text already emitted.
///
/// For an untrimmed split, `stitch(&splitter.chunk(text)) == text`.
///
/// ```rust
/// use ctxwindow::{stitch, Chunk};
///
/// let chunks = [
///     Chunk::new("The quick brown", 0, 15, 0),
///     Chunk::new(" brown fox", 9, 19, 1),
/// ];
/// assert_eq!(stitch(&chunks), "The quick brown fox");
/// ```
#[must_use]
pub fn stitch(chunks: &[Chunk]) -> String {
    let mut out = String::with_capacity(chunks.last().map_or(0, |c| c.end));
    let mut written_to: Option<usize> = None;

    for chunk in chunks {
        let skip = match written_to {
            Some(end) if end > chunk.start => (end - chunk.start).min(chunk.len()),
            _ => 0,
        };
        out.push_str(&chunk.text[skip..]);
        written_to = Some(written_to.map_or(chunk.end, |end| end.max(chunk.end)));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_with_previous() {
        let first = Chunk::new("The quick brown", 0, 15, 0);
        let second = Chunk::new(" brown fox", 9, 19, 1);
        assert_eq!(second.overlap_with(&first), " brown");
    }

    #[test]
    fn test_adjacent_chunks_share_nothing() {
        let first = Chunk::new("abc", 0, 3, 0);
        let second = Chunk::new("def", 3, 6, 1);
        assert_eq!(second.overlap_with(&first), "");
        assert_eq!(stitch(&[first, second]), "abcdef");
    }

    #[test]
    fn test_stitch_multibyte_overlap() {
        let text = "日本語のテキスト";
        let first = Chunk::new(&text[0..12], 0, 12, 0);
        let second = Chunk::new(&text[6..24], 6, 24, 1);
        assert_eq!(stitch(&[first, second]), text);
    }

    #[test]
    fn test_stitch_empty() {
        assert_eq!(stitch(&[]), "");
    }

    #[test]
    fn test_char_len_counts_chars() {
        let chunk = Chunk::new("héllo", 0, 6, 0);
        assert_eq!(chunk.len(), 6);
        assert_eq!(chunk.char_len(), 5);
    }
}
