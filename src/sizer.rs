//! Length functions for measuring chunks.
//!
//! A splitter never looks at sizes directly; it asks its [`ChunkSizer`].
//! Characters are the default because that is what people mean by "a 1000
//! character chunk". Bytes are cheaper. Tokens (with the `tokens` feature)
//! are what the model actually counts against its context window.

/// Measures the size of a piece of text.
pub trait ChunkSizer: Send + Sync {
    /// The size of `text` in this sizer's unit.
    fn size(&self, text: &str) -> usize;
}

/// Counts Unicode scalar values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Characters;

impl ChunkSizer for Characters {
    fn size(&self, text: &str) -> usize {
        text.chars().count()
    }
}

/// Counts UTF-8 bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bytes;

impl ChunkSizer for Bytes {
    fn size(&self, text: &str) -> usize {
        text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_characters_vs_bytes() {
        let text = "naïve";
        assert_eq!(Characters.size(text), 5);
        assert_eq!(Bytes.size(text), 6);
    }
}
