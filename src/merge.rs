//! Greedy fragment merging with overlap.
//!
//! Splitters cut a document into fragments that tile it without gaps. This
//! module glues consecutive fragments back together into chunks no larger
//! than `chunk_size`, carrying the tail of each chunk into the next:
//!
//! ```text
//! fragments:  [The][ quick][ brown][ fox][ jumps]     chunk_size = 16
//!                                                     overlap    = 6
//! chunk 0:    [The][ quick][ brown]                   15
//! chunk 1:                 [ brown][ fox][ jumps]     16
//!                          ^^^^^^^ carried over
//! ```
//!
//! Overlap is always made of whole fragments, so it starts on a separator
//! (or character) boundary.

use std::collections::VecDeque;
use std::ops::Range;

use tracing::warn;

use crate::{Chunk, ChunkSizer};

pub(crate) struct Merger<'a, S: ?Sized> {
    text: &'a str,
    sizer: &'a S,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl<'a, S: ChunkSizer + ?Sized> Merger<'a, S> {
    pub(crate) fn new(text: &'a str, sizer: &'a S, chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            text,
            sizer,
            chunk_size,
            chunk_overlap,
        }
    }

    /// Merge contiguous `fragments` and append the resulting spans to `out`.
    pub(crate) fn merge(&self, fragments: &[Range<usize>], out: &mut Vec<Range<usize>>) {
        let mut window: VecDeque<(Range<usize>, usize)> = VecDeque::new();
        let mut total = 0usize;

        for fragment in fragments {
            let size = self.sizer.size(&self.text[fragment.clone()]);

            if total + size > self.chunk_size && !window.is_empty() {
                self.emit(&window, total, out);

                // Keep only a tail that fits the overlap and leaves room for `fragment`.
                while total > self.chunk_overlap || (total + size > self.chunk_size && total > 0) {
                    let Some((_, front)) = window.pop_front() else {
                        break;
                    };
                    total -= front;
                }
            }

            window.push_back((fragment.clone(), size));
            total += size;
        }

        if !window.is_empty() {
            self.emit(&window, total, out);
        }
    }

    fn emit(&self, window: &VecDeque<(Range<usize>, usize)>, total: usize, out: &mut Vec<Range<usize>>) {
        let (Some((first, _)), Some((last, _))) = (window.front(), window.back()) else {
            return;
        };
        if total > self.chunk_size {
            warn!(
                size = total,
                chunk_size = self.chunk_size,
                "created a chunk longer than the configured chunk size"
            );
        }
        out.push(first.start..last.end);
    }
}

/// Cut `slice` (found at `offset` in the document) on `separator`, keeping
/// each separator at the start of the fragment that follows it.
///
/// A run of repeated separators is kept whole. An empty separator yields
/// one fragment per character.
pub(crate) fn fragments(slice: &str, offset: usize, separator: &str) -> Vec<Range<usize>> {
    if separator.is_empty() {
        return slice
            .char_indices()
            .map(|(i, c)| offset + i..offset + i + c.len_utf8())
            .collect();
    }

    let mut out = Vec::new();
    let mut start = 0;
    let mut run_end = None;
    for (pos, matched) in slice.match_indices(separator) {
        // Repeated separators stay together at the head of one fragment.
        if run_end != Some(pos) && pos > start {
            out.push(offset + start..offset + pos);
            start = pos;
        }
        run_end = Some(pos + matched.len());
    }
    if start < slice.len() {
        out.push(offset + start..offset + slice.len());
    }
    out
}

/// Turn spans into numbered chunks, optionally trimming whitespace.
pub(crate) fn into_chunks(text: &str, spans: Vec<Range<usize>>, trim: bool) -> Vec<Chunk> {
    let mut chunks = Vec::with_capacity(spans.len());

    for span in spans {
        let (start, end) = if trim {
            let piece = &text[span.clone()];
            let leading = piece.len() - piece.trim_start().len();
            let trailing = piece.len() - piece.trim_end().len();
            if leading == piece.len() {
                continue;
            }
            (span.start + leading, span.end - trailing)
        } else {
            (span.start, span.end)
        };

        if start < end {
            let index = chunks.len();
            chunks.push(Chunk::new(&text[start..end], start, end, index));
        }
    }

    chunks
}
