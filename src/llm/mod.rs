//! Chat-completion plumbing for summarizing documents.
//!
//! The model call is an opaque `messages -> (text, tokens used)` function
//! behind [`LlmProvider`]. [`Summarizer`] decides which credential to use,
//! builds the prompt, and turns every failure into readable text so a demo
//! never crashes on a bad key.

mod openai;
mod provider;
mod summarize;

pub use openai::{OpenAiFactory, OpenAiProvider, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use provider::{Completion, LlmError, LlmProvider, Message, ProviderFactory, Role};
pub use summarize::{ChunkedSummary, Summarizer, Summary, MOCK_SUMMARY};
