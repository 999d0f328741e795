//! Token Budgets and Chunk-wise Summaries
//!
//! Count tokens exactly, size chunks from a model's window, and summarize
//! the first few chunks. Without `OPENAI_API_KEY` the summaries are mocks.
//!
//! ```bash
//! cargo run --example token_budget --features tokens,llm
//! ```

use std::sync::Arc;

use ctxwindow::llm::{OpenAiFactory, Summarizer};
use ctxwindow::{
    Chunker, ContextBudget, ModelTable, RecursiveSplitter, TokenCounter, TokenSizer,
};

const BASE_TEXT: &str = "\
Large language models read text as tokens. A token is a word, part of a word,
or a piece of punctuation, and every model has a hard limit on how many it can
attend to at once.

Documents longer than that limit must be cut into pieces. Each piece is sent
with a prompt, and the model's answer needs room as well, so a chunk never gets
the whole window.

";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let document = BASE_TEXT.repeat(200);
    let counter = TokenCounter::new();
    let models = ModelTable::default();

    println!("== Token limits ==");
    let count = counter.count(&document, "gpt-3.5-turbo");
    println!("Characters: {}", document.chars().count());
    println!("Words:      {}", document.split_whitespace().count());
    println!("Tokens:     {} (estimated: {})", count.tokens, count.estimated);
    for model in models.iter() {
        let verdict = if count.tokens <= model.context_window {
            "FITS"
        } else {
            "EXCEEDS"
        };
        println!("  {:<16} {:>7} tokens  {verdict}", model.name, model.context_window);
    }

    println!("\n== Splitting strategy ==");
    let budget = ContextBudget::for_model(&models, "gpt-3.5-turbo")?;
    println!("Max context:          {}", budget.max_context);
    println!("Reserved (prompt):    {}", budget.reserved_for_prompt);
    println!("Reserved (response):  {}", budget.reserved_for_response);
    println!("Available for chunk:  {}", budget.available_tokens()?);
    println!("Chunk size:           ~{} chars", budget.chunk_size_chars()?);

    let splitter = RecursiveSplitter::new(budget.split_config(200)?)?;
    let chunks = splitter.chunk(&document);
    println!("Chunks: {}", chunks.len());
    let sizer = TokenSizer::from_counter(&counter, "gpt-3.5-turbo")?;
    for chunk in &chunks {
        println!(
            "  chunk {}: {} chars, {} tokens",
            chunk.index,
            chunk.char_len(),
            ctxwindow::ChunkSizer::size(&sizer, &chunk.text)
        );
    }

    println!("\n== Token-exact splitting ==");
    let exact = RecursiveSplitter::with_sizer(budget.token_split_config(50)?, sizer)?;
    println!(
        "Chunks of at most {} tokens: {}",
        budget.available_tokens()?,
        exact.chunk(&document).len()
    );

    println!("\n== Processing with an LLM ==");
    let api_key = std::env::var("OPENAI_API_KEY").ok();
    let summarizer = Summarizer::new(Arc::new(OpenAiFactory::with_defaults()?), api_key);
    if !summarizer.has_configured_key() {
        println!("OPENAI_API_KEY not set, summaries are mocked");
    }
    let result = summarizer.summarize_chunks(&chunks, 3, None).await;
    for (summary, chunk) in result.summaries.iter().zip(&chunks) {
        println!("  chunk {}: {} tokens", chunk.index, summary.tokens_used);
        println!("    {}", summary.summary);
    }
    println!(
        "Total tokens for {} of {} chunks: {}",
        result.summaries.len(),
        result.chunks_total,
        result.total_tokens
    );

    Ok(())
}
