//! The Context Window Problem
//!
//! Build a document far larger than a 4K-token window, then split it two
//! ways and compare.
//!
//! ```bash
//! cargo run --example context_window
//! ```

use ctxwindow::{CharacterSplitter, Chunker, DocumentStats, ModelTable, RecursiveSplitter};

const BASE_TEXT: &str = "\
Artificial Intelligence (AI) has revolutionized the way we interact with technology.
Machine learning algorithms can now process vast amounts of data and make predictions
with remarkable accuracy. Natural Language Processing (NLP) enables computers to
understand and generate human language.

The transformer architecture, introduced in 2017, has become the foundation for
modern language models. These models use attention mechanisms to understand context
and relationships between words.

However, these models face a critical limitation: the context window. A context
window is the maximum number of tokens that a model can process in a single
interaction. When a document exceeds this limit, it has to be chunked, summarized,
or served through retrieval-augmented generation (RAG).

";

fn rule(title: &str) {
    println!("\n{}\n{title}\n{}", "=".repeat(72), "=".repeat(72));
}

fn main() -> ctxwindow::Result<()> {
    let document = BASE_TEXT.repeat(50);
    let models = ModelTable::default();

    rule("1. The problem");
    let stats = DocumentStats::of(&document);
    println!("Characters:        {}", stats.chars);
    println!("Words:             {}", stats.words);
    println!("Tokens (estimate): ~{}", stats.estimated_tokens);
    for model in models.iter() {
        let verdict = if stats.exceeds(model.context_window) {
            "too large"
        } else {
            "fits"
        };
        println!("  {:<16} {:>7} tokens  {verdict}", model.name, model.context_window);
    }

    rule("2. Recursive splitting (1000 chars, 200 overlap)");
    let recursive = RecursiveSplitter::prose(1000, 200)?;
    let chunks = recursive.chunk(&document);
    let average = chunks.iter().map(|c| c.char_len()).sum::<usize>() / chunks.len().max(1);
    println!("Chunks:        {}", chunks.len());
    println!("Average size:  {average} chars");
    for chunk in chunks.iter().take(3) {
        let preview: String = chunk.text.chars().take(80).collect();
        println!("  [{}] {} chars: {preview:?}...", chunk.index, chunk.char_len());
    }
    if let [first, second, ..] = chunks.as_slice() {
        println!("Overlap 0 -> 1: {:?}", second.overlap_with(first));
    }

    rule("3. Single-separator splitting (\" \", 1000 chars, no overlap)");
    let words = CharacterSplitter::new(" ", 1000, 0)?;
    let simple = words.chunk(&document);
    println!("Chunks: {}", simple.len());
    println!("Cheaper, but blind to paragraphs and sentences.");

    rule("4. Retrieval-augmented generation");
    println!("  - Split documents into chunks");
    println!("  - Embed each chunk and store it in a vector index");
    println!("  - Embed the query and retrieve the closest chunks");
    println!("  - Send only those chunks to the model as context");

    rule("5. Token counting");
    println!("  - Rough estimate: ~1.3 tokens per word");
    println!("  - Exact: the model's BPE vocabulary (see the token_budget demo)");

    Ok(())
}
