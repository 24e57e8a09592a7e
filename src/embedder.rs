/// Embedding provider module.
///
/// This module provides a blocking HTTP client for the Ollama embeddings API,
/// a file-backed cache for computed embedding tables, and the
/// load-if-present-else-generate-and-persist entry point the validator's
/// callers use.
mod cache;
mod client;

pub use cache::{EmbeddingCache, get_or_create};
pub use client::{EmbedError, EmbeddingClient, OllamaEmbedder, OllamaEmbedderBuilder};
