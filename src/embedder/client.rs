/// Ollama embeddings HTTP client implementation.
///
/// This module provides `OllamaEmbedder` for making synchronous HTTP requests
/// to the Ollama embeddings API, along with error types and a builder pattern
/// for configuration.
use std::thread;
use std::time::Duration;

use thiserror::Error;

/// Default embedding model when neither the builder nor the environment
/// specifies one.
const DEFAULT_MODEL: &str = "nomic-embed-text";

/// Errors that can occur when producing or persisting embeddings.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Embedding API-specific errors (unexpected response shape, etc.)
    #[error("Embedding API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Cache file I/O errors
    #[error("Cache I/O error at {path}: {source}")]
    Cache {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Trait for embedding provider operations.
///
/// This trait enables mocking in unit tests and keeps the validator's callers
/// independent of the concrete HTTP client.
pub trait EmbeddingClient: Send + Sync {
    /// Embeds a batch of texts into fixed-length vectors.
    ///
    /// Returns one vector per input text, in input order.
    fn embed(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

/// Builder for constructing `OllamaEmbedder` instances.
///
/// # Examples
///
/// ```
/// use lineage::embedder::OllamaEmbedderBuilder;
///
/// let embedder = OllamaEmbedderBuilder::new()
///     .base_url("http://localhost:11434")
///     .model("nomic-embed-text")
///     .build()
///     .expect("Failed to create embedder");
/// ```
#[derive(Debug, Default)]
pub struct OllamaEmbedderBuilder {
    base_url: Option<String>,
    model: Option<String>,
}

impl OllamaEmbedderBuilder {
    /// Creates a new `OllamaEmbedderBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL for the Ollama API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the embedding model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Builds the `OllamaEmbedder` with the configured settings.
    ///
    /// If `base_url()` was not called, the `OLLAMA_HOST` environment variable
    /// is consulted, falling back to `http://localhost:11434`. If `model()`
    /// was not called, `OLLAMA_EMBED_MODEL` is consulted, falling back to
    /// `nomic-embed-text`.
    ///
    /// # Errors
    ///
    /// Returns `EmbedError::InvalidUrl` for an unparseable base URL and
    /// `EmbedError::Network` if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<OllamaEmbedder, EmbedError> {
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            std::env::var("OLLAMA_HOST").unwrap_or_else(|_| "http://localhost:11434".to_string())
        };

        let model = if let Some(m) = self.model {
            m
        } else {
            std::env::var("OLLAMA_EMBED_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string())
        };

        reqwest::Url::parse(&base_url)
            .map_err(|e| EmbedError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(EmbedError::Network)?;

        Ok(OllamaEmbedder {
            client,
            base_url,
            model,
        })
    }
}

/// Synchronous HTTP client for the Ollama embeddings API.
///
/// Construct via `OllamaEmbedderBuilder`.
pub struct OllamaEmbedder {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the embedding model configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn embed_internal(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/api/embed", self.base_url);
        let request_body = serde_json::json!({
            "model": model,
            "input": texts,
        });

        retry_with_backoff(|| {
            let response = self
                .client
                .post(&url)
                .json(&request_body)
                .send()
                .map_err(|e| {
                    if e.is_timeout() {
                        EmbedError::Timeout(e)
                    } else {
                        EmbedError::Network(e)
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(EmbedError::Http {
                    status: status.as_u16(),
                });
            }

            let json: serde_json::Value = response.json().map_err(EmbedError::Network)?;

            let embeddings = json
                .get("embeddings")
                .and_then(|v| v.as_array())
                .ok_or_else(|| EmbedError::Api {
                    message: "Missing 'embeddings' field in API response".to_string(),
                })?;

            let mut vectors = Vec::with_capacity(embeddings.len());
            for embedding in embeddings {
                let values = embedding.as_array().ok_or_else(|| EmbedError::Api {
                    message: "Embedding entry is not an array".to_string(),
                })?;
                let vector: Vec<f32> = values
                    .iter()
                    .map(|v| v.as_f64().map(|f| f as f32))
                    .collect::<Option<_>>()
                    .ok_or_else(|| EmbedError::Api {
                        message: "Embedding entry contains a non-numeric value".to_string(),
                    })?;
                vectors.push(vector);
            }

            if vectors.len() != texts.len() {
                return Err(EmbedError::Api {
                    message: format!(
                        "API returned {} embeddings for {} inputs",
                        vectors.len(),
                        texts.len()
                    ),
                });
            }

            Ok(vectors)
        })
    }
}

impl EmbeddingClient for OllamaEmbedder {
    fn embed(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        self.embed_internal(model, texts)
    }
}

/// Retries an operation with exponential backoff.
///
/// Retries up to 3 times with delays of 1s, 2s, and 4s. Only transient errors
/// (HTTP 5xx, network errors, timeouts) are retried; client errors (HTTP 4xx)
/// and malformed responses fail immediately.
pub fn retry_with_backoff<F, T>(mut f: F) -> Result<T, EmbedError>
where
    F: FnMut() -> Result<T, EmbedError>,
{
    const MAX_RETRIES: usize = 3;
    const DELAYS: [u64; MAX_RETRIES] = [1, 2, 4]; // seconds

    let mut last_error = match f() {
        Ok(result) => return Ok(result),
        Err(e) => {
            if !should_retry(&e) {
                return Err(e);
            }
            e
        }
    };

    for &delay_secs in &DELAYS {
        thread::sleep(Duration::from_secs(delay_secs));

        match f() {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !should_retry(&e) {
                    return Err(e);
                }
                last_error = e;
            }
        }
    }

    Err(last_error)
}

/// Determines if an error should be retried.
fn should_retry(error: &EmbedError) -> bool {
    match error {
        EmbedError::Network(_) => true,
        EmbedError::Timeout(_) => true,
        EmbedError::Http { status } => *status >= 500 && *status < 600,
        EmbedError::Serialization(_) => false,
        EmbedError::Api { .. } => false,
        EmbedError::InvalidUrl(_) => false,
        EmbedError::Cache { .. } => false,
    }
}
