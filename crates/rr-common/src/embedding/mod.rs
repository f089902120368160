pub mod hash_embedder;
pub mod http_embedder;
pub mod tokenizer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::config::{EmbedderConfig, EmbedderKind};
use crate::error::EmbeddingError;

pub use hash_embedder::HashEmbedder;
pub use http_embedder::HttpEmbedder;

pub type Vector = Vec<f32>;

/// Text to vector capability. Built once per process and shared read-only.
///
/// Implementations:
/// - HashEmbedder: feature hashing (deterministic, offline)
/// - HttpEmbedder: remote sentence-embedding server
pub trait EmbeddingProvider: Send + Sync {
    /// Implementation name ("hash", "http")
    fn name(&self) -> &'static str;

    /// Model generation; bump when vectors for the same text change.
    fn version(&self) -> &str;

    fn dimension(&self) -> usize;

    /// One vector per text, in input order. Either the whole batch succeeds
    /// or an error is returned; partial results are never handed back.
    fn embed_batch(
        &self,
        texts: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<Vector>, EmbeddingError>;
}

/// Cooperative cancellation for an in-flight embedding batch.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<(), EmbeddingError> {
        if self.is_cancelled() {
            Err(EmbeddingError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Builds the configured provider.
pub fn create_provider(
    config: &EmbedderConfig,
) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
    let provider: Arc<dyn EmbeddingProvider> = match config.kind {
        EmbedderKind::Hash => Arc::new(HashEmbedder::new(config.dimension)),
        EmbedderKind::Http => Arc::new(HttpEmbedder::from_config(config)?),
    };

    info!(
        embedder = provider.name(),
        version = provider.version(),
        dimension = provider.dimension(),
        "embedding provider ready"
    );

    Ok(provider)
}

/// Checks provider output: one vector per input text, each of the provider's
/// dimension.
pub fn validate_embeddings(
    vectors: &[Vector],
    expected_len: usize,
    dimension: usize,
) -> Result<(), EmbeddingError> {
    if vectors.len() != expected_len {
        return Err(EmbeddingError::LengthMismatch {
            expected: expected_len,
            actual: vectors.len(),
        });
    }

    match vectors.iter().position(|v| v.len() != dimension) {
        Some(index) => Err(EmbeddingError::InconsistentDimension {
            index,
            expected: dimension,
            actual: vectors[index].len(),
        }),
        None => Ok(()),
    }
}
