use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use rr_common::{CancellationToken, EmbeddingError, EmbeddingProvider, Vector};

/// Returns pre-assigned vectors keyed by the exact input text.
pub struct StaticEmbedder {
    dimension: usize,
    vectors: HashMap<String, Vector>,
    pub calls: AtomicUsize,
}

impl StaticEmbedder {
    pub fn new(dimension: usize, pairs: &[(&str, Vector)]) -> Self {
        Self {
            dimension,
            vectors: pairs
                .iter()
                .map(|(text, v)| (text.to_string(), v.clone()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl EmbeddingProvider for StaticEmbedder {
    fn name(&self) -> &'static str {
        "static"
    }

    fn version(&self) -> &str {
        "test"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(
        &self,
        texts: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<Vector>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        cancel.check()?;
        texts
            .iter()
            .map(|text| {
                self.vectors
                    .get(text)
                    .cloned()
                    .ok_or_else(|| EmbeddingError::InvalidResponse(format!("no vector for {text:?}")))
            })
            .collect()
    }
}
