use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;

use super::tokenizer::{tokenize_text, WeightedToken};
use super::{CancellationToken, EmbeddingProvider, Vector};
use crate::error::EmbeddingError;

/// Fixed seed for deterministic hashing.
/// Changing these keys changes every vector: bump `version()` with them.
const HASH_SEED_K0: u64 = 0x0123_4567_89ab_cdef;
const HASH_SEED_K1: u64 = 0xfedc_ba98_7654_3210;

/// Feature-hashing embedder.
///
/// - no model download, no training
/// - O(n) in the token count
/// - SipHash13 with fixed keys keeps vectors stable across Rust versions
/// - signed hashing limits collision bias; output is L2-normalised
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash_token(&self, token: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        hasher.finish()
    }

    fn tokens_to_vector(&self, tokens: &[WeightedToken]) -> Vector {
        let mut vector = vec![0.0f32; self.dimension];

        for wt in tokens {
            let hash = self.hash_token(&wt.token);
            let idx = (hash % self.dimension as u64) as usize;
            // top bit picks the sign so index and sign stay independent
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[idx] += sign * wt.weight;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }

    pub fn embed_text(&self, text: &str) -> Vector {
        self.tokens_to_vector(&tokenize_text(text))
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn version(&self) -> &str {
        // bump when the tokenizer or hash keys change
        "v1"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(
        &self,
        texts: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<Vector>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            cancel.check()?;
            vectors.push(self.embed_text(text));
        }
        cancel.check()?;
        Ok(vectors)
    }
}
