//! Client for a sentence-embedding server speaking the text-embeddings-inference
//! `/embed` protocol (`{"inputs": [...]}` in, `[[f32]]` out).

use std::thread::sleep;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use super::{CancellationToken, EmbeddingProvider, Vector};
use crate::config::EmbedderConfig;
use crate::error::EmbeddingError;

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(8);
const CANCEL_POLL: Duration = Duration::from_millis(50);

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [String],
    truncate: bool,
}

pub struct HttpEmbedder {
    client: reqwest::blocking::Client,
    endpoint: String,
    dimension: usize,
    max_retries: u32,
    batch_size: usize,
}

impl HttpEmbedder {
    pub fn from_config(config: &EmbedderConfig) -> Result<Self, EmbeddingError> {
        let base = config
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                EmbeddingError::Configuration("RR_EMBEDDING_URL is required for http".into())
            })?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| EmbeddingError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embed", base.trim_end_matches('/')),
            dimension: config.dimension,
            max_retries: config.max_retries,
            batch_size: config.batch_size.max(1),
        })
    }

    #[cfg(test)]
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn embed_chunk(
        &self,
        chunk: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<Vector>, EmbeddingError> {
        let body = EmbedRequest {
            inputs: chunk,
            truncate: true,
        };
        let mut backoff = INITIAL_BACKOFF;
        let mut last_err = String::new();

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(attempt, backoff_ms = backoff.as_millis() as u64, "retrying embed request");
                sleep_unless_cancelled(backoff, cancel)?;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
            cancel.check()?;

            let response = match self.client.post(&self.endpoint).json(&body).send() {
                Ok(response) => response,
                Err(err) => {
                    warn!(error = %err, attempt, endpoint = %self.endpoint, "embed request failed");
                    last_err = err.to_string();
                    continue;
                }
            };

            let status = response.status();
            if status.is_server_error() || status.as_u16() == 429 {
                warn!(status = status.as_u16(), attempt, "embedding server busy or failing");
                last_err = format!("server returned {status}");
                continue;
            }
            if !status.is_success() {
                let text = response.text().unwrap_or_default();
                return Err(EmbeddingError::Request(format!("server returned {status}: {text}")));
            }

            return response
                .json::<Vec<Vector>>()
                .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()));
        }

        Err(EmbeddingError::Request(last_err))
    }
}

/// Backoff sleep in short slices so a cancelled batch stops waiting promptly.
fn sleep_unless_cancelled(total: Duration, cancel: &CancellationToken) -> Result<(), EmbeddingError> {
    let mut remaining = total;
    while !remaining.is_zero() {
        cancel.check()?;
        let slice = remaining.min(CANCEL_POLL);
        sleep(slice);
        remaining -= slice;
    }
    cancel.check()
}

impl EmbeddingProvider for HttpEmbedder {
    fn name(&self) -> &'static str {
        "http"
    }

    fn version(&self) -> &str {
        "tei-v1"
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

        for chunk in texts.chunks(self.batch_size) {
            cancel.check()?;
            let embedded = self.embed_chunk(chunk, cancel)?;
            if embedded.len() != chunk.len() {
                return Err(EmbeddingError::LengthMismatch {
                    expected: chunk.len(),
                    actual: embedded.len(),
                });
            }
            vectors.extend(embedded);
        }
        cancel.check()?;

        Ok(vectors)
    }
}
