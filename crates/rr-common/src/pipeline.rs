use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::aggregate::{aggregate, RankedResult};
use crate::config::RankerConfig;
use crate::embedding::{validate_embeddings, CancellationToken, EmbeddingProvider};
use crate::error::PipelineError;
use crate::extraction::{extract_batch, FieldFacets};
use crate::ranking::rank_with_band;
use crate::{run_id, Document};

/// Everything one ranking run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub reference_id: String,
    pub embedder: String,
    pub embedder_version: String,
    pub top: Vec<RankedResult>,
    pub band: Vec<RankedResult>,
    /// Filter choices over the candidate pool.
    pub facets: FieldFacets,
}

/// Extraction, embedding, ranking and aggregation over one batch.
///
/// The provider is injected so one loaded model can serve every run and so
/// tests can substitute fixed vectors.
pub struct RankingPipeline {
    provider: Arc<dyn EmbeddingProvider>,
    config: RankerConfig,
}

impl RankingPipeline {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: RankerConfig) -> Self {
        if !config.band.is_reachable() {
            warn!(
                band_min = config.band.min,
                band_max = config.band.max,
                "band bounds lie outside the cosine range [-1, 1]; the band list will always be empty"
            );
        }
        Self { provider, config }
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    pub fn run(&self, documents: &[Document]) -> Result<PipelineOutput, PipelineError> {
        self.run_with_cancel(documents, &CancellationToken::new())
    }

    /// Ranks `documents[1..]` against `documents[0]`.
    ///
    /// Cancelling the token aborts the embedding step; nothing is ranked from
    /// a partial vector set.
    pub fn run_with_cancel(
        &self,
        documents: &[Document],
        cancel: &CancellationToken,
    ) -> Result<PipelineOutput, PipelineError> {
        let span = info_span!("rank_batch", run_id = run_id::get(), documents = documents.len());
        let _enter = span.enter();

        let (reference, candidates) = documents
            .split_first()
            .ok_or(PipelineError::MissingReference)?;
        ensure_unique_ids(documents)?;

        let fields = extract_batch(documents);
        let facets = FieldFacets::from_fields(candidates.iter().filter_map(|d| fields.get(&d.id)));

        if candidates.is_empty() {
            info!(reference_id = %reference.id, "no candidates to rank");
            return Ok(self.output(reference, Vec::new(), Vec::new(), facets));
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let started = Instant::now();
        let mut vectors = self.provider.embed_batch(&texts, cancel)?;
        validate_embeddings(&vectors, texts.len(), self.provider.dimension())?;
        info!(
            embedder = self.provider.name(),
            texts = texts.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "embedded batch"
        );

        let reference_vector = vectors.remove(0);
        let ids: Vec<String> = candidates.iter().map(|d| d.id.clone()).collect();
        let ranked = rank_with_band(
            &reference_vector,
            &vectors,
            &ids,
            self.config.top_n,
            &self.config.band,
        )?;

        let top = aggregate(&ranked.top, &fields)?;
        let band = aggregate(&ranked.band, &fields)?;

        info!(
            candidates = candidates.len(),
            top = top.len(),
            band = band.len(),
            best_score = top.first().map(|r| r.score).unwrap_or_default(),
            "ranked batch"
        );

        Ok(self.output(reference, top, band, facets))
    }

    fn output(
        &self,
        reference: &Document,
        top: Vec<RankedResult>,
        band: Vec<RankedResult>,
        facets: FieldFacets,
    ) -> PipelineOutput {
        PipelineOutput {
            run_id: run_id::get().to_string(),
            generated_at: Utc::now(),
            reference_id: reference.id.clone(),
            embedder: self.provider.name().to_string(),
            embedder_version: self.provider.version().to_string(),
            top,
            band,
            facets,
        }
    }
}

fn ensure_unique_ids(documents: &[Document]) -> Result<(), PipelineError> {
    let mut seen = HashSet::with_capacity(documents.len());
    for doc in documents {
        if !seen.insert(doc.id.as_str()) {
            return Err(PipelineError::DuplicateDocumentId {
                document_id: doc.id.clone(),
            });
        }
    }
    Ok(())
}
