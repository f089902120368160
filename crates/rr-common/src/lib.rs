pub mod aggregate;
pub mod config;
pub mod embedding;
pub mod error;
pub mod export;
pub mod extraction;
pub mod logging;
pub mod pipeline;
pub mod ranking;
pub mod run_id;
pub mod source;

use serde::{Deserialize, Serialize};

pub use aggregate::{aggregate, format_percentage, RankedResult};
pub use config::{BandBounds, EmbedderConfig, RankerConfig};
pub use embedding::{
    create_provider, validate_embeddings, CancellationToken, EmbeddingProvider, Vector,
};
pub use error::{AggregateError, EmbeddingError, ExportError, PipelineError, RankError, SourceError};
pub use extraction::{extract_fields, ExtractedFields, FieldFacets};
pub use pipeline::{PipelineOutput, RankingPipeline};
pub use ranking::{rank, RankOutput, ScoredDocument};

/// One input item of a ranking run. Position 0 of a batch is the reference
/// (job description); every later position is a candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default, alias = "raw_text")]
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}
