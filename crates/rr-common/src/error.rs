use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single ranking call. Fatal for that call only.
#[derive(Debug, Error, PartialEq)]
pub enum RankError {
    #[error("embedding dimension mismatch for {document_id}: expected {expected}, got {actual}")]
    DimensionMismatch {
        document_id: String,
        expected: usize,
        actual: usize,
    },
    #[error("candidate count {candidates} does not match id count {ids}")]
    MisalignedIds { candidates: usize, ids: usize },
}

/// Join misses while attaching extracted fields to scored documents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("no extracted fields for document {document_id}")]
    MissingFieldsRecord { document_id: String },
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding batch cancelled")]
    Cancelled,
    #[error("provider returned {actual} vectors for {expected} texts")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("vector {index} has dimension {actual}, expected {expected}")]
    InconsistentDimension {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("embedding request failed: {0}")]
    Request(String),
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
    #[error("embedding provider misconfigured: {0}")]
    Configuration(String),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode batch {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("batch is empty; position 0 must hold the reference document")]
    MissingReference,
    #[error("document id {document_id} appears more than once in the batch")]
    DuplicateDocumentId { document_id: String },
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Rank(#[from] RankError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}
