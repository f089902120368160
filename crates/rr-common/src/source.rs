//! Input batches. Whatever the source, position 0 of the returned batch is
//! the reference document and the rest are candidates.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::SourceError;
use crate::Document;

pub trait DocumentSource {
    fn load(&self) -> Result<Vec<Document>, SourceError>;
}

/// JSON array of `{"id": ..., "text": ...}` objects, reference first.
pub struct JsonBatchSource {
    path: PathBuf,
}

impl JsonBatchSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for JsonBatchSource {
    fn load(&self) -> Result<Vec<Document>, SourceError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;

        let documents: Vec<Document> =
            serde_json::from_str(&raw).map_err(|source| SourceError::Decode {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), documents = documents.len(), "loaded json batch");
        Ok(documents)
    }
}

/// A reference text file plus a flat directory of candidate `.txt` files.
///
/// Candidates are ordered by file name. Hidden files and the reference file
/// itself are skipped. A candidate that cannot be read is kept with empty
/// text so one bad file does not sink the batch.
pub struct TextDirSource {
    reference: PathBuf,
    candidates_dir: PathBuf,
}

impl TextDirSource {
    pub fn new(reference: impl Into<PathBuf>, candidates_dir: impl Into<PathBuf>) -> Self {
        Self {
            reference: reference.into(),
            candidates_dir: candidates_dir.into(),
        }
    }

    fn candidate_paths(&self) -> Result<Vec<PathBuf>, SourceError> {
        let entries = fs::read_dir(&self.candidates_dir).map_err(|source| SourceError::Io {
            path: self.candidates_dir.clone(),
            source,
        })?;

        let reference = fs::canonicalize(&self.reference).ok();
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_visible_text_file(path))
            .filter(|path| fs::canonicalize(path).ok() != reference)
            .collect();

        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }
}

impl DocumentSource for TextDirSource {
    fn load(&self) -> Result<Vec<Document>, SourceError> {
        let reference_text =
            fs::read_to_string(&self.reference).map_err(|source| SourceError::Io {
                path: self.reference.clone(),
                source,
            })?;

        let mut documents = vec![Document::new(file_id(&self.reference), reference_text)];

        for path in self.candidate_paths()? {
            let text = fs::read_to_string(&path).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "unreadable candidate; using empty text");
                String::new()
            });
            documents.push(Document::new(file_id(&path), text));
        }

        debug!(
            dir = %self.candidates_dir.display(),
            candidates = documents.len() - 1,
            "loaded text directory"
        );
        Ok(documents)
    }
}

fn is_visible_text_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    !name.starts_with('.')
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("txt"))
            .unwrap_or(false)
}

fn file_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
