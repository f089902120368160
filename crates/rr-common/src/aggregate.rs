use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AggregateError;
use crate::extraction::ExtractedFields;
use crate::ranking::ScoredDocument;

/// Presentation row: a scored document joined with its extracted fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// 1-based display position
    pub rank: usize,
    pub document_id: String,
    pub score: f64,
    /// `score * 100` with two decimals and a trailing `%`
    pub relevance: String,
    pub name: String,
    pub previous_department: String,
    pub previous_position: String,
    pub targeted_department: String,
    pub targeted_position: String,
    pub skills: Vec<String>,
}

/// Joins scored documents with their fields, keeping score order.
///
/// A scored id without a field record is an internal consistency fault and
/// is reported, not skipped.
pub fn aggregate(
    scored: &[ScoredDocument],
    fields: &HashMap<String, ExtractedFields>,
) -> Result<Vec<RankedResult>, AggregateError> {
    scored
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let record = fields.get(&entry.document_id).ok_or_else(|| {
                AggregateError::MissingFieldsRecord {
                    document_id: entry.document_id.clone(),
                }
            })?;

            Ok(RankedResult {
                rank: idx + 1,
                document_id: entry.document_id.clone(),
                score: entry.score,
                relevance: format_percentage(entry.score),
                name: record.name.clone(),
                previous_department: record.previous_department.clone(),
                previous_position: record.previous_position.clone(),
                targeted_department: record.targeted_department.clone(),
                targeted_position: record.targeted_position.clone(),
                skills: record.skills.clone(),
            })
        })
        .collect()
}

/// `0.87654` -> `"87.65%"`
pub fn format_percentage(score: f64) -> String {
    format!("{:.2}%", score * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: &str, score: f64) -> ScoredDocument {
        ScoredDocument {
            document_id: id.into(),
            score,
        }
    }

    #[test]
    fn formats_percentages_with_two_decimals() {
        assert_eq!(format_percentage(1.0), "100.00%");
        assert_eq!(format_percentage(0.0), "0.00%");
        assert_eq!(format_percentage(0.87654), "87.65%");
        assert_eq!(format_percentage(-0.5), "-50.00%");
    }

    #[test]
    fn joins_fields_in_score_order_with_one_based_rank() {
        let mut fields = HashMap::new();
        fields.insert(
            "b.pdf".to_string(),
            ExtractedFields {
                name: "Bo".into(),
                skills: vec!["Go".into()],
                ..Default::default()
            },
        );
        fields.insert(
            "a.pdf".to_string(),
            ExtractedFields {
                previous_department: "Ops".into(),
                ..Default::default()
            },
        );

        let rows = aggregate(&[scored("b.pdf", 0.9), scored("a.pdf", 0.25)], &fields).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].document_id, "b.pdf");
        assert_eq!(rows[0].relevance, "90.00%");
        assert_eq!(rows[0].name, "Bo");
        assert_eq!(rows[0].skills, vec!["Go"]);
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].previous_department, "Ops");
        assert_eq!(rows[1].relevance, "25.00%");
    }

    #[test]
    fn missing_record_is_reported_with_id() {
        let err = aggregate(&[scored("ghost.docx", 0.1)], &HashMap::new()).unwrap_err();

        assert_eq!(
            err,
            AggregateError::MissingFieldsRecord {
                document_id: "ghost.docx".into()
            }
        );
    }

    #[test]
    fn empty_input_gives_empty_table() {
        assert!(aggregate(&[], &HashMap::new()).unwrap().is_empty());
    }
}
