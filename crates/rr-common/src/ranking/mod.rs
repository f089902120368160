pub mod similarity;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::{BandBounds, DEFAULT_TOP_N};
use crate::error::RankError;

pub use similarity::cosine_similarity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document_id: String,
    /// Raw cosine similarity, [-1, 1].
    pub score: f64,
}

/// `top` holds the best `top_n` candidates; `band` holds the remaining
/// candidates whose raw score falls inside the band bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankOutput {
    pub top: Vec<ScoredDocument>,
    pub band: Vec<ScoredDocument>,
}

/// Ranks candidates against the reference with the default band bounds.
pub fn rank(
    reference: &[f32],
    candidates: &[Vec<f32>],
    ids: &[String],
    top_n: usize,
) -> Result<RankOutput, RankError> {
    rank_with_band(reference, candidates, ids, top_n, &BandBounds::default())
}

/// Same as [`rank`] with `top_n` fixed to the default of 10.
pub fn rank_default(
    reference: &[f32],
    candidates: &[Vec<f32>],
    ids: &[String],
) -> Result<RankOutput, RankError> {
    rank(reference, candidates, ids, DEFAULT_TOP_N)
}

/// Scores every candidate, orders them by descending score (ties keep input
/// order) and splits the ordering into `top` and `band`.
pub fn rank_with_band(
    reference: &[f32],
    candidates: &[Vec<f32>],
    ids: &[String],
    top_n: usize,
    bounds: &BandBounds,
) -> Result<RankOutput, RankError> {
    if candidates.len() != ids.len() {
        return Err(RankError::MisalignedIds {
            candidates: candidates.len(),
            ids: ids.len(),
        });
    }

    let scores = score_candidates(reference, candidates, ids)?;

    let mut order: Vec<usize> = (0..scores.len()).collect();
    // sort_by is stable; scores are always finite so partial_cmp is total here
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });

    let scored = |idx: usize| ScoredDocument {
        document_id: ids[idx].clone(),
        score: scores[idx],
    };

    let split = top_n.min(order.len());
    let top = order[..split].iter().map(|&idx| scored(idx)).collect();
    let band = order[split..]
        .iter()
        .filter(|&&idx| bounds.contains(scores[idx]))
        .map(|&idx| scored(idx))
        .collect();

    Ok(RankOutput { top, band })
}

fn score_candidates(
    reference: &[f32],
    candidates: &[Vec<f32>],
    ids: &[String],
) -> Result<Vec<f64>, RankError> {
    candidates
        .iter()
        .zip(ids)
        .map(|(candidate, id)| {
            if candidate.len() != reference.len() {
                return Err(RankError::DimensionMismatch {
                    document_id: id.clone(),
                    expected: reference.len(),
                    actual: candidate.len(),
                });
            }
            Ok(cosine_similarity(reference, candidate))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ranks_by_descending_cosine() {
        let reference = vec![1.0, 0.0];
        let candidates = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0]];

        let out = rank(&reference, &candidates, &ids(&["A", "B", "C"]), 2).unwrap();

        assert_eq!(
            out.top,
            vec![
                ScoredDocument { document_id: "A".into(), score: 1.0 },
                ScoredDocument { document_id: "B".into(), score: 0.0 },
            ]
        );
        assert!(out.band.is_empty());

        let out = rank(&reference, &candidates, &ids(&["A", "B", "C"]), 1).unwrap();
        assert_eq!(out.top.len(), 1);
        assert_eq!(out.top[0].document_id, "A");
        assert!(out.band.is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let reference = vec![1.0, 1.0];
        let candidates = vec![
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ];

        let out = rank(&reference, &candidates, &ids(&["x", "y", "z", "w"]), 10).unwrap();

        let order: Vec<_> = out.top.iter().map(|s| s.document_id.as_str()).collect();
        assert_eq!(order, vec!["y", "w", "x", "z"]);
    }

    #[test]
    fn fewer_candidates_than_top_n() {
        let out = rank(&[1.0], &[vec![2.0]], &ids(&["only"]), 10).unwrap();

        assert_eq!(out.top.len(), 1);
        assert!(out.band.is_empty());
    }

    #[test]
    fn empty_candidate_set_is_not_an_error() {
        let out = rank_default(&[1.0, 0.0], &[], &[]).unwrap();

        assert_eq!(out, RankOutput::default());
    }

    #[test]
    fn zero_reference_scores_everything_zero() {
        let out = rank(&[0.0, 0.0], &[vec![1.0, 0.0], vec![0.0, 1.0]], &ids(&["a", "b"]), 5)
            .unwrap();

        assert!(out.top.iter().all(|s| s.score == 0.0));
        assert_eq!(out.top[0].document_id, "a");
    }

    #[test]
    fn dimension_mismatch_names_the_candidate() {
        let err = rank(&[1.0, 0.0], &[vec![1.0, 0.0], vec![1.0]], &ids(&["ok", "bad"]), 5)
            .unwrap_err();

        assert_eq!(
            err,
            RankError::DimensionMismatch {
                document_id: "bad".into(),
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn misaligned_ids_are_rejected() {
        let err = rank(&[1.0], &[vec![1.0]], &[], 5).unwrap_err();

        assert_eq!(err, RankError::MisalignedIds { candidates: 1, ids: 0 });
    }

    #[test]
    fn default_band_never_fills_from_cosine_scores() {
        let reference = vec![1.0, 0.0];
        let candidates: Vec<Vec<f32>> = (0..30)
            .map(|i| vec![1.0, i as f32 * 0.1])
            .collect();
        let names: Vec<String> = (0..30).map(|i| format!("c{i}")).collect();

        let out = rank(&reference, &candidates, &names, 10).unwrap();

        assert_eq!(out.top.len(), 10);
        assert!(out.band.is_empty());
    }

    #[test]
    fn redefined_band_selects_only_entries_after_top() {
        let reference = vec![1.0, 0.0];
        let candidates = vec![vec![1.0, 0.0], vec![1.0, 1.0], vec![1.0, 1.0], vec![0.0, 1.0]];
        let band = BandBounds { min: 0.5, max: 0.8 };

        let out = rank_with_band(&reference, &candidates, &ids(&["a", "b", "c", "d"]), 2, &band)
            .unwrap();

        let top: Vec<_> = out.top.iter().map(|s| s.document_id.as_str()).collect();
        let banded: Vec<_> = out.band.iter().map(|s| s.document_id.as_str()).collect();
        assert_eq!(top, vec!["a", "b"]);
        assert_eq!(banded, vec!["c"]);
    }
}
