//! Palette similarity ranking against a reference image.
//!
//! Scores are the mean nearest-neighbour RGB distance from each dominant
//! reference color to the candidate's dominant colors. The search runs from
//! the reference side only, so `score(a, b)` and `score(b, a)` generally differ.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::palette::Palette;
use crate::session::ImageId;

pub const DEFAULT_THRESHOLD: f64 = 40.0;
pub const DEFAULT_DOMINANT_COUNT: usize = 3;

/// Tunables for the matcher. Both values are heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchParams {
    /// Candidates scoring at or above this distance are dropped.
    pub threshold: f64,
    /// How many leading palette colors take part in matching.
    pub dominant_count: usize,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            dominant_count: DEFAULT_DOMINANT_COUNT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredMatch {
    pub id: ImageId,
    pub score: f64,
}

/// Outcome of ranking a candidate set.
#[derive(Debug, Clone, PartialEq)]
pub enum Ranking {
    /// Survivors of the threshold, best match first.
    Matches(Vec<ScoredMatch>),
    /// Nothing passed the threshold. Carries every score in input order.
    NoMatch { scores: Vec<ScoredMatch> },
}

impl Ranking {
    pub fn is_no_match(&self) -> bool {
        matches!(self, Ranking::NoMatch { .. })
    }

    /// Ranked ids, or `original` untouched when nothing matched.
    pub fn order_or_fallback(&self, original: &[ImageId]) -> Vec<ImageId> {
        match self {
            Ranking::Matches(matches) => matches.iter().map(|m| m.id).collect(),
            Ranking::NoMatch { .. } => original.to_vec(),
        }
    }

    /// Score attached to `id` during this ranking, if it was scored.
    pub fn score_of(&self, id: ImageId) -> Option<f64> {
        let all = match self {
            Ranking::Matches(m) => m,
            Ranking::NoMatch { scores } => scores,
        };
        all.iter().find(|m| m.id == id).map(|m| m.score)
    }
}

/// Mean over the reference's dominant colors of the distance to the closest
/// candidate dominant color. Empty dominant sets score `+inf`.
pub fn palette_similarity(reference: &Palette, candidate: &Palette, dominant_count: usize) -> f64 {
    let ours = reference.dominant(dominant_count);
    let theirs = candidate.dominant(dominant_count);
    if ours.is_empty() || theirs.is_empty() {
        return f64::INFINITY;
    }

    let total: f64 = ours
        .iter()
        .map(|a| {
            theirs
                .iter()
                .map(|b| a.distance(b))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();

    total / ours.len() as f64
}

fn compare_scored_match(a: &ScoredMatch, b: &ScoredMatch) -> Ordering {
    a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal)
}

/// Score every candidate, drop those at or above the threshold, and sort the
/// rest ascending. Ties keep their input order.
pub fn rank_by_similarity<'a, I>(reference: &Palette, candidates: I, params: MatchParams) -> Ranking
where
    I: IntoIterator<Item = (ImageId, &'a Palette)>,
{
    let scores: Vec<ScoredMatch> = candidates
        .into_iter()
        .map(|(id, palette)| {
            let score = palette_similarity(reference, palette, params.dominant_count);
            tracing::debug!(%id, score, "palette score");
            ScoredMatch { id, score }
        })
        .collect();

    let mut survivors: Vec<ScoredMatch> = scores
        .iter()
        .copied()
        .filter(|m| m.score < params.threshold)
        .collect();

    if survivors.is_empty() {
        tracing::info!(
            candidates = scores.len(),
            threshold = params.threshold,
            "no images match the reference colors"
        );
        return Ranking::NoMatch { scores };
    }

    survivors.sort_by(compare_scored_match);
    tracing::info!(matched = survivors.len(), "found matching images");
    Ranking::Matches(survivors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(hexes: &[&str]) -> Palette {
        Palette::from_hex(hexes).unwrap()
    }

    fn id(n: u64) -> ImageId {
        ImageId(n)
    }

    // --- palette_similarity ---

    #[test]
    fn test_similarity_identical_dominant_is_zero() {
        let a = palette(&["#FF0000", "#00FF00", "#0000FF", "#123456"]);
        let b = palette(&["#FF0000", "#00FF00", "#0000FF", "#FFFFFF"]);
        assert_eq!(palette_similarity(&a, &b, 3), 0.0);
    }

    #[test]
    fn test_similarity_is_asymmetric() {
        let a = palette(&["#FF0000", "#00FF00", "#0000FF"]);
        let b = palette(&["#FF0000", "#FF0000", "#FF0000"]);
        let ab = palette_similarity(&a, &b, 3);
        let ba = palette_similarity(&b, &a, 3);
        assert_eq!(ba, 0.0);
        assert!(ab > 200.0, "ab={ab}");
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_similarity_only_uses_dominant_colors() {
        let a = palette(&["#FF0000", "#00FF00", "#0000FF", "#000000"]);
        let b = palette(&["#FF0000", "#00FF00", "#0000FF", "#FFFFFF"]);
        assert_eq!(palette_similarity(&a, &b, 3), 0.0);
        assert!(palette_similarity(&a, &b, 4) > 0.0);
    }

    #[test]
    fn test_similarity_empty_is_infinite() {
        let a = palette(&["#FF0000"]);
        assert!(palette_similarity(&a, &Palette::default(), 3).is_infinite());
        assert!(palette_similarity(&Palette::default(), &a, 3).is_infinite());
    }

    // --- rank_by_similarity ---

    #[test]
    fn test_rank_exact_match_first() {
        let reference = palette(&["#FF0000", "#00FF00", "#0000FF"]);
        let near = palette(&["#FA0000", "#00FA00", "#0000FA"]);
        let exact = palette(&["#FF0000", "#00FF00", "#0000FF"]);
        let ranking = rank_by_similarity(
            &reference,
            vec![(id(1), &near), (id(2), &exact)],
            MatchParams::default(),
        );
        match ranking {
            Ranking::Matches(m) => {
                assert_eq!(m[0].id, id(2));
                assert_eq!(m[0].score, 0.0);
                assert_eq!(m[1].id, id(1));
            }
            other => panic!("expected matches, got {other:?}"),
        }
    }

    #[test]
    fn test_rank_filters_at_threshold() {
        let reference = palette(&["#000000"]);
        let exactly_40 = palette(&["#000028"]); // distance 40
        let under = palette(&["#000027"]); // distance 39
        let ranking = rank_by_similarity(
            &reference,
            vec![(id(1), &exactly_40), (id(2), &under)],
            MatchParams::default(),
        );
        assert_eq!(ranking.order_or_fallback(&[id(1), id(2)]), vec![id(2)]);
    }

    #[test]
    fn test_rank_no_match_falls_back_to_original_order() {
        let reference = palette(&["#000000", "#000000", "#000000"]);
        let far = palette(&["#FFFFFF"]);
        let farther = palette(&["#FF00FF"]);
        let candidates = vec![(id(3), &far), (id(1), &farther)];
        let ranking = rank_by_similarity(&reference, candidates, MatchParams::default());
        assert!(ranking.is_no_match());
        assert_eq!(ranking.order_or_fallback(&[id(3), id(1)]), vec![id(3), id(1)]);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let reference = palette(&["#101010"]);
        let same = palette(&["#101010"]);
        let ranking = rank_by_similarity(
            &reference,
            vec![(id(5), &same), (id(2), &same), (id(9), &same)],
            MatchParams::default(),
        );
        assert_eq!(ranking.order_or_fallback(&[]), vec![id(5), id(2), id(9)]);
    }

    #[test]
    fn test_rank_custom_params() {
        let reference = palette(&["#000000", "#FFFFFF"]);
        let candidate = palette(&["#000000", "#FF0000"]);
        let strict = MatchParams {
            threshold: 1.0,
            dominant_count: 1,
        };
        assert!(!rank_by_similarity(&reference, vec![(id(1), &candidate)], strict).is_no_match());
        let wide = MatchParams {
            threshold: 1.0,
            dominant_count: 2,
        };
        assert!(rank_by_similarity(&reference, vec![(id(1), &candidate)], wide).is_no_match());
    }

    #[test]
    fn test_score_of() {
        let reference = palette(&["#000000"]);
        let c = palette(&["#000003"]);
        let ranking = rank_by_similarity(&reference, vec![(id(1), &c)], MatchParams::default());
        assert_eq!(ranking.score_of(id(1)), Some(3.0));
        assert_eq!(ranking.score_of(id(2)), None);
    }
}
