use std::cmp::Ordering;

use crate::config::EnsembleConfig;
use crate::core::confidence::{cap_score, weighted_score};
use crate::core::model::{Prediction, WordScore};
use crate::fusion::compare::similarity;

/// Scores every candidate against every prediction and returns the
/// candidates best-first. Equal scores keep their input order.
pub fn rank(candidates: &[String], predictions: &[Prediction], config: &EnsembleConfig) -> Vec<WordScore> {
    let mut scores: Vec<WordScore> = candidates
        .iter()
        .map(|word| score_candidate(word, predictions, config))
        .collect();
    sort_scores(&mut scores);
    scores
}

fn score_candidate(word: &str, predictions: &[Prediction], config: &EnsembleConfig) -> WordScore {
    let mut best = 0.0_f32;
    let mut best_label = None;
    for prediction in predictions {
        let raw = weighted_score(similarity(word, prediction), prediction, config);
        if raw > best {
            best = raw;
            best_label = Some(prediction.label.clone());
        }
    }
    WordScore {
        word: word.to_string(),
        score: cap_score(best, config),
        best_match_label: best_label,
    }
}

/// Descending by score; `sort_by` is stable so ties keep candidate order.
pub fn sort_scores(scores: &mut [WordScore]) {
    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}
