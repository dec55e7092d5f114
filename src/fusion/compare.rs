use crate::core::model::{Prediction, SourceKind};
use crate::core::vocabulary::translate;

const EXACT_SCORE: f32 = 1.0;
const CANDIDATE_IN_LABEL_SCORE: f32 = 0.9;
const LABEL_IN_CANDIDATE_SCORE: f32 = 0.85;
const TOKEN_EQUAL_AWARD: f32 = 1.0;
const TOKEN_CONTAINS_AWARD: f32 = 0.7;
/// Tokens this short or shorter never take part in overlap scoring.
const MIN_TOKEN_CHARS: usize = 2;

/// A comparison tier over a lower-cased canonical candidate and label.
pub type Tier = fn(&str, &str) -> f32;

/// Evaluated in order; the best tier wins.
pub const TIERS: &[Tier] = &[exact_match, containment, token_overlap];

/// Similarity between a display-language candidate and a prediction.
///
/// A text-match prediction is a score for one specific candidate, so it only
/// counts for the candidate it was issued for.
pub fn similarity(candidate: &str, prediction: &Prediction) -> f32 {
    match prediction.source {
        SourceKind::TextMatch => own_candidate(candidate, &prediction.label),
        SourceKind::Classification | SourceKind::Detection => {
            label_similarity(candidate, &prediction.label)
        }
    }
}

/// Translates the candidate and compares it with a recognizer label.
pub fn label_similarity(candidate: &str, label: &str) -> f32 {
    canonical_similarity(&translate(candidate), &label.to_lowercase())
}

fn own_candidate(candidate: &str, label: &str) -> f32 {
    if candidate.trim().to_lowercase() == label.trim().to_lowercase() {
        EXACT_SCORE
    } else {
        0.0
    }
}

pub fn canonical_similarity(canonical: &str, label: &str) -> f32 {
    let canonical = canonical.trim();
    let label = label.trim();
    if canonical.is_empty() || label.is_empty() {
        return 0.0;
    }
    TIERS
        .iter()
        .map(|tier| tier(canonical, label))
        .fold(0.0_f32, f32::max)
}

pub fn exact_match(canonical: &str, label: &str) -> f32 {
    if canonical == label {
        EXACT_SCORE
    } else {
        0.0
    }
}

pub fn containment(canonical: &str, label: &str) -> f32 {
    if label.contains(canonical) {
        CANDIDATE_IN_LABEL_SCORE
    } else if canonical.contains(label) {
        LABEL_IN_CANDIDATE_SCORE
    } else {
        0.0
    }
}

pub fn token_overlap(canonical: &str, label: &str) -> f32 {
    let a_tokens = tokenize(canonical);
    let b_tokens = tokenize(label);
    let denom = a_tokens.len().max(b_tokens.len());
    if denom == 0 {
        return 0.0;
    }

    let mut awarded = 0.0;
    for a in a_tokens.iter().filter(|t| t.chars().count() > MIN_TOKEN_CHARS) {
        for b in b_tokens.iter().filter(|t| t.chars().count() > MIN_TOKEN_CHARS) {
            if a == b {
                awarded += TOKEN_EQUAL_AWARD;
            } else if a.contains(b) || b.contains(a) {
                awarded += TOKEN_CONTAINS_AWARD;
            }
        }
    }
    (awarded / denom as f32).min(1.0)
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|t| !t.is_empty())
        .collect()
}
