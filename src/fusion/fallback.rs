use rand::Rng;

use crate::config::EnsembleConfig;
use crate::core::confidence::fallback_confidence;
use crate::core::model::{GuessResult, WordScore};
use crate::core::vocabulary::reference_pool;
use crate::fusion::compare::label_similarity;
use crate::fusion::rank::sort_scores;

/// Produces a guess without any recognizer by scoring candidates against the
/// built-in reference labels and adding bounded noise. Returns `None` only
/// for an empty candidate list.
pub fn fallback_guess<R: Rng + ?Sized>(
    candidates: &[String],
    config: &EnsembleConfig,
    rng: &mut R,
) -> Option<GuessResult> {
    let pool = reference_pool();
    let mut scores: Vec<WordScore> = candidates
        .iter()
        .map(|word| {
            let (best, label) = best_reference(word, pool);
            let jitter: f32 = rng.gen_range(0.0..1.0);
            WordScore {
                word: word.clone(),
                score: fallback_confidence(best, jitter, config),
                best_match_label: label.map(str::to_string),
            }
        })
        .collect();
    sort_scores(&mut scores);
    GuessResult::from_ranked(scores)
}

fn best_reference<'a>(word: &str, pool: &[&'a str]) -> (f32, Option<&'a str>) {
    pool.iter().fold((0.0_f32, None), |(best, label), reference| {
        let sim = label_similarity(word, reference);
        if sim > best {
            (sim, Some(*reference))
        } else {
            (best, label)
        }
    })
}
