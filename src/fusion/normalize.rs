use anyhow::Result;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::EnsembleConfig;
use crate::core::model::{Prediction, SourceFailure, SourceKind};
use crate::recognizer::payload::{parse_labels, parse_matches};
use crate::recognizer::{RawSourceResult, SourceOutcome};

#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub predictions: Vec<Prediction>,
    pub failures: Vec<SourceFailure>,
}

impl Normalized {
    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

/// Merges raw source results into one prediction list. A source that failed
/// or sent something unreadable contributes nothing and is recorded in
/// `failures`; the others are unaffected.
pub fn normalize(
    raw: &[RawSourceResult],
    candidates: &[String],
    config: &EnsembleConfig,
) -> Normalized {
    let mut normalized = Normalized::default();

    for result in raw {
        let payload = match &result.outcome {
            SourceOutcome::Payload(payload) => payload.clone(),
            SourceOutcome::Failed(_) => {
                normalized.failures.extend(result.failure());
                continue;
            }
        };

        match normalize_payload(result.kind, payload, candidates, config) {
            Ok(predictions) => {
                debug!(source = %result.kind, count = predictions.len(), "normalized predictions");
                normalized.predictions.extend(predictions);
            }
            Err(err) => {
                warn!(source = %result.kind, error = %format!("{err:#}"), "discarding malformed payload");
                normalized.failures.push(SourceFailure {
                    source: result.kind,
                    reason: format!("{err:#}"),
                });
            }
        }
    }

    normalized
}

fn normalize_payload(
    kind: SourceKind,
    payload: Value,
    candidates: &[String],
    config: &EnsembleConfig,
) -> Result<Vec<Prediction>> {
    match kind {
        SourceKind::Classification | SourceKind::Detection => {
            let entries = parse_labels(payload)?;
            Ok(entries
                .into_iter()
                .filter(|entry| !entry.label.trim().is_empty())
                .map(|entry| {
                    let confidence = sanitize(entry.score, config.default_confidence);
                    Prediction::new(entry.label, confidence, kind)
                })
                .collect())
        }
        SourceKind::TextMatch => {
            let entries = parse_matches(payload)?;
            Ok(candidates
                .iter()
                .zip(entries.iter())
                .map(|(word, entry)| {
                    let confidence = sanitize(entry.score(), config.text_match_default_score);
                    Prediction::new(word.to_lowercase(), confidence, kind)
                })
                .collect())
        }
    }
}

fn sanitize(score: Option<f32>, default: f32) -> f32 {
    match score {
        Some(value) if value.is_finite() => value.clamp(0.0, 1.0),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn classification_and_detection_keep_labels() {
        let raw = vec![
            RawSourceResult::payload(
                SourceKind::Classification,
                json!({ "success": true, "result": [{ "label": "Dog", "score": 0.9 }] }),
            ),
            RawSourceResult::payload(SourceKind::Detection, json!([{ "label": "person" }])),
        ];
        let out = normalize(&raw, &words(&["狗"]), &EnsembleConfig::default());
        assert_eq!(out.predictions.len(), 2);
        assert_eq!(out.predictions[0], Prediction::new("Dog", 0.9, SourceKind::Classification));
        assert_eq!(out.predictions[1].confidence, 0.5);
        assert!(out.failures.is_empty());
    }

    #[test]
    fn text_match_aligns_with_candidates() {
        let raw = vec![RawSourceResult::payload(
            SourceKind::TextMatch,
            json!([0.2, { "label": "ignored" }]),
        )];
        let out = normalize(&raw, &words(&["Cat", "Dog", "Bird"]), &EnsembleConfig::default());
        assert_eq!(out.predictions.len(), 2);
        assert_eq!(out.predictions[0].label, "cat");
        assert_eq!(out.predictions[0].confidence, 0.2);
        assert_eq!(out.predictions[1].label, "dog");
        assert!((out.predictions[1].confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn failed_and_malformed_sources_are_recorded() {
        let raw = vec![
            RawSourceResult::failed(SourceKind::Classification, "HTTP 500"),
            RawSourceResult::payload(SourceKind::Detection, json!({ "unexpected": true })),
            RawSourceResult::payload(SourceKind::TextMatch, json!([0.8])),
        ];
        let out = normalize(&raw, &words(&["猫"]), &EnsembleConfig::default());
        assert_eq!(out.predictions.len(), 1);
        assert_eq!(out.failures.len(), 2);
        assert_eq!(out.failures[0].source, SourceKind::Classification);
        assert_eq!(out.failures[1].source, SourceKind::Detection);
    }

    #[test]
    fn one_bad_entry_keeps_the_rest_of_the_source() {
        let raw = vec![RawSourceResult::payload(
            SourceKind::Classification,
            json!([{ "label": "cat", "score": 0.9 }, { "score": 0.4 }]),
        )];
        let out = normalize(&raw, &words(&["猫"]), &EnsembleConfig::default());
        assert_eq!(out.predictions.len(), 1);
        assert_eq!(out.predictions[0].label, "cat");
        assert!(out.failures.is_empty());
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let raw = vec![RawSourceResult::payload(
            SourceKind::Detection,
            json!([{ "label": "cat", "score": 3.0 }, { "label": "dog", "score": -1.0 }]),
        )];
        let out = normalize(&raw, &words(&["猫"]), &EnsembleConfig::default());
        assert_eq!(out.predictions[0].confidence, 1.0);
        assert_eq!(out.predictions[1].confidence, 0.0);
    }

    #[test]
    fn nothing_usable_is_empty() {
        let raw = vec![RawSourceResult::payload(SourceKind::Detection, json!([]))];
        assert!(normalize(&raw, &words(&["猫"]), &EnsembleConfig::default()).is_empty());
        assert!(normalize(&[], &words(&["猫"]), &EnsembleConfig::default()).is_empty());
    }
}
