use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::model::SourceKind;
use crate::error::GuessError;

/// Tunable constants of the ensemble. Only their relative ordering matters
/// for behaviour; `validate` enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    pub text_match_weight: f32,
    pub classification_weight: f32,
    pub detection_weight: f32,
    /// Upper bound on any reported score.
    pub score_ceiling: f32,
    pub fallback_floor: f32,
    pub fallback_jitter: f32,
    /// Used when a source omits a confidence.
    pub default_confidence: f32,
    pub text_match_default_score: f32,
}

impl EnsembleConfig {
    pub const DEFAULT_SCORE_CEILING: f32 = 0.95;

    pub fn from_json(path: &Path) -> Result<Self, GuessError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| GuessError::io("read ensemble config", e))?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| GuessError::json("parse ensemble config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn weight(&self, kind: SourceKind) -> f32 {
        match kind {
            SourceKind::TextMatch => self.text_match_weight,
            SourceKind::Classification => self.classification_weight,
            SourceKind::Detection => self.detection_weight,
        }
    }

    pub fn validate(&self) -> Result<(), GuessError> {
        let weights_ordered = self.text_match_weight >= self.classification_weight
            && self.classification_weight >= self.detection_weight
            && self.detection_weight > 0.0;
        if !weights_ordered {
            return Err(GuessError::config(
                "source weights must satisfy textmatch >= classification >= detection > 0",
            ));
        }
        if !(self.score_ceiling > 0.0 && self.score_ceiling < 1.0) {
            return Err(GuessError::config("score_ceiling must lie in (0, 1)"));
        }
        if self.fallback_floor < 0.0
            || self.fallback_jitter < 0.0
            || self.fallback_floor + self.fallback_jitter > 1.0
        {
            return Err(GuessError::config(
                "fallback_floor and fallback_jitter must be non-negative and sum to at most 1",
            ));
        }
        for (name, value) in [
            ("default_confidence", self.default_confidence),
            ("text_match_default_score", self.text_match_default_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GuessError::config(format!("{name} must lie in [0, 1]")));
            }
        }
        Ok(())
    }
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            text_match_weight: 1.5,
            classification_weight: 1.2,
            detection_weight: 1.0,
            score_ceiling: Self::DEFAULT_SCORE_CEILING,
            fallback_floor: 0.85,
            fallback_jitter: 0.15,
            default_confidence: 0.5,
            text_match_default_score: 0.7,
        }
    }
}
