use crate::config::EnsembleConfig;
use crate::core::model::Prediction;

/// Evidence a single prediction lends to a candidate, before the ceiling.
pub fn weighted_score(similarity: f32, prediction: &Prediction, config: &EnsembleConfig) -> f32 {
    similarity * prediction.confidence * config.weight(prediction.source)
}

pub fn cap_score(raw: f32, config: &EnsembleConfig) -> f32 {
    raw.clamp(0.0, config.score_ceiling)
}

/// Strong lexical matches get a high floor and little randomness; weak ones
/// are driven almost entirely by `jitter`, which must lie in `[0, 1)`.
pub fn fallback_confidence(max_similarity: f32, jitter: f32, config: &EnsembleConfig) -> f32 {
    let similarity = max_similarity.clamp(0.0, 1.0);
    let score = similarity * config.fallback_floor
        + jitter * config.fallback_jitter * (1.0 - similarity);
    cap_score(score, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::SourceKind;

    #[test]
    fn weights_follow_source_trust() {
        let config = EnsembleConfig::default();
        let text = weighted_score(1.0, &Prediction::new("x", 0.5, SourceKind::TextMatch), &config);
        let class = weighted_score(
            1.0,
            &Prediction::new("x", 0.5, SourceKind::Classification),
            &config,
        );
        let det = weighted_score(1.0, &Prediction::new("x", 0.5, SourceKind::Detection), &config);
        assert!(text > class && class > det);
    }

    #[test]
    fn caps_at_ceiling() {
        let config = EnsembleConfig::default();
        assert!((cap_score(1.08, &config) - 0.95).abs() < 1e-6);
        assert_eq!(cap_score(-0.2, &config), 0.0);
    }

    #[test]
    fn fallback_exact_match_has_no_randomness() {
        let config = EnsembleConfig::default();
        let low = fallback_confidence(1.0, 0.0, &config);
        let high = fallback_confidence(1.0, 0.99, &config);
        assert!((low - 0.85).abs() < 1e-6);
        assert!((high - 0.85).abs() < 1e-6);
    }

    #[test]
    fn fallback_without_match_is_pure_jitter() {
        let config = EnsembleConfig::default();
        let score = fallback_confidence(0.0, 0.5, &config);
        assert!((score - 0.075).abs() < 1e-6);
    }
}
