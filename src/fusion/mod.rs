pub mod compare;
pub mod fallback;
pub mod normalize;
pub mod rank;

use rand::Rng;
use tracing::info;

use crate::config::EnsembleConfig;
use crate::core::model::{GuessDebug, GuessMode, GuessResult};
use crate::error::GuessError;
use crate::recognizer::RawSourceResult;

pub trait EnsembleEngine {
    /// Reduces raw source results to a single guess among `candidates`.
    fn decide(
        &self,
        candidates: &[String],
        raw: &[RawSourceResult],
        rng: &mut dyn rand::RngCore,
    ) -> Result<GuessResult, GuessError>;
}

#[derive(Debug, Default, Clone)]
pub struct SimpleEnsembleEngine {
    config: EnsembleConfig,
}

impl SimpleEnsembleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EnsembleConfig) -> Self {
        Self { config }
    }

    pub fn fallback<R: Rng + ?Sized>(&self, candidates: &[String], rng: &mut R) -> Result<GuessResult, GuessError> {
        fallback::fallback_guess(candidates, &self.config, rng)
            .ok_or_else(|| GuessError::internal("fallback guess", "candidate list is empty"))
    }
}

impl EnsembleEngine for SimpleEnsembleEngine {
    fn decide(
        &self,
        candidates: &[String],
        raw: &[RawSourceResult],
        rng: &mut dyn rand::RngCore,
    ) -> Result<GuessResult, GuessError> {
        let normalized = normalize::normalize(raw, candidates, &self.config);

        let (mut result, mode) = if normalized.is_empty() {
            info!(
                sources = raw.len(),
                failed = normalized.failures.len(),
                "no predictions available, using fallback guess"
            );
            (self.fallback(candidates, rng)?, GuessMode::Fallback)
        } else {
            let ranked = rank::rank(candidates, &normalized.predictions, &self.config);
            let result = GuessResult::from_ranked(ranked)
                .ok_or_else(|| GuessError::internal("rank candidates", "candidate list is empty"))?;
            (result, GuessMode::Ensemble)
        };

        result.debug = Some(GuessDebug {
            mode,
            predictions: normalized.predictions,
            failures: normalized.failures,
        });
        Ok(result)
    }
}
