use std::time::Duration;

use base64::Engine;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use tracing::info;

use crate::config::EnsembleConfig;
use crate::core::model::GuessResult;
use crate::error::GuessError;
use crate::fusion::{EnsembleEngine, SimpleEnsembleEngine};
use crate::recognizer::{gather, RecognitionSource};

#[derive(Debug, Clone)]
pub struct GuessConfig {
    pub ensemble: EnsembleConfig,
    /// Per-source limit; a source that exceeds it counts as failed.
    pub source_timeout: Option<Duration>,
    /// Keep the diagnostic payload on the returned result.
    pub debug: bool,
}

impl GuessConfig {
    pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(ensemble: EnsembleConfig, source_timeout: Option<Duration>, debug: bool) -> Self {
        Self {
            ensemble,
            source_timeout,
            debug,
        }
    }
}

impl Default for GuessConfig {
    fn default() -> Self {
        Self::new(
            EnsembleConfig::default(),
            Some(Self::DEFAULT_SOURCE_TIMEOUT),
            false,
        )
    }
}

/// A drawing and the words it may depict.
#[derive(Debug, Clone)]
pub struct GuessRequest {
    pub image: Vec<u8>,
    pub words: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WireRequest {
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    words: Option<Vec<String>>,
}

impl GuessRequest {
    pub fn new(image: Vec<u8>, words: Vec<String>) -> Self {
        Self { image, words }
    }

    /// Parses `{"image": "<data URL or base64>", "words": [..]}`.
    pub fn from_json(body: &str) -> Result<Self, GuessError> {
        let wire: WireRequest =
            serde_json::from_str(body).map_err(|e| GuessError::json("parse guess request", e))?;
        let image = match wire.image.as_deref().map(str::trim) {
            Some(image) if !image.is_empty() => decode_image(image)?,
            _ => return Err(GuessError::invalid_input("image is required")),
        };
        let request = Self::new(image, wire.words.unwrap_or_default());
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), GuessError> {
        if self.image.is_empty() {
            return Err(GuessError::invalid_input("image is required"));
        }
        if self.words.is_empty() {
            return Err(GuessError::invalid_input("words must be a non-empty list"));
        }
        if self.words.iter().any(|w| w.trim().is_empty()) {
            return Err(GuessError::invalid_input("words must not contain empty entries"));
        }
        Ok(())
    }
}

/// Accepts `data:<mime>;base64,<payload>` or a bare base64 string.
pub fn decode_image(image: &str) -> Result<Vec<u8>, GuessError> {
    let encoded = match image.strip_prefix("data:") {
        Some(rest) => match rest.split_once(',') {
            Some((meta, data)) if meta.ends_with(";base64") => data,
            _ => return Err(GuessError::invalid_input("image data URL must be base64 encoded")),
        },
        None => image,
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| GuessError::invalid_input(format!("image is not valid base64: {e}")))?;
    if bytes.is_empty() {
        return Err(GuessError::invalid_input("image is empty"));
    }
    Ok(bytes)
}

pub struct Guesser {
    sources: Vec<Box<dyn RecognitionSource>>,
    engine: SimpleEnsembleEngine,
    config: GuessConfig,
}

impl Guesser {
    pub fn new(config: GuessConfig) -> Self {
        let engine = SimpleEnsembleEngine::with_config(config.ensemble.clone());
        Self {
            sources: Vec::new(),
            engine,
            config,
        }
    }

    pub fn with_source(mut self, source: Box<dyn RecognitionSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub async fn guess(&self, request: &GuessRequest) -> Result<GuessResult, GuessError> {
        self.run(request, None).await
    }

    /// Same as `guess` but with a reproducible fallback.
    pub async fn guess_seeded(&self, request: &GuessRequest, seed: u64) -> Result<GuessResult, GuessError> {
        self.run(request, Some(seed)).await
    }

    async fn run(&self, request: &GuessRequest, seed: Option<u64>) -> Result<GuessResult, GuessError> {
        request.validate()?;

        let raw = if self.sources.is_empty() {
            info!("no recognition source configured");
            Vec::new()
        } else {
            gather(
                &self.sources,
                &request.image,
                &request.words,
                self.config.source_timeout,
            )
            .await
        };

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut result = self.engine.decide(&request.words, &raw, &mut rng)?;
        if !self.config.debug {
            result.debug = None;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_data_url_request() {
        // "hi" in base64
        let body = r#"{"image": "data:image/png;base64,aGk=", "words": ["猫", "狗"]}"#;
        let request = GuessRequest::from_json(body).unwrap();
        assert_eq!(request.image, b"hi");
        assert_eq!(request.words, vec!["猫", "狗"]);
    }

    #[test]
    fn empty_words_are_invalid_input() {
        let body = r#"{"image": "aGk=", "words": []}"#;
        let err = GuessRequest::from_json(body).unwrap_err();
        assert!(matches!(err, GuessError::InvalidInput { .. }));
        assert!(err.is_client_error());
    }

    #[test]
    fn missing_image_is_invalid_input() {
        let err = GuessRequest::from_json(r#"{"words": ["猫"]}"#).unwrap_err();
        assert!(matches!(err, GuessError::InvalidInput { .. }));
    }

    #[test]
    fn non_list_words_are_a_client_error() {
        let err = GuessRequest::from_json(r#"{"image": "aGk=", "words": "猫"}"#).unwrap_err();
        assert!(matches!(err, GuessError::Json { .. }));
        assert!(err.is_client_error());
    }

    #[test]
    fn rejects_non_base64_data_url() {
        assert!(decode_image("data:image/png,raw").is_err());
        assert!(decode_image("!!!").is_err());
    }

    #[test]
    fn blank_word_is_invalid() {
        let request = GuessRequest::new(b"png".to_vec(), vec!["猫".to_string(), " ".to_string()]);
        assert!(request.validate().is_err());
    }

    #[tokio::test]
    async fn unconfigured_guesser_falls_back() {
        let guesser = Guesser::new(GuessConfig::default());
        let request = GuessRequest::new(b"png".to_vec(), vec!["猫".to_string(), "狗".to_string()]);
        let result = guesser.guess_seeded(&request, 9).await.unwrap();
        assert!(request.words.contains(&result.guess));
        assert!(result.debug.is_none());
        assert_eq!(guesser.source_count(), 0);
    }
}
