use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Classification,
    Detection,
    TextMatch,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Classification => "classification",
            SourceKind::Detection => "detection",
            SourceKind::TextMatch => "textmatch",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GuessMode {
    Ensemble,
    Fallback,
}

/// One label reported by a recognition source, after normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
    pub source: SourceKind,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f32, source: SourceKind) -> Self {
        Self {
            label: label.into(),
            confidence,
            source,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordScore {
    pub word: String,
    pub score: f32,
    #[serde(
        rename = "bestMatchLabel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub best_match_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: SourceKind,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessDebug {
    pub mode: GuessMode,
    pub predictions: Vec<Prediction>,
    pub failures: Vec<SourceFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessResult {
    pub guess: String,
    pub confidence: f32,
    #[serde(rename = "allResults")]
    pub all_results: Vec<WordScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<GuessDebug>,
}

impl GuessResult {
    /// Builds a result from scores already sorted best-first.
    pub fn from_ranked(ranked: Vec<WordScore>) -> Option<Self> {
        let top = ranked.first()?;
        Some(Self {
            guess: top.word.clone(),
            confidence: top.score,
            all_results: ranked,
            debug: None,
        })
    }

    pub fn is_correct(&self, selected: &str) -> bool {
        self.guess.to_lowercase() == selected.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_takes_top_of_ranking() {
        let ranked = vec![
            WordScore {
                word: "dog".to_string(),
                score: 0.8,
                best_match_label: Some("dog".to_string()),
            },
            WordScore {
                word: "cat".to_string(),
                score: 0.1,
                best_match_label: None,
            },
        ];
        let result = GuessResult::from_ranked(ranked).expect("non-empty ranking");
        assert_eq!(result.guess, "dog");
        assert!((result.confidence - 0.8).abs() < 1e-6);
        assert_eq!(result.all_results.len(), 2);
        assert!(GuessResult::from_ranked(Vec::new()).is_none());
    }

    #[test]
    fn correctness_ignores_case() {
        let result = GuessResult {
            guess: "Dog".to_string(),
            confidence: 0.5,
            all_results: Vec::new(),
            debug: None,
        };
        assert!(result.is_correct("dog"));
        assert!(!result.is_correct("cat"));
    }

    #[test]
    fn serializes_response_contract() {
        let result = GuessResult {
            guess: "猫".to_string(),
            confidence: 0.5,
            all_results: vec![WordScore {
                word: "猫".to_string(),
                score: 0.5,
                best_match_label: None,
            }],
            debug: None,
        };
        let json = serde_json::to_value(&result).expect("serializable");
        assert_eq!(json["guess"], "猫");
        assert!(json.get("allResults").is_some());
        assert!(json.get("debug").is_none());
        assert!(json["allResults"][0].get("bestMatchLabel").is_none());
    }
}
