use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// One entry of a classification or detection payload. Only the label and
/// its score are read; anything else the provider sends is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelEntry {
    #[serde(alias = "name", alias = "class")]
    pub label: String,
    #[serde(default, alias = "confidence", alias = "probability")]
    pub score: Option<f32>,
}

/// A text-image match score for the candidate at the same position.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MatchEntry {
    Bare(f32),
    Scored {
        #[serde(default, alias = "confidence", alias = "probability")]
        score: Option<f32>,
    },
    Missing,
}

impl MatchEntry {
    pub fn score(&self) -> Option<f32> {
        match self {
            MatchEntry::Bare(score) => Some(*score),
            MatchEntry::Scored { score } => *score,
            MatchEntry::Missing => None,
        }
    }
}

/// Strips the hosted-provider envelope `{"success": .., "result": ..}`.
pub fn unwrap_envelope(payload: Value) -> Result<Value> {
    match payload {
        Value::Object(mut map) => {
            if map.get("success").and_then(Value::as_bool) == Some(false) {
                let errors = map
                    .get("errors")
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no details".to_string());
                anyhow::bail!("provider reported failure: {errors}");
            }
            match map.remove("result") {
                Some(Value::Null) | None => anyhow::bail!("payload has no result"),
                Some(result) => Ok(result),
            }
        }
        Value::Array(_) => Ok(payload),
        other => anyhow::bail!("unexpected payload shape: {}", kind_of(&other)),
    }
}

/// Entries that do not carry a label are skipped; the rest of the list is
/// still used.
pub fn parse_labels(payload: Value) -> Result<Vec<LabelEntry>> {
    let items = into_items(unwrap_envelope(payload)?)?;
    let total = items.len();
    let entries: Vec<LabelEntry> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!(error = %err, "skipping unreadable label entry");
                None
            }
        })
        .collect();
    if entries.len() < total {
        debug!(kept = entries.len(), total, "dropped malformed label entries");
    }
    Ok(entries)
}

/// Unreadable positions become `Missing` so scores stay aligned with the
/// candidate list.
pub fn parse_matches(payload: Value) -> Result<Vec<MatchEntry>> {
    let items = into_items(unwrap_envelope(payload)?)?;
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or(MatchEntry::Missing))
        .collect())
}

fn into_items(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        other => anyhow::bail!("expected a list, got {}", kind_of(&other)),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
