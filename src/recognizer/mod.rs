pub mod bridge;
pub mod payload;

use std::time::Duration;

use anyhow::Result;
use futures::future::{join_all, BoxFuture};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::model::{SourceFailure, SourceKind};

pub use bridge::CommandSource;

/// An external image recognizer. The payload is returned untyped; only the
/// normalizer decides which fields matter.
pub trait RecognitionSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    fn invoke<'a>(&'a self, image: &'a [u8], prompts: &'a [String]) -> BoxFuture<'a, Result<Value>>;
}

#[derive(Debug, Clone)]
pub enum SourceOutcome {
    Payload(Value),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RawSourceResult {
    pub kind: SourceKind,
    pub outcome: SourceOutcome,
}

impl RawSourceResult {
    pub fn payload(kind: SourceKind, payload: Value) -> Self {
        Self {
            kind,
            outcome: SourceOutcome::Payload(payload),
        }
    }

    pub fn failed(kind: SourceKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            outcome: SourceOutcome::Failed(reason.into()),
        }
    }

    pub fn failure(&self) -> Option<SourceFailure> {
        match &self.outcome {
            SourceOutcome::Failed(reason) => Some(SourceFailure {
                source: self.kind,
                reason: reason.clone(),
            }),
            SourceOutcome::Payload(_) => None,
        }
    }
}

/// Invokes every source concurrently and waits for all of them. Errors and
/// timeouts come back as `SourceOutcome::Failed`; this never fails as a whole.
pub async fn gather(
    sources: &[Box<dyn RecognitionSource>],
    image: &[u8],
    prompts: &[String],
    timeout: Option<Duration>,
) -> Vec<RawSourceResult> {
    let calls = sources.iter().map(|source| async move {
        let kind = source.kind();
        let call = source.invoke(image, prompts);
        let outcome = match timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(anyhow::anyhow!("timed out after {} ms", limit.as_millis())),
            },
            None => call.await,
        };
        match outcome {
            Ok(payload) => {
                debug!(source = %kind, "recognition source answered");
                RawSourceResult::payload(kind, payload)
            }
            Err(err) => {
                warn!(source = %kind, error = %format!("{err:#}"), "recognition source failed");
                RawSourceResult::failed(kind, format!("{err:#}"))
            }
        }
    });
    join_all(calls).await
}
