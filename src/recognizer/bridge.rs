use std::process::Stdio;

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::core::model::SourceKind;
use crate::recognizer::RecognitionSource;

/// Runs an external recognizer command. The image is written to stdin, the
/// command receives `--kind <kind>` plus one `--label <word>` per prompt and
/// must print a JSON payload on stdout.
#[derive(Debug, Clone)]
pub struct CommandSource {
    kind: SourceKind,
    program: String,
    args: Vec<String>,
}

impl CommandSource {
    pub fn new(kind: SourceKind, program: impl Into<String>) -> Self {
        Self {
            kind,
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Splits a command line such as `python3 recognize.py --model clip` on
    /// whitespace. Returns `None` for a blank line.
    pub fn from_command_line(kind: SourceKind, line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(kind, program).with_args(parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn run(&self, image: &[u8], prompts: &[String]) -> Result<Value> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg("--kind")
            .arg(self.kind.as_str());
        for prompt in prompts {
            command.arg("--label").arg(prompt);
        }
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to invoke recognizer `{}`", self.program))?;

        // stdin is fed while stdout and stderr are drained, so a chatty
        // recognizer cannot fill a pipe and stall. Dropping the handle closes
        // stdin once the image is written.
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                // A recognizer may exit without reading the image; that shows
                // up in its exit status instead.
                let _ = stdin.write_all(image).await;
            }
        };
        let ((), output) = tokio::join!(feed, child.wait_with_output());
        let output =
            output.with_context(|| format!("failed to wait for recognizer `{}`", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("recognizer `{}` failed: {}", self.program, stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let payload: Value = serde_json::from_str(stdout.trim())
            .with_context(|| "failed to parse recognizer JSON response")?;
        Ok(payload)
    }
}

impl RecognitionSource for CommandSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn invoke<'a>(&'a self, image: &'a [u8], prompts: &'a [String]) -> BoxFuture<'a, Result<Value>> {
        Box::pin(self.run(image, prompts))
    }
}
