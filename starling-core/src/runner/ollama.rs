//! Ollama runner implementation
//!
//! Spawns `ollama run <model>`, delivers the prompt on stdin, and collects
//! both output streams until the process exits on its own.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::RunnerConfig;
use crate::{Error, Result};

use super::backend::{ModelRunner, RunOutput};

/// Model runner backed by a local ollama installation
#[derive(Debug, Clone)]
pub struct OllamaRunner {
    ollama_path: String,
    timeout: Option<Duration>,
}

impl OllamaRunner {
    /// Create a new runner with default settings
    pub fn new() -> Self {
        Self {
            ollama_path: "ollama".to_string(),
            timeout: None,
        }
    }

    /// Create a runner from configuration
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self {
            ollama_path: config.ollama_path.clone(),
            timeout: config.timeout,
        }
    }

    /// Create a runner with a custom executable path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.ollama_path = path.into();
        self
    }

    /// Set a wall-clock limit for one invocation
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn build_command(&self, model: &str) -> Command {
        let mut cmd = Command::new(&self.ollama_path);
        cmd.arg("run")
            .arg(model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed-out invocation must not leave the model process running
            .kill_on_drop(true);

        cmd
    }
}

impl Default for OllamaRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelRunner for OllamaRunner {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn invoke(&self, prompt: &str, model: &str) -> Result<RunOutput> {
        let mut cmd = self.build_command(model);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Spawn(format!(
                    "Ollama executable not found at '{}'. Is Ollama installed?",
                    self.ollama_path
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Spawn("Failed to open ollama stdin".to_string()))?;
        stdin.write_all(prompt.as_bytes()).await.map_err(Error::Io)?;
        // Dropping stdin closes the pipe and signals end-of-input; ollama
        // runs the prompt to completion and exits.
        drop(stdin);

        let wait = child.wait_with_output();
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, wait).await {
                Ok(result) => result.map_err(Error::Io)?,
                Err(_) => {
                    tracing::warn!(model = %model, ?limit, "Model invocation timed out");
                    return Err(Error::Timeout {
                        model: model.to_string(),
                        elapsed: limit,
                    });
                }
            },
            None => wait.await.map_err(Error::Io)?,
        };

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !stderr.is_empty() {
            tracing::debug!(model = %model, stderr = %stderr, "Ollama stderr");
        }
        tracing::debug!(
            model = %model,
            exit_code = ?output.status.code(),
            "Ollama process finished"
        );

        Ok(RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr,
            success: output.status.success(),
            exit_code: output.status.code(),
        })
    }

    fn is_available(&self) -> bool {
        std::process::Command::new(&self.ollama_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }
}
