//! Runner abstraction for external model processes

use async_trait::async_trait;

use crate::Result;

/// Captured output of one completed model invocation
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Everything the process wrote to stdout
    pub stdout: String,
    /// Everything the process wrote to stderr
    pub stderr: String,
    /// Whether the process exited with status zero
    pub success: bool,
    /// Raw exit code, when the platform reports one
    pub exit_code: Option<i32>,
}

impl RunOutput {
    /// Output of a clean run that produced the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            success: true,
            exit_code: Some(0),
        }
    }

    /// Output of a run that exited with the given non-zero code
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            success: false,
            exit_code: Some(code),
        }
    }
}

/// Trait for external model runners
///
/// One invocation writes the prompt to the process's input channel, closes
/// it, and collects the full output streams plus the exit status. Spawn
/// failures and timeouts are errors; a non-zero exit is not — it comes back
/// as a `RunOutput` so the caller decides how to report it.
#[async_trait]
pub trait ModelRunner: Send + Sync {
    /// Get the name of this runner
    fn name(&self) -> &'static str;

    /// Run the model to completion with the given prompt
    async fn invoke(&self, prompt: &str, model: &str) -> Result<RunOutput>;

    /// Check if this runner is available on the system
    fn is_available(&self) -> bool;
}
