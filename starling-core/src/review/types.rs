//! Review data model
//!
//! Wire names match what the browser client already speaks: `verdict` is one
//! of the literal strings "OK" or "NEEDS_IMPROVEMENT", and the corrected
//! source travels as `correctedCode`.

use serde::{Deserialize, Serialize};

/// One file submitted for review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInput {
    /// Display name, used to correlate the result back to the upload.
    /// Duplicates are legal; each copy is reviewed independently.
    pub filename: String,
    /// Full file content, passed to the model verbatim
    pub content: String,
}

impl FileInput {
    /// Create a new file input
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// The model's verdict on one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The file is fine as-is
    #[serde(rename = "OK")]
    Ok,
    /// The file has issues worth fixing
    #[serde(rename = "NEEDS_IMPROVEMENT")]
    NeedsImprovement,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Ok => write!(f, "OK"),
            Verdict::NeedsImprovement => write!(f, "NEEDS_IMPROVEMENT"),
        }
    }
}

/// The structured review extracted from model output
///
/// `verdict` must be present and recognized for extraction to succeed;
/// `explanation` and `correctedCode` fall back to empty strings when the
/// model omits them, so they are never null on the wire. Extra fields the
/// model invents are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// OK or NEEDS_IMPROVEMENT
    pub verdict: Verdict,
    /// One-paragraph explanation of the findings
    #[serde(default)]
    pub explanation: String,
    /// Full corrected version of the file
    #[serde(rename = "correctedCode", default)]
    pub corrected_code: String,
}

/// A review correlated back to the file it was produced for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResult {
    /// Filename of the originating [`FileInput`]
    pub filename: String,
    /// The extracted review
    pub review: Review,
}

/// A batch of files submitted in one review request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Files to review, in the order results must come back
    pub files: Vec<FileInput>,
    /// Model identifier; the configured default is used when absent or empty
    #[serde(default)]
    pub model: Option<String>,
}

impl BatchRequest {
    /// Create a batch request for the given files
    pub fn new(files: Vec<FileInput>) -> Self {
        Self { files, model: None }
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
