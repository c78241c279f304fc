//! JSON extraction from free-form model output
//!
//! Models are told to emit only a JSON object; they add prose anyway. The
//! boundary heuristic takes the substring from the first `{` to the last `}`
//! in the whole output — deliberately not a balanced-brace parse, for
//! compatibility with the reference behavior. Known limitation: output with
//! several JSON-like objects, or stray braces in prose, mis-extracts.

use crate::{Error, Result};

use super::types::Review;

/// Locate the candidate JSON object inside raw model output
///
/// Returns the greedy first-`{`-to-last-`}` substring, or an extraction
/// error carrying the full raw text when no such pair exists.
pub fn extract_json_object(output: &str) -> Result<&str> {
    let start = output.find('{');
    let end = output.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s <= e => Ok(&output[s..=e]),
        _ => Err(Error::Extraction {
            reason: "no JSON object found in model output".to_string(),
            raw: output.to_string(),
        }),
    }
}

/// Extract and parse a [`Review`] from raw model output
pub fn parse_review(output: &str) -> Result<Review> {
    let candidate = extract_json_object(output)?;

    serde_json::from_str(candidate).map_err(|e| Error::Extraction {
        reason: format!("model output is not a valid review: {}", e),
        raw: output.to_string(),
    })
}
