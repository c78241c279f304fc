//! Batch code review orchestration
//!
//! A batch of files fans out to one model invocation per file; each
//! invocation's free-form output is forced into the review contract, and the
//! batch settles all-or-nothing.

mod batch;
mod extract;
mod prompt;
mod types;

pub use batch::BatchReviewer;
pub use extract::{extract_json_object, parse_review};
pub use prompt::build_prompt;
pub use types::{BatchRequest, FileInput, Review, ReviewResult, Verdict};
