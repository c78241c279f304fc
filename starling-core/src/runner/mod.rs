//! External model-runner boundary
//!
//! Everything that talks to the model process lives here. The rest of the
//! crate only sees the [`ModelRunner`] trait, so orchestration and extraction
//! can be tested against fakes without spawning anything.

mod backend;
mod ollama;

pub use backend::{ModelRunner, RunOutput};
pub use ollama::OllamaRunner;
