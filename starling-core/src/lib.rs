//! Starling Core - Core library for batch code review orchestration
//!
//! This crate drives concurrent reviews of uploaded source files against
//! locally running LLM processes and enforces a strict JSON contract on
//! their output.

pub mod config;
pub mod error;
pub mod review;
pub mod runner;

pub use config::{Config, RunnerConfig, ServerConfig};
pub use error::{Error, Result};
pub use review::{BatchRequest, BatchReviewer, FileInput, Review, ReviewResult, Verdict};
pub use runner::{ModelRunner, OllamaRunner, RunOutput};
