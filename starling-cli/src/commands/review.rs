//! Review command - review files straight from disk

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use starling_core::{BatchRequest, BatchReviewer, Config, FileInput, OllamaRunner, Verdict};

/// Arguments for the review command
#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Files to review
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

impl ReviewArgs {
    /// Execute the review command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let mut inputs = Vec::with_capacity(self.files.len());
        for path in &self.files {
            let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                anyhow::anyhow!("Failed to read {}: {}", path.display(), e)
            })?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            inputs.push(FileInput::new(filename, content));
        }

        if verbose {
            tracing::info!(
                files = inputs.len(),
                model = %config.runner.default_model,
                "Starting review"
            );
        }

        let runner = OllamaRunner::from_config(&config.runner);
        let reviewer = BatchReviewer::new(Arc::new(runner), &config.runner);

        println!("Starling Review");
        println!("===============");
        println!();
        println!("Model: {}", config.runner.default_model);
        println!("Files: {}", inputs.len());
        println!();

        let results = reviewer.review_batch(BatchRequest::new(inputs)).await?;

        for result in &results {
            println!("{} — {}", result.filename, result.review.verdict);
            if !result.review.explanation.is_empty() {
                println!("  {}", result.review.explanation);
            }
            if result.review.verdict == Verdict::NeedsImprovement
                && !result.review.corrected_code.is_empty()
            {
                println!();
                println!("  Suggested version:");
                for line in result.review.corrected_code.lines() {
                    println!("  | {}", line);
                }
            }
            println!();
        }

        let needs_work = results
            .iter()
            .filter(|r| r.review.verdict == Verdict::NeedsImprovement)
            .count();
        println!(
            "{} file(s) reviewed, {} need(s) improvement",
            results.len(),
            needs_work
        );

        Ok(())
    }
}
