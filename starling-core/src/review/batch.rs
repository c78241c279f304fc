//! Batch review orchestration
//!
//! One model invocation per file, all in flight concurrently behind a
//! semaphore. The batch settles all-or-nothing: every file must produce a
//! review, or the whole batch fails with the first failing file's
//! diagnostics. Results come back in request order regardless of which
//! invocation finished first.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::RunnerConfig;
use crate::runner::ModelRunner;
use crate::{Error, Result};

use super::extract::parse_review;
use super::prompt::build_prompt;
use super::types::{BatchRequest, FileInput, ReviewResult};

/// Coordinates concurrent per-file reviews against a model runner
#[derive(Clone)]
pub struct BatchReviewer {
    runner: Arc<dyn ModelRunner>,
    default_model: String,
    limiter: Arc<Semaphore>,
}

impl BatchReviewer {
    /// Create a reviewer over the given runner, configured from `config`
    pub fn new(runner: Arc<dyn ModelRunner>, config: &RunnerConfig) -> Self {
        Self {
            runner,
            default_model: config.default_model.clone(),
            limiter: Arc::new(Semaphore::new(config.max_concurrent_reviews.max(1))),
        }
    }

    /// The model used when a request does not name one
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Review a single file with the given model
    pub async fn review_file(&self, file: &FileInput, model: &str) -> Result<ReviewResult> {
        review_one(self.runner.as_ref(), file, model).await
    }

    /// Review a whole batch, all-or-nothing
    ///
    /// Every file gets its own invocation, run concurrently up to the
    /// configured limit. All invocations run to completion before the batch
    /// settles; a failure anywhere fails the batch and no partial results
    /// are returned. On success the results align 1:1, in order, with
    /// `request.files`.
    pub async fn review_batch(&self, request: BatchRequest) -> Result<Vec<ReviewResult>> {
        if request.files.is_empty() {
            return Err(Error::Validation(
                "at least one file is required".to_string(),
            ));
        }

        let model = match request.model.as_deref() {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => self.default_model.clone(),
        };

        tracing::info!(
            model = %model,
            files = request.files.len(),
            "Starting batch review"
        );

        let mut handles = Vec::with_capacity(request.files.len());

        for file in request.files {
            let runner = Arc::clone(&self.runner);
            let limiter = Arc::clone(&self.limiter);
            let model = model.clone();

            handles.push(tokio::spawn(async move {
                let _permit = match limiter.acquire_owned().await {
                    Ok(permit) => permit,
                    // The semaphore lives as long as the reviewer and is
                    // never closed
                    Err(_) => return Err(Error::Spawn("review limiter closed".to_string())),
                };

                review_one(runner.as_ref(), &file, &model).await
            }));
        }

        // Await every task, even after a failure, so all processes run to
        // completion. Handles are in request order, so pushing successes in
        // join order restores the input ordering.
        let mut results = Vec::with_capacity(handles.len());
        let mut first_failure: Option<Error> = None;

        for handle in handles {
            match handle.await {
                Ok(Ok(result)) => results.push(result),
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "File review failed");
                    if first_failure.is_none() {
                        first_failure = Some(e);
                    }
                }
                Err(e) => {
                    if first_failure.is_none() {
                        first_failure = Some(Error::Spawn(format!("review task panicked: {}", e)));
                    }
                }
            }
        }

        match first_failure {
            Some(e) => Err(e),
            None => Ok(results),
        }
    }
}

impl std::fmt::Debug for BatchReviewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchReviewer")
            .field("runner", &self.runner.name())
            .field("default_model", &self.default_model)
            .finish()
    }
}

/// Run one invocation and enforce the review contract on its output
async fn review_one(
    runner: &dyn ModelRunner,
    file: &FileInput,
    model: &str,
) -> Result<ReviewResult> {
    let prompt = build_prompt(file);

    tracing::debug!(filename = %file.filename, model = %model, "Invoking model");
    let output = runner.invoke(&prompt, model).await?;

    if !output.success {
        return Err(Error::Process {
            model: model.to_string(),
            stderr: output.stderr,
        });
    }

    let review = parse_review(&output.stdout)?;

    Ok(ReviewResult {
        filename: file.filename.clone(),
        review,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::types::Verdict;
    use crate::runner::RunOutput;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Runner that answers from a canned filename -> output table, tracking
    /// how many invocations ran and how many were in flight at once.
    struct FakeRunner {
        responses: HashMap<String, RunOutput>,
        delays: HashMap<String, Duration>,
        invocations: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeRunner {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                delays: HashMap::new(),
                invocations: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn respond(mut self, filename: &str, output: RunOutput) -> Self {
            self.responses.insert(filename.to_string(), output);
            self
        }

        fn delay(mut self, filename: &str, delay: Duration) -> Self {
            self.delays.insert(filename.to_string(), delay);
            self
        }

        /// The prompt embeds the filename in quotes; match on that.
        fn filename_for(&self, prompt: &str) -> String {
            self.responses
                .keys()
                .find(|name| prompt.contains(&format!("\"{}\"", name)))
                .cloned()
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl ModelRunner for FakeRunner {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn invoke(&self, prompt: &str, _model: &str) -> crate::Result<RunOutput> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            let filename = self.filename_for(prompt);
            if let Some(delay) = self.delays.get(&filename) {
                tokio::time::sleep(*delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            Ok(self
                .responses
                .get(&filename)
                .cloned()
                .unwrap_or_else(|| RunOutput::failed(1, "unexpected prompt")))
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn ok_output(explanation: &str, corrected: &str) -> RunOutput {
        RunOutput::ok(format!(
            r#"{{"verdict":"OK","explanation":"{}","correctedCode":"{}"}}"#,
            explanation, corrected
        ))
    }

    fn reviewer(runner: FakeRunner) -> BatchReviewer {
        BatchReviewer::new(Arc::new(runner), &RunnerConfig::default())
    }

    #[tokio::test]
    async fn test_single_file_success() {
        let runner = FakeRunner::new().respond("a.py", ok_output("Looks fine.", "print(1)"));
        let reviewer = reviewer(runner);

        let request =
            BatchRequest::new(vec![FileInput::new("a.py", "print(1)")]).with_model("m");
        let results = reviewer.review_batch(request).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].filename, "a.py");
        assert_eq!(results[0].review.verdict, Verdict::Ok);
        assert_eq!(results[0].review.explanation, "Looks fine.");
        assert_eq!(results[0].review.corrected_code, "print(1)");
    }

    #[tokio::test]
    async fn test_empty_batch_rejected_before_spawning() {
        let runner = Arc::new(FakeRunner::new());
        let reviewer = BatchReviewer::new(
            Arc::clone(&runner) as Arc<dyn ModelRunner>,
            &RunnerConfig::default(),
        );

        let result = reviewer.review_batch(BatchRequest::new(vec![])).await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(runner.invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_results_restored_to_request_order() {
        // First file finishes last; order must still match the request
        let runner = FakeRunner::new()
            .respond("slow.rs", ok_output("slow", "a"))
            .respond("fast.rs", ok_output("fast", "b"))
            .delay("slow.rs", Duration::from_millis(50));
        let reviewer = reviewer(runner);

        let request = BatchRequest::new(vec![
            FileInput::new("slow.rs", "x"),
            FileInput::new("fast.rs", "y"),
        ]);
        let results = reviewer.review_batch(request).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].filename, "slow.rs");
        assert_eq!(results[1].filename, "fast.rs");
    }

    #[tokio::test]
    async fn test_one_process_failure_fails_whole_batch() {
        let runner = FakeRunner::new()
            .respond("a.py", ok_output("fine", "a"))
            .respond("b.py", RunOutput::failed(1, "model crashed"))
            .respond("c.py", ok_output("fine", "c"));
        let reviewer = reviewer(runner);

        let request = BatchRequest::new(vec![
            FileInput::new("a.py", "1"),
            FileInput::new("b.py", "2"),
            FileInput::new("c.py", "3"),
        ]);
        let result = reviewer.review_batch(request).await;

        match result {
            Err(Error::Process { stderr, .. }) => assert_eq!(stderr, "model crashed"),
            other => panic!("expected process failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_extraction_failure_fails_whole_batch() {
        let runner = FakeRunner::new()
            .respond("a.py", ok_output("fine", "a"))
            .respond("b.py", RunOutput::ok("I have no JSON for you"));
        let reviewer = reviewer(runner);

        let request = BatchRequest::new(vec![
            FileInput::new("a.py", "1"),
            FileInput::new("b.py", "2"),
        ]);
        let result = reviewer.review_batch(request).await;

        match result {
            Err(Error::Extraction { raw, .. }) => assert_eq!(raw, "I have no JSON for you"),
            other => panic!("expected extraction failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit_wins_over_stdout() {
        // Valid JSON on stdout is irrelevant when the exit code is non-zero
        let mut output = ok_output("fine", "x");
        output.success = false;
        output.exit_code = Some(2);
        output.stderr = "out of memory".to_string();

        let runner = FakeRunner::new().respond("a.py", output);
        let reviewer = reviewer(runner);

        let request = BatchRequest::new(vec![FileInput::new("a.py", "1")]);
        let result = reviewer.review_batch(request).await;
        assert!(matches!(result, Err(Error::Process { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_filenames_reviewed_independently() {
        let runner = FakeRunner::new().respond("dup.py", ok_output("fine", "x"));
        let runner = Arc::new(runner);
        let reviewer =
            BatchReviewer::new(Arc::clone(&runner) as Arc<dyn ModelRunner>, &RunnerConfig::default());

        let request = BatchRequest::new(vec![
            FileInput::new("dup.py", "1"),
            FileInput::new("dup.py", "2"),
        ]);
        let results = reviewer.review_batch(request).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(runner.invocations.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrency_stays_under_configured_limit() {
        let runner = FakeRunner::new()
            .respond("a.py", ok_output("a", "a"))
            .respond("b.py", ok_output("b", "b"))
            .respond("c.py", ok_output("c", "c"))
            .respond("d.py", ok_output("d", "d"))
            .delay("a.py", Duration::from_millis(20))
            .delay("b.py", Duration::from_millis(20))
            .delay("c.py", Duration::from_millis(20))
            .delay("d.py", Duration::from_millis(20));
        let runner = Arc::new(runner);

        let config = RunnerConfig {
            max_concurrent_reviews: 2,
            ..RunnerConfig::default()
        };
        let reviewer = BatchReviewer::new(Arc::clone(&runner) as Arc<dyn ModelRunner>, &config);

        let request = BatchRequest::new(vec![
            FileInput::new("a.py", "1"),
            FileInput::new("b.py", "2"),
            FileInput::new("c.py", "3"),
            FileInput::new("d.py", "4"),
        ]);
        let results = reviewer.review_batch(request).await.unwrap();

        assert_eq!(results.len(), 4);
        assert!(runner.max_in_flight.load(Ordering::SeqCst) <= 2);
        assert_eq!(runner.invocations.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_empty_model_string_uses_default() {
        let runner = FakeRunner::new().respond("a.py", ok_output("fine", "x"));
        let reviewer = reviewer(runner);
        assert_eq!(reviewer.default_model(), "llama3.2:3b");

        let request = BatchRequest {
            files: vec![FileInput::new("a.py", "1")],
            model: Some(String::new()),
        };
        // Falls back to the configured default rather than invoking model ""
        let results = reviewer.review_batch(request).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_review_file_single() {
        let runner = FakeRunner::new().respond("one.rs", ok_output("fine", "fn main() {}"));
        let reviewer = reviewer(runner);

        let file = FileInput::new("one.rs", "fn main() {}");
        let result = reviewer.review_file(&file, "m").await.unwrap();
        assert_eq!(result.filename, "one.rs");
        assert_eq!(result.review.verdict, Verdict::Ok);
    }
}
