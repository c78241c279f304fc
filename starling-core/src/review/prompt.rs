//! Reviewer prompt construction
//!
//! The prompt is deterministic for a given file: same filename and content,
//! same prompt. File content is embedded verbatim inside the fenced block;
//! it is opaque text to us, not something to sanitize.

use super::types::FileInput;

/// Build the reviewer prompt for one file
pub fn build_prompt(file: &FileInput) -> String {
    format!(
        r#"You are an expert code reviewer acting as a strict JSON API.
A user has submitted a file named "{filename}".
Your task is to analyze the code and provide feedback.

The user's code is:
```
{content}
```

Respond with ONLY a single, raw JSON object and nothing else. Do not add any conversational text, introductions, or explanations before or after the JSON.
The JSON object MUST have this exact structure:
{{
  "verdict": "OK" or "NEEDS_IMPROVEMENT",
  "explanation": "A concise, one-paragraph explanation of your findings. Explain potential issues, bugs, or areas for improvement.",
  "correctedCode": "The full, corrected, or improved version of the code. If no changes are needed, return the original code."
}}
IMPORTANT: Ensure all strings in the JSON are properly escaped. For example, all backslashes (\) must be written as double backslashes (\\).
"#,
        filename = file.filename,
        content = file.content,
    )
}
