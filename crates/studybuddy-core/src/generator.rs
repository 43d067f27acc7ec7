//! Generation client: prompt, one remote call, parse.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::prompt::build_prompt;
use crate::response::{self, ResponseError};
use crate::{GenerationOutput, TaskKind};

/// A remote text-generation service.
pub trait GenerationBackend: Send + Sync {
    /// Short name used in logs (e.g., "Gemini").
    fn name(&self) -> &str;

    /// Send one prompt and return the model's raw text response.
    ///
    /// Errors carry the transport or service message as-is.
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>;
}

#[derive(Error, Debug)]
pub enum GenerationError {
    /// The remote call failed (non-2xx, timeout, connectivity, bad envelope).
    #[error("Error from AI: {0}")]
    Service(String),
    /// The model answered, but not with the requested structure.
    #[error("{}", parse_failure_message(.task))]
    Parse {
        task: TaskKind,
        #[source]
        source: ResponseError,
    },
    #[error("no Gemini API key configured (set GEMINI_API_KEY or [api] gemini_api_key)")]
    MissingApiKey,
}

/// User-facing message for a response that could not be parsed.
pub fn parse_failure_message(task: &TaskKind) -> &'static str {
    match task {
        TaskKind::Flashcards => "AI returned flashcards in a format I couldn't parse.",
        TaskKind::Quiz => "AI returned the quiz in a format I couldn't parse.",
        TaskKind::Summary => "AI returned the summary in a format I couldn't parse.",
    }
}

/// Generate study material of kind `task` from `text`.
///
/// Makes exactly one call to `backend`. The raw response of a failed parse is
/// logged, never returned.
pub async fn generate(
    backend: &dyn GenerationBackend,
    task: TaskKind,
    text: &str,
    strict_quiz_answers: bool,
) -> Result<GenerationOutput, GenerationError> {
    let prompt = build_prompt(task, text);
    tracing::debug!(
        backend = backend.name(),
        task = %task,
        prompt_chars = prompt.len(),
        "sending generation request"
    );

    let raw = backend.complete(&prompt).await.map_err(|e| {
        tracing::warn!(backend = backend.name(), task = %task, error = %e, "generation call failed");
        GenerationError::Service(e)
    })?;

    if raw.trim().is_empty() {
        tracing::info!(backend = backend.name(), task = %task, "model returned an empty response");
        return Ok(GenerationOutput::Empty(task));
    }

    let parsed = match task {
        TaskKind::Summary => return Ok(GenerationOutput::Summary(raw)),
        TaskKind::Flashcards => response::parse_flashcards(&raw).map(GenerationOutput::Flashcards),
        TaskKind::Quiz => {
            response::parse_quiz(&raw, strict_quiz_answers).map(GenerationOutput::Quiz)
        }
    };

    parsed.map_err(|source| {
        tracing::warn!(task = %task, error = %source, raw = %raw, "unparseable model response");
        GenerationError::Parse { task, source }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Flashcard;
    use crate::mock::{MockBackend, MockResponse};

    #[tokio::test]
    async fn summary_is_returned_verbatim() {
        let backend = MockBackend::new(MockResponse::Text("## France\nParis is the capital.".into()));
        let out = generate(&backend, TaskKind::Summary, "some text", false)
            .await
            .unwrap();
        assert_eq!(
            out,
            GenerationOutput::Summary("## France\nParis is the capital.".into())
        );
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn prompt_embeds_text() {
        let backend = MockBackend::new(MockResponse::Text("ok".into()));
        generate(&backend, TaskKind::Summary, "Mitochondria", false)
            .await
            .unwrap();
        let prompts = backend.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].ends_with("Mitochondria"));
    }

    #[tokio::test]
    async fn fenced_flashcards_are_parsed() {
        let backend = MockBackend::new(MockResponse::Text(
            "```json\n[{\"q\":\"Capital of France?\",\"a\":\"Paris\"}]\n```".into(),
        ));
        let out = generate(&backend, TaskKind::Flashcards, "text", false)
            .await
            .unwrap();
        assert_eq!(
            out,
            GenerationOutput::Flashcards(vec![Flashcard {
                q: "Capital of France?".into(),
                a: "Paris".into(),
            }])
        );
    }

    #[tokio::test]
    async fn prose_quiz_is_a_parse_error() {
        let backend = MockBackend::new(MockResponse::Text("I cannot make a quiz.".into()));
        let err = generate(&backend, TaskKind::Quiz, "text", false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Parse {
                task: TaskKind::Quiz,
                source: ResponseError::NotJson(_)
            }
        ));
        assert_eq!(
            err.to_string(),
            "AI returned the quiz in a format I couldn't parse."
        );
    }

    #[tokio::test]
    async fn empty_response_is_not_an_error_for_any_task() {
        for task in [TaskKind::Summary, TaskKind::Flashcards, TaskKind::Quiz] {
            for raw in ["", "  \n"] {
                let backend = MockBackend::new(MockResponse::Text(raw.into()));
                let out = generate(&backend, task, "text", true).await.unwrap();
                assert_eq!(out, GenerationOutput::Empty(task));
                assert_eq!(backend.call_count(), 1);
            }
        }
    }

    #[tokio::test]
    async fn service_failure_carries_message() {
        let backend = MockBackend::new(MockResponse::Error("timeout".into()));
        let err = generate(&backend, TaskKind::Flashcards, "text", false)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Service(_)));
        assert_eq!(err.to_string(), "Error from AI: timeout");
    }
}
