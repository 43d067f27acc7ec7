use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use studybuddy_core::session::GenerationRequest;
use studybuddy_core::{GenerationBackend, GenerationError, generate};

use crate::tui_event::{BackendCommand, BackendEvent};

/// Everything the backend listener needs to serve commands.
pub struct BackendContext {
    /// `None` when no API key was configured; generation then fails with
    /// [`GenerationError::MissingApiKey`].
    pub generator: Option<Arc<dyn GenerationBackend>>,
    pub min_chars: usize,
    pub strict_quiz_answers: bool,
}

/// Receive commands until the channel closes, running each as its own task so
/// a slow generation never blocks a new extraction.
pub async fn run_listener(
    ctx: BackendContext,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    tx: mpsc::UnboundedSender<BackendEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        let tx = tx.clone();
        match cmd {
            BackendCommand::Extract { path, token } => {
                let min_chars = ctx.min_chars;
                tokio::spawn(async move {
                    run_extraction(path, token, min_chars, &tx).await;
                });
            }
            BackendCommand::Generate { request } => {
                let generator = ctx.generator.clone();
                let strict = ctx.strict_quiz_answers;
                tokio::spawn(async move {
                    run_generation(generator.as_deref(), request, strict, &tx).await;
                });
            }
        }
    }
}

/// Extract one file and report the outcome.
pub async fn run_extraction(
    path: PathBuf,
    token: u64,
    min_chars: usize,
    tx: &mpsc::UnboundedSender<BackendEvent>,
) {
    tracing::info!(path = %path.display(), token, "extraction started");
    let result = studybuddy_ingest::extract_path(&path, min_chars)
        .await
        .map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "extraction failed");
            e.to_string()
        });
    if let Ok(text) = &result {
        tracing::info!(path = %path.display(), chars = text.chars().count(), "extraction complete");
    }
    let _ = tx.send(BackendEvent::ExtractionFinished { token, result });
}

/// Run one generation request and report the outcome.
pub async fn run_generation(
    generator: Option<&dyn GenerationBackend>,
    request: GenerationRequest,
    strict_quiz_answers: bool,
    tx: &mpsc::UnboundedSender<BackendEvent>,
) {
    let result = match generator {
        Some(backend) => {
            generate(backend, request.task, &request.text, strict_quiz_answers).await
        }
        None => Err(GenerationError::MissingApiKey),
    };
    let result = result.map_err(|e| {
        tracing::warn!(task = %request.task, token = request.token, error = %e, "generation failed");
        e.to_string()
    });
    let _ = tx.send(BackendEvent::GenerationFinished {
        token: request.token,
        result,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use studybuddy_core::mock::{MockBackend, MockResponse};
    use studybuddy_core::{GenerationOutput, TaskKind};

    fn request(task: TaskKind) -> GenerationRequest {
        GenerationRequest {
            task,
            text: "Paris is the capital of France.".into(),
            token: 7,
        }
    }

    #[tokio::test]
    async fn generation_result_carries_request_token() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mock = MockBackend::new(MockResponse::Text("Paris summary".into()));
        let backend: &dyn GenerationBackend = &mock;
        run_generation(Some(backend), request(TaskKind::Summary), false, &tx).await;

        match rx.recv().await {
            Some(BackendEvent::GenerationFinished { token, result }) => {
                assert_eq!(token, 7);
                assert_eq!(
                    result.unwrap(),
                    GenerationOutput::Summary("Paris summary".into())
                );
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_key_is_reported_as_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        run_generation(None, request(TaskKind::Quiz), false, &tx).await;

        match rx.recv().await {
            Some(BackendEvent::GenerationFinished { result, .. }) => {
                assert!(result.unwrap_err().contains("API key"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn service_error_message_is_user_facing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mock = MockBackend::new(MockResponse::Error("timeout".into()));
        let backend: &dyn GenerationBackend = &mock;
        run_generation(Some(backend), request(TaskKind::Flashcards), false, &tx).await;

        match rx.recv().await {
            Some(BackendEvent::GenerationFinished { result, .. }) => {
                assert_eq!(result.unwrap_err(), "Error from AI: timeout");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn extraction_of_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capital.txt");
        std::fs::write(&path, "Paris is the capital of France.").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        run_extraction(path, 3, 20, &tx).await;

        match rx.recv().await {
            Some(BackendEvent::ExtractionFinished { token, result }) => {
                assert_eq!(token, 3);
                assert_eq!(result.unwrap(), "Paris is the capital of France.");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn listener_serves_commands_until_closed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hi.txt");
        std::fs::write(&path, "hi").unwrap();

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ctx = BackendContext {
            generator: None,
            min_chars: 20,
            strict_quiz_answers: false,
        };
        let listener = tokio::spawn(run_listener(ctx, cmd_rx, tx));

        cmd_tx
            .send(BackendCommand::Extract { path, token: 1 })
            .unwrap();
        match rx.recv().await {
            Some(BackendEvent::ExtractionFinished { token, result }) => {
                assert_eq!(token, 1);
                assert!(result.unwrap_err().contains("little or no readable text"));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        drop(cmd_tx);
        listener.await.unwrap();
    }
}
