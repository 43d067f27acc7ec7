//! Session state machine.
//!
//! A [`Session`] is an immutable record. Every transition goes through
//! [`Session::apply`], which consumes the old record and returns the next one.
//!
//! Extraction and generation run asynchronously and may resolve after the user
//! has moved on. Each operation is tagged with a token minted by the session
//! when it starts; completions whose token no longer matches the active one are
//! discarded.

use thiserror::Error;

use crate::{Flashcard, GenerationOutput, QuizItem, TaskKind};

/// Progress of text extraction for the current document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionStatus {
    #[default]
    Idle,
    Processing,
    Done,
    Error,
}

/// Why a generation trigger was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Please upload a file first!")]
    NoDocument,
    #[error("Still generating the {0}, please wait.")]
    Busy(TaskKind),
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new document was picked. Mints a new extraction token.
    FileSelected { name: String },
    ExtractionSucceeded { token: u64, text: String },
    ExtractionFailed { token: u64, message: String },
    /// A generation trigger was pressed. Mints a new generation token.
    GenerationStarted { task: TaskKind },
    GenerationSucceeded { token: u64, output: GenerationOutput },
    GenerationFailed { token: u64, message: String },
}

/// Work the caller must run for the task currently loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub task: TaskKind,
    pub text: String,
    pub token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    file_name: Option<String>,
    extraction: ExtractionStatus,
    text: String,
    summary: String,
    flashcards: Vec<Flashcard>,
    quiz: Vec<QuizItem>,
    loading: Option<TaskKind>,
    error: Option<String>,
    extraction_token: u64,
    generation_token: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn extraction(&self) -> ExtractionStatus {
        self.extraction
    }

    /// Extracted text; empty until extraction succeeds.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn flashcards(&self) -> &[Flashcard] {
        &self.flashcards
    }

    pub fn quiz(&self) -> &[QuizItem] {
        &self.quiz
    }

    pub fn loading(&self) -> Option<TaskKind> {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Token of the most recent extraction.
    pub fn extraction_token(&self) -> u64 {
        self.extraction_token
    }

    /// Token of the most recent generation.
    pub fn generation_token(&self) -> u64 {
        self.generation_token
    }

    /// Whether a generation may start right now.
    pub fn can_generate(&self) -> Result<(), SessionError> {
        if let Some(task) = self.loading {
            return Err(SessionError::Busy(task));
        }
        if !self.has_text() {
            return Err(SessionError::NoDocument);
        }
        Ok(())
    }

    /// The request for the generation in flight, if any.
    pub fn pending_request(&self) -> Option<GenerationRequest> {
        self.loading.map(|task| GenerationRequest {
            task,
            text: self.text.clone(),
            token: self.generation_token,
        })
    }

    /// Apply one event and return the next state.
    pub fn apply(self, event: SessionEvent) -> Session {
        match event {
            SessionEvent::FileSelected { name } => Session {
                file_name: Some(name),
                extraction: ExtractionStatus::Processing,
                extraction_token: self.extraction_token + 1,
                // Anything still generating belongs to the previous document.
                generation_token: self.generation_token + 1,
                ..Session::default()
            },

            SessionEvent::ExtractionSucceeded { token, text } => {
                if token != self.extraction_token {
                    tracing::debug!(token, current = self.extraction_token, "dropping stale extraction");
                    return self;
                }
                Session {
                    extraction: ExtractionStatus::Done,
                    text,
                    error: None,
                    ..self
                }
            }

            SessionEvent::ExtractionFailed { token, message } => {
                if token != self.extraction_token {
                    tracing::debug!(token, current = self.extraction_token, "dropping stale extraction failure");
                    return self;
                }
                Session {
                    extraction: ExtractionStatus::Error,
                    text: String::new(),
                    error: Some(message),
                    ..self
                }
            }

            SessionEvent::GenerationStarted { task } => {
                if let Err(e) = self.can_generate() {
                    tracing::debug!(task = %task, reason = %e, "generation not started");
                    return self;
                }
                Session {
                    loading: Some(task),
                    error: None,
                    generation_token: self.generation_token + 1,
                    ..self
                }
            }

            SessionEvent::GenerationSucceeded { token, output } => {
                if !self.is_current_generation(token) {
                    tracing::debug!(token, current = self.generation_token, "dropping stale generation result");
                    return self;
                }
                let mut next = Session {
                    loading: None,
                    ..self
                };
                match output {
                    GenerationOutput::Summary(summary) => {
                        if !summary.is_empty() {
                            next.summary = summary;
                        }
                    }
                    GenerationOutput::Flashcards(cards) => next.flashcards = cards,
                    GenerationOutput::Quiz(items) => next.quiz = items,
                    GenerationOutput::Empty(_) => {}
                }
                next
            }

            SessionEvent::GenerationFailed { token, message } => {
                if !self.is_current_generation(token) {
                    tracing::debug!(token, current = self.generation_token, "dropping stale generation failure");
                    return self;
                }
                Session {
                    loading: None,
                    error: Some(message),
                    ..self
                }
            }
        }
    }

    fn is_current_generation(&self, token: u64) -> bool {
        self.loading.is_some() && token == self.generation_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Paris is the capital of France.";

    fn card(q: &str, a: &str) -> Flashcard {
        Flashcard {
            q: q.into(),
            a: a.into(),
        }
    }

    fn quiz_item() -> QuizItem {
        QuizItem {
            question: "Capital of France?".into(),
            options: vec!["Berlin".into(), "Paris".into(), "Rome".into(), "Madrid".into()],
            answer: "Paris".into(),
        }
    }

    /// A session with `TEXT` extracted from "notes.txt".
    fn ready() -> Session {
        let s = Session::new().apply(SessionEvent::FileSelected {
            name: "notes.txt".into(),
        });
        let token = s.extraction_token();
        s.apply(SessionEvent::ExtractionSucceeded {
            token,
            text: TEXT.into(),
        })
    }

    fn run(session: Session, output: GenerationOutput) -> Session {
        let s = session.apply(SessionEvent::GenerationStarted {
            task: output.task(),
        });
        let token = s.generation_token();
        s.apply(SessionEvent::GenerationSucceeded { token, output })
    }

    /// A session with every result slot filled.
    fn populated() -> Session {
        let s = run(ready(), GenerationOutput::Summary("summary".into()));
        let s = run(s, GenerationOutput::Flashcards(vec![card("q", "a")]));
        run(s, GenerationOutput::Quiz(vec![quiz_item()]))
    }

    #[test]
    fn starts_idle() {
        let s = Session::new();
        assert_eq!(s.extraction(), ExtractionStatus::Idle);
        assert!(!s.has_text());
        assert_eq!(s.loading(), None);
        assert_eq!(s.error(), None);
    }

    #[test]
    fn file_selection_enters_processing() {
        let s = Session::new().apply(SessionEvent::FileSelected {
            name: "a.pdf".into(),
        });
        assert_eq!(s.extraction(), ExtractionStatus::Processing);
        assert_eq!(s.file_name(), Some("a.pdf"));
        assert_eq!(s.extraction_token(), 1);
    }

    #[test]
    fn extraction_success_is_done_with_text() {
        let s = ready();
        assert_eq!(s.extraction(), ExtractionStatus::Done);
        assert_eq!(s.text(), TEXT);
    }

    #[test]
    fn extraction_failure_keeps_no_text() {
        let s = Session::new().apply(SessionEvent::FileSelected {
            name: "hi.txt".into(),
        });
        let token = s.extraction_token();
        let s = s.apply(SessionEvent::ExtractionFailed {
            token,
            message: "The uploaded file contained little or no readable text.".into(),
        });
        assert_eq!(s.extraction(), ExtractionStatus::Error);
        assert!(!s.has_text());
        assert!(s.error().unwrap().contains("little or no readable text"));
    }

    #[test]
    fn new_file_clears_all_derived_state() {
        let s = populated().apply(SessionEvent::GenerationStarted {
            task: TaskKind::Quiz,
        });
        let token = s.generation_token();
        let s = s.apply(SessionEvent::GenerationFailed {
            token,
            message: "Error from AI: boom".into(),
        });
        assert!(s.error().is_some());
        assert!(!s.summary().is_empty());

        let s = s.apply(SessionEvent::FileSelected {
            name: "other.md".into(),
        });
        assert!(!s.has_text());
        assert!(s.summary().is_empty());
        assert!(s.flashcards().is_empty());
        assert!(s.quiz().is_empty());
        assert_eq!(s.error(), None);
        assert_eq!(s.extraction(), ExtractionStatus::Processing);
        assert_eq!(s.file_name(), Some("other.md"));
    }

    #[test]
    fn generation_without_text_is_rejected() {
        let s = Session::new();
        assert_eq!(s.can_generate(), Err(SessionError::NoDocument));

        let s = s.apply(SessionEvent::GenerationStarted {
            task: TaskKind::Summary,
        });
        assert_eq!(s.loading(), None);
        assert_eq!(s.pending_request(), None);
        assert_eq!(
            SessionError::NoDocument.to_string(),
            "Please upload a file first!"
        );
    }

    #[test]
    fn generation_while_processing_is_rejected() {
        let s = Session::new().apply(SessionEvent::FileSelected {
            name: "a.pdf".into(),
        });
        assert_eq!(s.can_generate(), Err(SessionError::NoDocument));
    }

    #[test]
    fn only_one_task_loads_at_a_time() {
        let s = ready().apply(SessionEvent::GenerationStarted {
            task: TaskKind::Summary,
        });
        assert_eq!(s.can_generate(), Err(SessionError::Busy(TaskKind::Summary)));

        let token = s.generation_token();
        let s = s.apply(SessionEvent::GenerationStarted {
            task: TaskKind::Quiz,
        });
        assert_eq!(s.loading(), Some(TaskKind::Summary));
        assert_eq!(s.generation_token(), token);
    }

    #[test]
    fn pending_request_carries_text_and_token() {
        let s = ready().apply(SessionEvent::GenerationStarted {
            task: TaskKind::Flashcards,
        });
        let req = s.pending_request().unwrap();
        assert_eq!(req.task, TaskKind::Flashcards);
        assert_eq!(req.text, TEXT);
        assert_eq!(req.token, s.generation_token());
    }

    #[test]
    fn start_clears_previous_error() {
        let s = ready().apply(SessionEvent::GenerationStarted {
            task: TaskKind::Quiz,
        });
        let token = s.generation_token();
        let s = s.apply(SessionEvent::GenerationFailed {
            token,
            message: "AI returned the quiz in a format I couldn't parse.".into(),
        });
        assert!(s.error().is_some());

        let s = s.apply(SessionEvent::GenerationStarted {
            task: TaskKind::Summary,
        });
        assert_eq!(s.error(), None);
    }

    #[test]
    fn success_fills_only_its_slot() {
        let s = run(ready(), GenerationOutput::Flashcards(vec![card("Capital of France?", "Paris")]));
        assert_eq!(s.flashcards(), &[card("Capital of France?", "Paris")]);
        assert!(s.summary().is_empty());
        assert!(s.quiz().is_empty());
        assert_eq!(s.loading(), None);
    }

    #[test]
    fn failure_leaves_results_untouched() {
        let before = populated();
        let s = before.clone().apply(SessionEvent::GenerationStarted {
            task: TaskKind::Quiz,
        });
        let token = s.generation_token();
        let s = s.apply(SessionEvent::GenerationFailed {
            token,
            message: "AI returned the quiz in a format I couldn't parse.".into(),
        });

        assert_eq!(s.summary(), before.summary());
        assert_eq!(s.flashcards(), before.flashcards());
        assert_eq!(s.quiz(), before.quiz());
        assert_eq!(s.loading(), None);
        assert_eq!(
            s.error(),
            Some("AI returned the quiz in a format I couldn't parse.")
        );
    }

    #[test]
    fn network_failure_sets_error_and_clears_loading() {
        let s = ready().apply(SessionEvent::GenerationStarted {
            task: TaskKind::Summary,
        });
        let token = s.generation_token();
        let s = s.apply(SessionEvent::GenerationFailed {
            token,
            message: "Error from AI: timeout".into(),
        });
        assert_eq!(s.error(), Some("Error from AI: timeout"));
        assert_eq!(s.loading(), None);
    }

    #[test]
    fn empty_summary_keeps_previous() {
        let s = run(ready(), GenerationOutput::Summary("first".into()));
        let s = run(s, GenerationOutput::Summary(String::new()));
        assert_eq!(s.summary(), "first");
        assert_eq!(s.loading(), None);
    }

    #[test]
    fn empty_output_leaves_every_slot() {
        for task in [TaskKind::Summary, TaskKind::Flashcards, TaskKind::Quiz] {
            let before = populated();
            let s = run(before.clone(), GenerationOutput::Empty(task));
            assert_eq!(s.summary(), before.summary());
            assert_eq!(s.flashcards(), before.flashcards());
            assert_eq!(s.quiz(), before.quiz());
            assert_eq!(s.loading(), None);
            assert_eq!(s.error(), None);
        }
    }

    #[test]
    fn stale_extraction_is_dropped() {
        let s = Session::new().apply(SessionEvent::FileSelected {
            name: "old.pdf".into(),
        });
        let old_token = s.extraction_token();
        let s = s.apply(SessionEvent::FileSelected {
            name: "new.txt".into(),
        });

        let s = s.apply(SessionEvent::ExtractionSucceeded {
            token: old_token,
            text: "text from the old document, long enough".into(),
        });
        assert_eq!(s.extraction(), ExtractionStatus::Processing);
        assert!(!s.has_text());

        let s = s.apply(SessionEvent::ExtractionFailed {
            token: old_token,
            message: "boom".into(),
        });
        assert_eq!(s.extraction(), ExtractionStatus::Processing);
        assert_eq!(s.error(), None);
    }

    #[test]
    fn generation_for_previous_document_is_dropped() {
        let s = ready().apply(SessionEvent::GenerationStarted {
            task: TaskKind::Summary,
        });
        let token = s.generation_token();

        let s = s.apply(SessionEvent::FileSelected {
            name: "next.txt".into(),
        });
        assert_eq!(s.loading(), None);

        let s = s.apply(SessionEvent::GenerationSucceeded {
            token,
            output: GenerationOutput::Summary("old summary".into()),
        });
        assert!(s.summary().is_empty());

        let s = s.apply(SessionEvent::GenerationFailed {
            token,
            message: "Error from AI: late".into(),
        });
        assert_eq!(s.error(), None);
    }
}
