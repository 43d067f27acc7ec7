use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config_file;
pub mod gemini;
pub mod generator;
pub mod mock;
pub mod prompt;
pub mod response;
pub mod session;

// Re-export for convenience
pub use gemini::GeminiBackend;
pub use generator::{GenerationBackend, GenerationError, generate};
pub use response::ResponseError;
pub use session::{ExtractionStatus, Session, SessionError, SessionEvent};

/// Default Gemini model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default base URL of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Minimum number of trimmed characters an extraction must yield.
pub const DEFAULT_MIN_CHARS: usize = 20;

/// File suffixes accepted by the extractor (lowercase, without the dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "xlsx", "xls", "csv", "txt", "md"];

/// Encoding family of an uploaded document, decided by its file-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Spreadsheet,
    PlainText,
}

impl DocumentFormat {
    /// Classify a file name by its extension (case-insensitive).
    ///
    /// Anything that is not a PDF or a spreadsheet is read as plain text.
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "pdf" => Self::Pdf,
            "xlsx" | "xls" | "csv" => Self::Spreadsheet,
            _ => Self::PlainText,
        }
    }
}

/// An uploaded file held in memory.
///
/// Created on selection and replaced wholesale when another file is picked.
#[derive(Clone)]
pub struct Document {
    pub name: String,
    pub bytes: Vec<u8>,
    pub format: DocumentFormat,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let format = DocumentFormat::from_name(&name);
        Self {
            name,
            bytes,
            format,
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("format", &self.format)
            .finish()
    }
}

/// Error reported by a [`PdfBackend`].
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
}

/// A PDF text backend.
///
/// Returns the text tokens of every page, pages in document order and tokens
/// in reading order. Joining them is left to the caller.
pub trait PdfBackend: Send + Sync {
    fn page_tokens(&self, bytes: &[u8]) -> Result<Vec<Vec<String>>, BackendError>;
}

/// The three kinds of study material that can be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Summary,
    Flashcards,
    Quiz,
}

impl TaskKind {
    pub fn all() -> [TaskKind; 3] {
        [Self::Summary, Self::Flashcards, Self::Quiz]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Flashcards => "flashcards",
            Self::Quiz => "quiz",
        }
    }

    /// Label of the trigger that starts this task.
    pub fn action_label(&self) -> &'static str {
        match self {
            Self::Summary => "Create Summary",
            Self::Flashcards => "Make Flashcards",
            Self::Quiz => "Generate Quiz",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A question/answer pair for quick revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub q: String,
    pub a: String,
}

/// A multiple-choice question with four options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuizItem {
    /// Whether `answer` is one of `options`.
    pub fn answer_in_options(&self) -> bool {
        self.options.iter().any(|o| o == &self.answer)
    }
}

/// Parsed result of one generation task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutput {
    Summary(String),
    Flashcards(Vec<Flashcard>),
    Quiz(Vec<QuizItem>),
    /// The model answered with nothing; the task's result slot is left as is.
    Empty(TaskKind),
}

impl GenerationOutput {
    pub fn task(&self) -> TaskKind {
        match self {
            Self::Summary(_) => TaskKind::Summary,
            Self::Flashcards(_) => TaskKind::Flashcards,
            Self::Quiz(_) => TaskKind::Quiz,
            Self::Empty(task) => *task,
        }
    }
}

/// Resolved runtime configuration.
#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub min_chars: usize,
    /// Reject quiz items whose answer is not one of their options.
    pub strict_quiz_answers: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("min_chars", &self.min_chars)
            .field("strict_quiz_answers", &self.strict_quiz_answers)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
            min_chars: DEFAULT_MIN_CHARS,
            strict_quiz_answers: false,
        }
    }
}
