use std::path::PathBuf;

use studybuddy_core::GenerationOutput;
use studybuddy_core::session::GenerationRequest;

/// Commands sent from the TUI to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Read and extract a file. `token` is the session's extraction token.
    Extract { path: PathBuf, token: u64 },
    /// Run one generation request.
    Generate { request: GenerationRequest },
}

/// Events flowing from the backend tasks to the TUI.
///
/// Errors are already rendered to their user-facing message.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    ExtractionFinished {
        token: u64,
        result: Result<String, String>,
    },
    GenerationFinished {
        token: u64,
        result: Result<GenerationOutput, String>,
    },
}
