use studybuddy_core::SessionEvent;

use super::App;
use crate::tui_event::BackendEvent;

impl App {
    /// Process an event from the backend. Stale events are dropped by the
    /// session itself.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::ExtractionFinished { token, result } => {
                let event = match result {
                    Ok(text) => SessionEvent::ExtractionSucceeded { token, text },
                    Err(message) => SessionEvent::ExtractionFailed { token, message },
                };
                self.apply(event);
            }
            BackendEvent::GenerationFinished { token, result } => {
                let event = match result {
                    Ok(output) => SessionEvent::GenerationSucceeded { token, output },
                    Err(message) => SessionEvent::GenerationFailed { token, message },
                };
                self.apply(event);
            }
        }
    }
}
