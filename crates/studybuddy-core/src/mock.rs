//! Mock generation backend for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::generator::GenerationBackend;

/// A configurable mock response for [`MockBackend`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Simulate a successful completion with this text.
    Text(String),
    /// Simulate a transport or service failure with this message.
    Error(String),
}

/// A hand-rolled mock implementing [`GenerationBackend`] for tests.
///
/// Supports:
/// - A fixed response (used for every call), **or**
/// - A sequence of responses (one per call, repeating the last if exhausted).
/// - Optional per-call latency.
/// - Call counting and prompt capture.
pub struct MockBackend {
    /// Pending responses, reversed so `pop()` yields the next one.
    responses: Mutex<Vec<MockResponse>>,
    fallback: MockResponse,
    delay: Option<Duration>,
    call_count: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Create a mock that always returns `response`.
    pub fn new(response: MockResponse) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            fallback: response,
            delay: None,
            call_count: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that returns responses in order, repeating the last one.
    ///
    /// An empty sequence behaves like an always-failing backend.
    pub fn with_sequence(mut responses: Vec<MockResponse>) -> Self {
        let fallback = responses
            .last()
            .cloned()
            .unwrap_or_else(|| MockResponse::Error("no mock response configured".into()));
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            ..Self::new(fallback)
        }
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `complete()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    fn next_response(&self) -> MockResponse {
        let popped = self.responses.lock().ok().and_then(|mut seq| seq.pop());
        popped.unwrap_or_else(|| self.fallback.clone())
    }
}

impl GenerationBackend for MockBackend {
    fn name(&self) -> &str {
        "Mock"
    }

    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let response = self.next_response();
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }

            match response {
                MockResponse::Text(text) => Ok(text),
                MockResponse::Error(msg) => Err(msg),
            }
        })
    }
}
