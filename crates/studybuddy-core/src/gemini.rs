use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::{Value, json};

use crate::Config;
use crate::generator::{GenerationBackend, GenerationError};

/// Google Gemini `generateContent` backend.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiBackend {
    /// Build a backend from resolved configuration.
    ///
    /// Fails with [`GenerationError::MissingApiKey`] when no key was resolved.
    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(GenerationError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| GenerationError::Service(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Request body for a single-turn text prompt.
    fn build_request_body(prompt: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
        })
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(resp: &Value) -> Result<String, String> {
        let parts = resp["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| {
                match resp["promptFeedback"]["blockReason"].as_str() {
                    Some(reason) => format!("prompt blocked: {reason}"),
                    None => "missing candidates[0].content.parts in response".to_string(),
                }
            })?;

        let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
        Ok(text)
    }

    /// Human-readable message for a non-success HTTP response.
    fn error_message(status: reqwest::StatusCode, body: &str) -> String {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());

        if detail.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {detail}")
        }
    }
}

impl GenerationBackend for GeminiBackend {
    fn name(&self) -> &str {
        "Gemini"
    }

    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>> {
        Box::pin(async move {
            tracing::debug!(model = %self.model, "Gemini request");

            let resp = self
                .client
                .post(self.endpoint())
                .header("x-goog-api-key", &self.api_key)
                .json(&Self::build_request_body(prompt))
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        "timeout".to_string()
                    } else {
                        e.to_string()
                    }
                })?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(Self::error_message(status, &body));
            }

            let data: Value = resp.json().await.map_err(|e| e.to_string())?;
            Self::extract_text(&data)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> Config {
        Config {
            api_key: key.map(str::to_string),
            ..Config::default()
        }
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = GeminiBackend::from_config(&config_with_key(None)).unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));

        let err = GeminiBackend::from_config(&config_with_key(Some("  "))).unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));
    }

    #[test]
    fn endpoint_uses_model_and_trims_slash() {
        let config = Config {
            base_url: "http://localhost:9000/v1beta/".into(),
            model: "gemini-test".into(),
            ..config_with_key(Some("k"))
        };
        let backend = GeminiBackend::from_config(&config).unwrap();
        assert_eq!(
            backend.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn debug_hides_key() {
        let backend = GeminiBackend::from_config(&config_with_key(Some("secret"))).unwrap();
        assert!(!format!("{backend:?}").contains("secret"));
    }

    #[test]
    fn request_body_structure() {
        let body = GeminiBackend::build_request_body("Hello");
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "Hello");
    }

    #[test]
    fn text_parts_are_concatenated() {
        let resp = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello, " }, { "text": "world" }] }
            }]
        });
        assert_eq!(GeminiBackend::extract_text(&resp).unwrap(), "Hello, world");
    }

    #[test]
    fn blocked_prompt_is_reported() {
        let resp = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert_eq!(
            GeminiBackend::extract_text(&resp).unwrap_err(),
            "prompt blocked: SAFETY"
        );
    }

    #[test]
    fn missing_candidates_is_an_error() {
        let err = GeminiBackend::extract_text(&json!({})).unwrap_err();
        assert!(err.contains("missing candidates"));
    }

    #[test]
    fn error_message_prefers_api_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        let msg = GeminiBackend::error_message(reqwest::StatusCode::BAD_REQUEST, body);
        assert_eq!(msg, "HTTP 400 Bad Request: API key not valid.");

        let msg = GeminiBackend::error_message(reqwest::StatusCode::BAD_GATEWAY, "");
        assert_eq!(msg, "HTTP 502 Bad Gateway");
    }
}
