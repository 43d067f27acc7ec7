//! Parsing of the loosely structured JSON the model returns for flashcards
//! and quizzes.
//!
//! The model is asked for a bare JSON array but often wraps it in markdown
//! code fences anyway. Every literal fence marker is removed before parsing,
//! and the parsed value is then checked against the expected record shape so
//! callers can tell "not JSON at all" apart from "JSON, but not what we asked
//! for".

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::{Flashcard, QuizItem};

/// Number of options every quiz question must carry.
pub const QUIZ_OPTION_COUNT: usize = 4;

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("response is not valid JSON: {0}")]
    NotJson(#[source] serde_json::Error),
    #[error("response JSON has the wrong shape: {0}")]
    WrongShape(String),
}

/// Remove every "```json" and "```" marker and trim the remainder.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse a flashcard array (`[{"q": ..., "a": ...}, ...]`).
pub fn parse_flashcards(raw: &str) -> Result<Vec<Flashcard>, ResponseError> {
    parse_array(raw)
}

/// Parse a quiz array (`[{"question": ..., "options": [4], "answer": ...}, ...]`).
///
/// With `strict_answers`, an item whose answer is not one of its options is a
/// shape error; otherwise it is only logged.
pub fn parse_quiz(raw: &str, strict_answers: bool) -> Result<Vec<QuizItem>, ResponseError> {
    let items: Vec<QuizItem> = parse_array(raw)?;

    for (i, item) in items.iter().enumerate() {
        if item.options.len() != QUIZ_OPTION_COUNT {
            return Err(ResponseError::WrongShape(format!(
                "item {i}: expected {QUIZ_OPTION_COUNT} options, found {}",
                item.options.len()
            )));
        }
        if !item.answer_in_options() {
            if strict_answers {
                return Err(ResponseError::WrongShape(format!(
                    "item {i}: answer {:?} is not one of the options",
                    item.answer
                )));
            }
            tracing::warn!(index = i, answer = %item.answer, "quiz answer is not one of its options");
        }
    }

    Ok(items)
}

fn parse_array<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, ResponseError> {
    let cleaned = strip_code_fences(raw);
    let value: Value = serde_json::from_str(&cleaned).map_err(ResponseError::NotJson)?;

    let Value::Array(elements) = value else {
        return Err(ResponseError::WrongShape(format!(
            "expected a JSON array, found {}",
            kind_of(&value)
        )));
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(i, element)| {
            serde_json::from_value(element)
                .map_err(|e| ResponseError::WrongShape(format!("item {i}: {e}")))
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIZ_JSON: &str = r#"[{"question": "Capital of France?", "options": ["Berlin", "Paris", "Rome", "Madrid"], "answer": "Paris"}]"#;

    #[test]
    fn fenced_flashcards_parse_like_bare_ones() {
        let bare = r#"[{"q":"Capital of France?","a":"Paris"}]"#;
        let fenced = "```json\n[{\"q\":\"Capital of France?\",\"a\":\"Paris\"}]\n```";

        let from_bare = parse_flashcards(bare).unwrap();
        let from_fenced = parse_flashcards(fenced).unwrap();

        assert_eq!(from_bare, from_fenced);
        assert_eq!(
            from_fenced,
            vec![Flashcard {
                q: "Capital of France?".into(),
                a: "Paris".into(),
            }]
        );
    }

    #[test]
    fn untagged_fence_is_stripped() {
        let fenced = format!("```\n{QUIZ_JSON}\n```");
        let items = parse_quiz(&fenced, false).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].answer, "Paris");
    }

    #[test]
    fn fences_are_stripped_anywhere() {
        assert_eq!(strip_code_fences("  ```json[1]```  "), "[1]");
        assert_eq!(strip_code_fences("a```b```json c"), "ab c");
    }

    #[test]
    fn prose_is_not_json() {
        let err = parse_quiz("Sure! Here is your quiz about France.", false).unwrap_err();
        assert!(matches!(err, ResponseError::NotJson(_)));
    }

    #[test]
    fn empty_response_is_not_json() {
        let err = parse_flashcards("   ").unwrap_err();
        assert!(matches!(err, ResponseError::NotJson(_)));
    }

    #[test]
    fn object_instead_of_array_is_wrong_shape() {
        let err = parse_flashcards(r#"{"q": "x", "a": "y"}"#).unwrap_err();
        match err {
            ResponseError::WrongShape(msg) => assert!(msg.contains("an object"), "{msg}"),
            other => panic!("expected WrongShape, got {other:?}"),
        }
    }

    #[test]
    fn missing_field_is_wrong_shape() {
        let err = parse_flashcards(r#"[{"q": "x", "a": "y"}, {"question": "z"}]"#).unwrap_err();
        match err {
            ResponseError::WrongShape(msg) => assert!(msg.starts_with("item 1"), "{msg}"),
            other => panic!("expected WrongShape, got {other:?}"),
        }
    }

    #[test]
    fn extra_fields_are_ignored() {
        let cards = parse_flashcards(r#"[{"q": "x", "a": "y", "difficulty": 3}]"#).unwrap();
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(parse_flashcards("[]").unwrap().is_empty());
    }

    #[test]
    fn quiz_requires_four_options() {
        let raw = r#"[{"question": "Q?", "options": ["A", "B", "C"], "answer": "A"}]"#;
        let err = parse_quiz(raw, false).unwrap_err();
        match err {
            ResponseError::WrongShape(msg) => assert!(msg.contains("expected 4 options"), "{msg}"),
            other => panic!("expected WrongShape, got {other:?}"),
        }
    }

    #[test]
    fn stray_answer_is_tolerated_unless_strict() {
        let raw = r#"[{"question": "Q?", "options": ["A", "B", "C", "D"], "answer": "E"}]"#;
        assert_eq!(parse_quiz(raw, false).unwrap().len(), 1);

        let err = parse_quiz(raw, true).unwrap_err();
        assert!(matches!(err, ResponseError::WrongShape(_)));
    }
}
