//! UI-agnostic application state types
//!
//! This module contains the data structures shared between front-ends
//! (the TUI and the one-shot CLI) and the wire shapes exchanged with the
//! answer service. Nothing here depends on a UI framework.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Request body sent to `POST /api/ask`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskRequest {
    pub question: String,
}

/// A source the service cited for its answer
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Citation {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// A successful answer. Fields that are missing, null or of an unexpected
/// type decode to empty values; the body only has to be a JSON object.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AnswerResult {
    pub answer: String,
    pub reasoning: String,
    pub citations: Option<Vec<Citation>>,
    /// Opaque diagnostic entries, shown verbatim
    pub trace: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorResult {
    pub error: String,
}

/// The outcome of the last settled submission.
///
/// A body whose `error` field is truthy (non-empty string, non-zero number,
/// `true`, object or array) is an error even when it arrived with a 2xx
/// status. Anything else that is a JSON object is an answer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ResponsePayload {
    Error(ErrorResult),
    Answer(AnswerResult),
}

impl ResponsePayload {
    pub fn error(message: impl Into<String>) -> Self {
        ResponsePayload::Error(ErrorResult {
            error: message.into(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResponsePayload::Error(_))
    }

    /// Interpret a decoded body. Only non-object bodies are rejected.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => return Err(format!("expected a JSON object, found {}", type_name(&other))),
        };

        if let Some(error) = fields.get("error").filter(|v| is_truthy(v)) {
            let error = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Ok(ResponsePayload::Error(ErrorResult { error }));
        }

        Ok(ResponsePayload::Answer(AnswerResult {
            answer: text_field(&fields, "answer"),
            reasoning: text_field(&fields, "reasoning"),
            citations: array_field(&fields, "citations")
                .map(|entries| entries.iter().map(citation_from_value).collect()),
            trace: array_field(&fields, "trace").cloned(),
        }))
    }
}

impl<'de> Deserialize<'de> for ResponsePayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ResponsePayload::from_value(value).map_err(serde::de::Error::custom)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text as a page would print it: numbers stringified, null and booleans blank
fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Null | Value::Bool(_) => String::new(),
        other => other.to_string(),
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    fields.get(key).map(display_text).unwrap_or_default()
}

fn array_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Vec<Value>> {
    fields.get(key).and_then(Value::as_array)
}

fn citation_from_value(value: &Value) -> Citation {
    let Value::Object(fields) = value else {
        return Citation::default();
    };

    Citation {
        title: text_field(fields, "title"),
        url: text_field(fields, "url"),
        snippet: fields
            .get("snippet")
            .map(display_text)
            .filter(|s| !s.is_empty()),
    }
}

/// Transient state owned by the interaction controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub question: String,
    pub in_flight: bool,
    pub response: Option<ResponsePayload>,
}

impl UiState {
    /// Whether `question` holds something worth sending
    pub fn has_question(&self) -> bool {
        !self.question.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_answer_body_decodes() {
        let payload: ResponsePayload = serde_json::from_value(json!({
            "answer": "William Shakespeare",
            "reasoning": "Attributed authorship.",
            "citations": [{"title": "Hamlet - Wikipedia", "url": "https://en.wikipedia.org/wiki/Hamlet"}],
            "trace": [{"step": 1}]
        }))
        .unwrap();

        let ResponsePayload::Answer(answer) = payload else {
            panic!("expected an answer payload");
        };
        assert_eq!(answer.answer, "William Shakespeare");
        let citations = answer.citations.unwrap();
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].title, "Hamlet - Wikipedia");
        assert_eq!(citations[0].snippet, None);
        assert_eq!(answer.trace.unwrap(), vec![json!({"step": 1})]);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let payload: ResponsePayload = serde_json::from_value(json!({})).unwrap();
        assert_eq!(payload, ResponsePayload::Answer(AnswerResult::default()));
    }

    #[test]
    fn test_null_citations_are_absent() {
        let payload: ResponsePayload =
            serde_json::from_value(json!({"answer": "x", "citations": null})).unwrap();
        let ResponsePayload::Answer(answer) = payload else {
            panic!("expected an answer payload");
        };
        assert!(answer.citations.is_none());
    }

    #[test]
    fn test_error_field_takes_precedence() {
        let payload: ResponsePayload =
            serde_json::from_value(json!({"error": "quota exceeded", "answer": "ignored"})).unwrap();
        assert_eq!(payload, ResponsePayload::error("quota exceeded"));
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(serde_json::from_value::<ResponsePayload>(json!([1, 2, 3])).is_err());
        assert!(serde_json::from_value::<ResponsePayload>(json!("Paris")).is_err());
    }

    #[test]
    fn test_null_and_wrong_typed_fields_decode_to_empty() {
        let payload: ResponsePayload = serde_json::from_value(json!({
            "answer": null,
            "reasoning": true,
            "citations": [],
            "trace": "not a list"
        }))
        .unwrap();
        assert_eq!(
            payload,
            ResponsePayload::Answer(AnswerResult {
                answer: String::new(),
                reasoning: String::new(),
                citations: Some(vec![]),
                trace: None,
            })
        );
    }

    #[test]
    fn test_numbers_are_stringified() {
        let payload: ResponsePayload =
            serde_json::from_value(json!({"answer": 42, "reasoning": 1.5})).unwrap();
        let ResponsePayload::Answer(answer) = payload else {
            panic!("expected an answer payload");
        };
        assert_eq!(answer.answer, "42");
        assert_eq!(answer.reasoning, "1.5");
    }

    #[test]
    fn test_loose_citation_entries_still_decode() {
        let payload: ResponsePayload = serde_json::from_value(json!({
            "citations": [
                {"title": null, "url": "U"},
                {"title": 7, "url": "V", "snippet": ""},
                "just a string"
            ]
        }))
        .unwrap();
        let ResponsePayload::Answer(answer) = payload else {
            panic!("expected an answer payload");
        };
        assert_eq!(
            answer.citations.unwrap(),
            vec![
                Citation {
                    title: String::new(),
                    url: "U".to_string(),
                    snippet: None,
                },
                Citation {
                    title: "7".to_string(),
                    url: "V".to_string(),
                    snippet: None,
                },
                Citation::default(),
            ]
        );
    }

    #[test]
    fn test_falsy_error_field_is_ignored() {
        for error in [json!(""), json!(0), json!(false), json!(null)] {
            let payload: ResponsePayload =
                serde_json::from_value(json!({"error": error, "answer": "Paris"})).unwrap();
            let ResponsePayload::Answer(answer) = payload else {
                panic!("expected an answer payload");
            };
            assert_eq!(answer.answer, "Paris");
        }
    }

    #[test]
    fn test_truthy_non_string_error_is_stringified() {
        let payload: ResponsePayload =
            serde_json::from_value(json!({"error": 500, "answer": "Paris"})).unwrap();
        assert_eq!(payload, ResponsePayload::error("500"));

        let payload: ResponsePayload =
            serde_json::from_value(json!({"error": {"code": 1}})).unwrap();
        assert_eq!(payload, ResponsePayload::error(r#"{"code":1}"#));
    }

    #[test]
    fn test_non_object_error_names_the_type() {
        let err = serde_json::from_value::<ResponsePayload>(json!([1])).unwrap_err();
        assert!(err.to_string().contains("expected a JSON object, found an array"));
    }

    #[test]
    fn test_has_question_ignores_whitespace() {
        let mut state = UiState::default();
        assert!(!state.has_question());
        state.question = " \t\n ".to_string();
        assert!(!state.has_question());
        state.question = "  Who? ".to_string();
        assert!(state.has_question());
    }
}
