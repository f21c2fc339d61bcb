use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::SubmissionError;
use crate::state::{AskRequest, ResponsePayload};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// The remote question-answering backend
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Send one question and decode whatever the service answers with.
    async fn ask(&self, question: &str) -> Result<ResponsePayload, SubmissionError>;
}

/// FastAPI puts the reason for a 4xx/5xx in `detail`
#[derive(Deserialize)]
struct ErrorDetail {
    detail: String,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

/// HTTP client for the answer service
#[derive(Clone)]
pub struct AnswerClient {
    client: Client,
    base_url: String,
}

impl AnswerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn ask_url(&self) -> String {
        format!("{}/api/ask", self.base_url)
    }

    /// Probe `GET /health` and return the reported status
    pub async fn health(&self) -> anyhow::Result<String> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Health check failed with status: {}", response.status()));
        }

        let health: HealthResponse = response.json().await?;
        Ok(health.status)
    }
}

#[async_trait]
impl AnswerService for AnswerClient {
    async fn ask(&self, question: &str) -> Result<ResponsePayload, SubmissionError> {
        let url = self.ask_url();
        let request = AskRequest {
            question: question.to_string(),
        };

        tracing::debug!(%url, chars = question.chars().count(), "posting question");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorDetail>(&body)
                .ok()
                .map(|d| d.detail);
            return Err(SubmissionError::HttpStatus {
                status: status.as_u16(),
                detail,
            });
        }

        let payload: ResponsePayload = serde_json::from_slice(&body)?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AnswerResult, Citation};
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    async fn spawn_mock_service(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_ask_posts_untrimmed_question_and_decodes_answer() {
        let seen = Arc::new(Mutex::new(None::<Value>));
        let seen_in_handler = seen.clone();
        let app = Router::new().route(
            "/api/ask",
            post(move |Json(body): Json<Value>| {
                let seen = seen_in_handler.clone();
                async move {
                    *seen.lock().unwrap() = Some(body);
                    Json(json!({
                        "answer": "William Shakespeare",
                        "reasoning": "Well documented.",
                        "citations": [{"title": "Hamlet - Wikipedia", "url": "https://en.wikipedia.org/wiki/Hamlet"}],
                        "trace": [{"step": 1}]
                    }))
                }
            }),
        );
        let base_url = spawn_mock_service(app).await;

        let client = AnswerClient::new(&base_url);
        let payload = client.ask("  Who wrote Hamlet? ").await.unwrap();

        assert_eq!(
            seen.lock().unwrap().clone(),
            Some(json!({"question": "  Who wrote Hamlet? "}))
        );
        assert_eq!(
            payload,
            ResponsePayload::Answer(AnswerResult {
                answer: "William Shakespeare".to_string(),
                reasoning: "Well documented.".to_string(),
                citations: Some(vec![Citation {
                    title: "Hamlet - Wikipedia".to_string(),
                    url: "https://en.wikipedia.org/wiki/Hamlet".to_string(),
                    snippet: None,
                }]),
                trace: Some(vec![json!({"step": 1})]),
            })
        );
    }

    #[tokio::test]
    async fn test_non_success_status_carries_detail() {
        let app = Router::new().route(
            "/api/ask",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": "Processing error: boom"})),
                )
            }),
        );
        let base_url = spawn_mock_service(app).await;

        let err = AnswerClient::new(&base_url).ask("q").await.unwrap_err();
        assert_eq!(
            err,
            SubmissionError::HttpStatus {
                status: 500,
                detail: Some("Processing error: boom".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_failure() {
        let app = Router::new().route("/api/ask", post(|| async { "not json at all" }));
        let base_url = spawn_mock_service(app).await;

        let err = AnswerClient::new(&base_url).ask("q").await.unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[tokio::test]
    async fn test_null_fields_in_success_body_are_not_a_failure() {
        let app = Router::new().route(
            "/api/ask",
            post(|| async { Json(json!({"answer": null, "reasoning": "r", "citations": [], "trace": []})) }),
        );
        let base_url = spawn_mock_service(app).await;

        let payload = AnswerClient::new(&base_url).ask("q").await.unwrap();
        assert_eq!(
            payload,
            ResponsePayload::Answer(AnswerResult {
                answer: String::new(),
                reasoning: "r".to_string(),
                citations: Some(vec![]),
                trace: Some(vec![]),
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_failure() {
        // Bind then drop so the port is very likely closed
        let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = AnswerClient::new(&format!("http://{}", addr))
            .ask("q")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "network");
    }

    #[tokio::test]
    async fn test_health_reports_status() {
        let app = Router::new().route(
            "/health",
            get(|| async { Json(json!({"status": "healthy", "agents": "operational"})) }),
        );
        let base_url = spawn_mock_service(app).await;

        let status = AnswerClient::new(&format!("{}/", base_url)).health().await.unwrap();
        assert_eq!(status, "healthy");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = AnswerClient::new("http://127.0.0.1:8000/");
        assert_eq!(client.ask_url(), "http://127.0.0.1:8000/api/ask");
    }
}
