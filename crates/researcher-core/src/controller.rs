//! Interaction controller
//!
//! Owns the question text, the in-flight flag and the last response inside a
//! `watch` channel. Front-ends subscribe to read snapshots and call
//! [`InteractionController::submit`] to run one request/response cycle.
//!
//! There is no re-entrancy guard: a caller that submits while a request is
//! outstanding starts a second request. Front-ends prevent that by disabling
//! the trigger while `in_flight` is set.

use std::sync::Arc;
use tokio::sync::watch;

use crate::client::AnswerService;
use crate::state::{ResponsePayload, UiState};

#[derive(Clone)]
pub struct InteractionController {
    service: Arc<dyn AnswerService>,
    state: Arc<watch::Sender<UiState>>,
}

impl InteractionController {
    pub fn new(service: Arc<dyn AnswerService>) -> Self {
        let (state, _) = watch::channel(UiState::default());
        Self {
            service,
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> UiState {
        self.state.borrow().clone()
    }

    /// Replace the question text. Allowed at any time, including mid-request.
    pub fn set_question(&self, question: impl Into<String>) {
        let question = question.into();
        self.state.send_modify(|state| state.question = question);
    }

    /// Submit `question` to the answer service.
    ///
    /// Blank questions are ignored. The question is sent untrimmed. Whatever
    /// happens, `in_flight` is false again once this returns, and the previous
    /// response is replaced wholesale.
    pub async fn submit(&self, question: &str) {
        if question.trim().is_empty() {
            tracing::debug!("ignoring blank question");
            return;
        }

        self.state.send_modify(|state| state.in_flight = true);
        tracing::info!(question = %question, "submitting question");

        let payload = match self.service.ask(question).await {
            Ok(payload) => {
                tracing::info!(error = payload.is_error(), "answer received");
                payload
            }
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = %err, "submission failed");
                ResponsePayload::error(err.user_message())
            }
        };

        self.state.send_modify(|state| {
            state.response = Some(payload);
            state.in_flight = false;
        });
    }

    /// Submit whatever question text is currently held
    pub async fn submit_current(&self) {
        let question = self.state.borrow().question.clone();
        self.submit(&question).await;
    }
}
