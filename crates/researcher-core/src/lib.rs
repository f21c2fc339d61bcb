pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod state;
pub mod view;

// Re-export main types for convenience
pub use client::{AnswerClient, AnswerService, DEFAULT_API_URL};
pub use config::Config;
pub use controller::InteractionController;
pub use error::SubmissionError;
pub use state::{AnswerResult, AskRequest, Citation, ErrorResult, ResponsePayload, UiState};
pub use view::{AnswerView, InputView, LinkView, ResultView, View};
