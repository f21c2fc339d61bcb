//! Pure projection from [`UiState`] to what a front-end should draw.

use crate::state::{ResponsePayload, UiState};

pub const SUBMIT_LABEL: &str = "Ask";
pub const PENDING_LABEL: &str = "Thinking...";
pub const INPUT_PLACEHOLDER: &str = "Ask a factual question...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    pub input_enabled: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
}

/// A citation as a clickable link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub text: String,
    pub target: String,
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerView {
    pub answer: String,
    pub reasoning: String,
    /// Empty means no citations section
    pub citations: Vec<LinkView>,
    /// Pretty-printed trace, `None` means no trace section
    pub trace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    Hidden,
    Error(String),
    Answer(AnswerView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub input: InputView,
    pub result: ResultView,
}

pub fn project(state: &UiState) -> View {
    View {
        input: project_input(state),
        result: project_result(state.response.as_ref()),
    }
}

pub fn project_input(state: &UiState) -> InputView {
    InputView {
        input_enabled: !state.in_flight,
        submit_enabled: !state.in_flight && state.has_question(),
        submit_label: if state.in_flight { PENDING_LABEL } else { SUBMIT_LABEL },
    }
}

pub fn project_result(response: Option<&ResponsePayload>) -> ResultView {
    match response {
        None => ResultView::Hidden,
        Some(ResponsePayload::Error(err)) => ResultView::Error(format!("Error: {}", err.error)),
        Some(ResponsePayload::Answer(answer)) => {
            let citations = answer
                .citations
                .iter()
                .flatten()
                .map(|c| LinkView {
                    text: c.title.clone(),
                    target: c.url.clone(),
                    snippet: c.snippet.clone().filter(|s| !s.trim().is_empty()),
                })
                .collect();

            let trace = answer
                .trace
                .as_ref()
                .filter(|entries| !entries.is_empty())
                .map(|entries| {
                    serde_json::to_string_pretty(entries).unwrap_or_else(|_| format!("{:?}", entries))
                });

            ResultView::Answer(AnswerView {
                answer: answer.answer.clone(),
                reasoning: answer.reasoning.clone(),
                citations,
                trace,
            })
        }
    }
}

/// Render a result as plain text for non-interactive output
pub fn render_plain(result: &ResultView) -> String {
    match result {
        ResultView::Hidden => String::new(),
        ResultView::Error(message) => message.clone(),
        ResultView::Answer(view) => {
            let mut out = format!("Answer\n{}\n\nReasoning\n{}\n", view.answer, view.reasoning);

            if !view.citations.is_empty() {
                out.push_str("\nCitations\n");
                for (i, link) in view.citations.iter().enumerate() {
                    out.push_str(&format!("{}. {} <{}>\n", i + 1, link.text, link.target));
                    if let Some(snippet) = &link.snippet {
                        out.push_str(&format!("   {}\n", snippet));
                    }
                }
            }

            if let Some(trace) = &view.trace {
                out.push_str("\nTrace\n");
                out.push_str(trace);
                out.push('\n');
            }

            out
        }
    }
}
