use ratatui::widgets::ListState;
use researcher_core::view::{self, ResultView, View};
use researcher_core::{InteractionController, UiState};
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Input,
    Citations,
}

/// Result of the startup `/health` probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Checking,
    Online(String),
    Offline(String),
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: FocusPane,

    // Controller store and the latest snapshot read from it
    pub controller: InteractionController,
    pub state_rx: watch::Receiver<UiState>,
    pub snapshot: UiState,
    pub view: View,
    pub submit_task: Option<JoinHandle<()>>,

    // Input state
    pub question_cursor: usize, // cursor position in characters

    // Result state
    pub result_scroll: u16,
    pub result_height: u16,
    pub result_lines: u16, // wrapped line count of the last drawn body
    pub citations_state: ListState,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Header/footer
    pub api_url: String,
    pub health: HealthStatus,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(controller: InteractionController, api_url: String) -> Self {
        let state_rx = controller.subscribe();
        let snapshot = controller.snapshot();
        let view = view::project(&snapshot);

        Self {
            should_quit: false,
            focus: FocusPane::Input,
            controller,
            state_rx,
            snapshot,
            view,
            submit_task: None,
            question_cursor: 0,
            result_scroll: 0,
            result_height: 0,
            result_lines: 0,
            citations_state: ListState::default(),
            animation_frame: 0,
            api_url,
            health: HealthStatus::Checking,
            status_message: None,
        }
    }

    /// Pull the latest controller state and recompute the view
    pub fn refresh(&mut self) {
        let latest = self.state_rx.borrow_and_update().clone();

        if latest.response != self.snapshot.response {
            self.result_scroll = 0;
            self.citations_state = ListState::default();
            if let ResultView::Answer(answer) = view::project_result(latest.response.as_ref()) {
                if !answer.citations.is_empty() {
                    self.citations_state.select(Some(0));
                }
            }
            if self.focus == FocusPane::Citations && self.citation_count() == 0 {
                self.focus = FocusPane::Input;
            }
        }

        // Keep the cursor inside the text if the question changed underneath us
        let len = latest.question.chars().count();
        self.question_cursor = self.question_cursor.min(len);

        self.view = view::project(&latest);
        self.snapshot = latest;
    }

    pub fn question(&self) -> &str {
        &self.snapshot.question
    }

    /// Whether a spawned submission has not finished yet
    pub fn submission_running(&self) -> bool {
        self.submit_task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Spawn a submission of the current question if the trigger is enabled
    pub fn submit(&mut self) -> bool {
        if !self.view.input.submit_enabled || self.submission_running() {
            return false;
        }

        let controller = self.controller.clone();
        self.status_message = None;
        self.submit_task = Some(tokio::spawn(async move {
            controller.submit_current().await;
        }));
        true
    }

    pub fn set_question(&mut self, question: String, cursor: usize) {
        self.controller.set_question(question);
        self.question_cursor = cursor;
        self.refresh();
    }

    pub fn citation_count(&self) -> usize {
        match &self.view.result {
            ResultView::Answer(answer) => answer.citations.len(),
            _ => 0,
        }
    }

    pub fn selected_citation_url(&self) -> Option<String> {
        let ResultView::Answer(answer) = &self.view.result else {
            return None;
        };
        self.citations_state
            .selected()
            .and_then(|i| answer.citations.get(i))
            .map(|link| link.target.clone())
    }

    pub fn citations_nav_down(&mut self) {
        let count = self.citation_count();
        if count == 0 {
            return;
        }
        let next = self.citations_state.selected().map_or(0, |i| (i + 1).min(count - 1));
        self.citations_state.select(Some(next));
    }

    pub fn citations_nav_up(&mut self) {
        if self.citation_count() == 0 {
            return;
        }
        let prev = self.citations_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.citations_state.select(Some(prev));
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::Input if self.citation_count() > 0 => FocusPane::Citations,
            _ => FocusPane::Input,
        };
    }

    /// Furthest the body can scroll while the last line stays on screen
    pub fn max_scroll(&self) -> u16 {
        self.result_lines.saturating_sub(self.result_height)
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.result_scroll = self.result_scroll.saturating_add(lines).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.result_scroll = self.result_scroll.saturating_sub(lines);
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.snapshot.in_flight {
            self.animation_frame = (self.animation_frame + 1) % 3;
        } else {
            self.animation_frame = 0;
        }
    }
}
