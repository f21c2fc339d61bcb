use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use researcher_core::view::{AnswerView, ResultView, INPUT_PLACEHOLDER};
use crate::app::{App, FocusPane, HealthStatus};

const BUTTON_WIDTH: u16 = 16;
const MAX_CITATION_ROWS: u16 = 8;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, input row, result, footer
    let [header_area, input_area, result_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_input_row(app, frame, input_area);
    render_result(app, frame, result_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let (health_text, health_color) = match &app.health {
        HealthStatus::Checking => ("checking".to_string(), Color::DarkGray),
        HealthStatus::Online(status) => (format!("online ({})", status), Color::Green),
        HealthStatus::Offline(reason) => (format!("offline ({})", reason), Color::Red),
    };

    let title = Line::from(vec![
        Span::styled(" Research & Reason Assistant ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!(" {} ", app.api_url), Style::default().fg(Color::DarkGray)),
        Span::styled(health_text, Style::default().fg(health_color)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(title), area);
}

fn render_input_row(app: &mut App, frame: &mut Frame, area: Rect) {
    let [field_area, button_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(BUTTON_WIDTH),
    ])
    .areas(area);

    let input = &app.view.input;
    let focused = app.focus == FocusPane::Input;
    let border_color = if !input.input_enabled {
        Color::DarkGray
    } else if focused {
        Color::Yellow
    } else {
        Color::Gray
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Question ");

    // Horizontal scrolling so the cursor stays visible
    let inner_width = field_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.question_cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let question = app.question();
    let field = if question.is_empty() {
        Paragraph::new(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
    } else {
        let visible_text: String = question
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        let text_color = if input.input_enabled { Color::Cyan } else { Color::DarkGray };
        Paragraph::new(visible_text).style(Style::default().fg(text_color))
    };

    frame.render_widget(field.block(input_block), field_area);

    if focused && input.input_enabled {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((field_area.x + cursor_x + 1, field_area.y + 1));
    }

    // Submit trigger
    let label = if app.snapshot.in_flight {
        // Animated ellipsis while pending: "Thinking." / ".." / "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        format!("{}{}", input.submit_label.trim_end_matches('.'), dots)
    } else {
        input.submit_label.to_string()
    };
    let button_style = if input.submit_enabled {
        Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let button = Paragraph::new(Line::from(label).centered())
        .style(button_style)
        .block(Block::default().borders(Borders::ALL).border_style(button_style));

    frame.render_widget(button, button_area);
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
}

/// Lines for answer, reasoning and trace; citations are drawn as a list
fn answer_lines(answer: &AnswerView) -> Vec<Line<'static>> {
    let mut lines = vec![section_title("Answer")];
    lines.extend(answer.answer.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::default());

    lines.push(section_title("Reasoning"));
    lines.extend(
        answer
            .reasoning
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Gray)))),
    );

    if let Some(trace) = &answer.trace {
        lines.push(Line::default());
        lines.push(section_title("Trace"));
        lines.extend(
            trace
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::DarkGray)))),
        );
    }

    lines
}

fn render_result(app: &mut App, frame: &mut Frame, area: Rect) {
    let answer = match &app.view.result {
        ResultView::Hidden => {
            app.result_height = 0;
            app.result_lines = 0;
            app.result_scroll = 0;
            return;
        }
        ResultView::Error(message) => {
            let error = Paragraph::new(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)))
            .wrap(Wrap { trim: false });
            frame.render_widget(error, area);
            app.result_height = area.height.saturating_sub(2);
            app.result_lines = 0;
            app.result_scroll = 0;
            return;
        }
        ResultView::Answer(answer) => answer.clone(),
    };

    let citations_height = if answer.citations.is_empty() {
        0
    } else {
        (answer.citations.len() as u16 * 2).min(MAX_CITATION_ROWS) + 2
    };

    let [body_area, citations_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(citations_height),
    ])
    .areas(area);

    let body = Paragraph::new(Text::from(answer_lines(&answer))).wrap(Wrap { trim: false });

    // Measure the wrapped text before the border is attached
    let inner_width = body_area.width.saturating_sub(2);
    app.result_height = body_area.height.saturating_sub(2);
    app.result_lines = u16::try_from(body.line_count(inner_width)).unwrap_or(u16::MAX);
    app.result_scroll = app.result_scroll.min(app.max_scroll());

    let body = body
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Response (Up/Down to scroll) "),
        )
        .scroll((app.result_scroll, 0));

    frame.render_widget(body, body_area);

    if answer.citations.is_empty() {
        return;
    }

    let focused = app.focus == FocusPane::Citations;
    let border_color = if focused { Color::Cyan } else { Color::Magenta };

    let items: Vec<ListItem> = answer
        .citations
        .iter()
        .map(|link| {
            let mut lines = vec![Line::from(vec![
                Span::styled(link.text.clone(), Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)),
                Span::styled(format!(" <{}>", link.target), Style::default().fg(Color::DarkGray)),
            ])];
            if let Some(snippet) = &link.snippet {
                lines.push(Line::from(Span::styled(
                    format!("  {}", snippet),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(" Citations (Tab to focus, Enter to open) "),
        )
        .highlight_style(if focused {
            Style::default().bg(Color::Magenta).fg(Color::White)
        } else {
            Style::default()
        })
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, citations_area, &mut app.citations_state);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = match app.focus {
        FocusPane::Input => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" ask ", label_style),
            Span::styled(" Ctrl-U ", key_style),
            Span::styled(" clear ", label_style),
        ],
        FocusPane::Citations => vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" select ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" open ", label_style),
            Span::styled(" c ", key_style),
            Span::styled(" copy ", label_style),
        ],
    };
    hints.extend(vec![
        Span::styled(" Tab ", key_style),
        Span::styled(" focus ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    if let Some(message) = &app.status_message {
        hints.push(Span::raw(" "));
        hints.push(Span::styled(message.clone(), Style::default().fg(Color::Green)));
    }

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}
