use std::io::Write;
use std::process::{Command, Stdio};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::{App, FocusPane};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize | AppEvent::StateChanged => {}
        AppEvent::Health(status) => app.health = status,
        AppEvent::Tick => app.tick_animation(),
    }
    app.refresh();
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any focus
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_focus();
            return;
        }
        KeyCode::Up => {
            app.scroll_up(1);
            return;
        }
        KeyCode::Down => {
            app.scroll_down(1);
            return;
        }
        KeyCode::PageUp => {
            app.scroll_up(app.result_height.max(1));
            return;
        }
        KeyCode::PageDown => {
            app.scroll_down(app.result_height.max(1));
            return;
        }
        _ => {}
    }

    match app.focus {
        FocusPane::Input => handle_input(app, key),
        FocusPane::Citations => handle_citations(app, key),
    }
}

fn handle_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Enter {
        if app.submit() {
            tracing::debug!("submission spawned from input");
        }
        return;
    }

    // The field is read-only while a request is outstanding
    if !app.view.input.input_enabled {
        return;
    }

    let mut question = app.question().to_string();
    let char_count = question.chars().count();
    let cursor = app.question_cursor.min(char_count);

    match key.code {
        KeyCode::Backspace => {
            if cursor > 0 {
                let byte_pos = char_to_byte_index(&question, cursor - 1);
                question.remove(byte_pos);
                app.set_question(question, cursor - 1);
            }
        }
        KeyCode::Delete => {
            if cursor < char_count {
                let byte_pos = char_to_byte_index(&question, cursor);
                question.remove(byte_pos);
                app.set_question(question, cursor);
            }
        }
        KeyCode::Left => {
            app.question_cursor = cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            app.question_cursor = (cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.question_cursor = 0;
        }
        KeyCode::End => {
            app.question_cursor = char_count;
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.set_question(String::new(), 0);
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&question, cursor);
            question.insert(byte_pos, c);
            app.set_question(question, cursor + 1);
        }
        _ => {}
    }
}

fn handle_citations(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') => app.citations_nav_down(),
        KeyCode::Char('k') => app.citations_nav_up(),
        KeyCode::Enter | KeyCode::Char('o') => {
            if let Some(url) = app.selected_citation_url() {
                app.status_message = Some(match open_url(&url) {
                    Ok(()) => format!("Opened {}", url),
                    Err(err) => {
                        tracing::warn!(%url, error = %err, "could not open link");
                        format!("Could not open {}: {}", url, err)
                    }
                });
            }
        }
        KeyCode::Char('c') => {
            if let Some(url) = app.selected_citation_url() {
                app.status_message = Some(match copy_to_clipboard(&url) {
                    Ok(()) => format!("Copied {}", url),
                    Err(err) => {
                        tracing::warn!(%url, error = %err, "could not copy link");
                        format!("Could not copy {}: {}", url, err)
                    }
                });
            }
        }
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

/// Open a link in the system browser as a separate process.
///
/// The child gets null stdio and no handle back to this process. It is reaped
/// on a blocking thread so the UI loop never waits on the opener.
fn open_url(url: &str) -> std::io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    };

    let mut child = command
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    tokio::task::spawn_blocking(move || match child.wait() {
        Ok(status) if !status.success() => tracing::warn!(%status, "link opener exited with failure"),
        Ok(_) => {}
        Err(err) => tracing::warn!(error = %err, "could not wait for link opener"),
    });
    Ok(())
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("pbcopy")
    } else {
        let mut cmd = Command::new("xclip");
        cmd.args(["-selection", "clipboard"]);
        cmd
    };

    pipe_to_command(&mut command, text)
}

/// Feed `text` to the command's stdin and wait for it to exit successfully
fn pipe_to_command(command: &mut Command, text: &str) -> std::io::Result<()> {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    // Dropping stdin closes the pipe so the child sees end of input
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait()?;

    if !status.success() {
        return Err(std::io::Error::other(format!(
            "{} exited with {}",
            command.get_program().to_string_lossy(),
            status
        )));
    }
    written
}
