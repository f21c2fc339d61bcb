use std::process::ExitCode;
use std::sync::Arc;
use anyhow::Result;
use clap::{Parser, Subcommand};
use researcher_core::view::{self, ResultView};
use researcher_core::{AnswerClient, Config, InteractionController};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::{App, HealthStatus};
use logging::LogTarget;
use tui::{AppEvent, EventHandler, Tui};

#[derive(Parser)]
#[command(name = "researcher")]
#[command(about = "Ask factual questions to the Research & Reason Assistant", version)]
struct Cli {
    /// Base URL of the answer service (overrides RESEARCHER_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask one question and print the result
    Ask {
        /// Your question
        question: String,
    },
    /// Check whether the answer service is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::new(), Some(err)),
    };

    let log_target = match cli.command {
        None => LogTarget::File(Config::get_log_path()?),
        Some(_) => LogTarget::Stderr,
    };
    logging::init(config.log_level.as_deref(), log_target)?;

    if let Some(err) = config_error {
        tracing::warn!(error = %err, "could not read config file, using defaults");
    }

    let api_url = config.resolve_api_url(cli.api_url.as_deref());
    tracing::info!(%api_url, "using answer service");

    let client = AnswerClient::new(&api_url);
    let controller = InteractionController::new(Arc::new(client.clone()));

    match cli.command {
        None => {
            run_tui(controller, client, api_url).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Ask { question }) => Ok(ask_once(&controller, &question).await),
        Some(Commands::Health) => Ok(check_health(&client).await),
    }
}

async fn ask_once(controller: &InteractionController, question: &str) -> ExitCode {
    if question.trim().is_empty() {
        eprintln!("Question cannot be empty");
        return ExitCode::FAILURE;
    }

    controller.submit(question).await;

    let result = view::project_result(controller.snapshot().response.as_ref());
    let failed = matches!(result, ResultView::Error(_));
    let output = view::render_plain(&result);

    if failed {
        eprintln!("{}", output);
        ExitCode::FAILURE
    } else {
        println!("{}", output.trim_end());
        ExitCode::SUCCESS
    }
}

async fn check_health(client: &AnswerClient) -> ExitCode {
    match client.health().await {
        Ok(status) => {
            println!("{}: {}", client.base_url(), status);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}: unreachable ({})", client.base_url(), err);
            ExitCode::FAILURE
        }
    }
}

async fn run_tui(controller: InteractionController, client: AnswerClient, api_url: String) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let mut app = App::new(controller.clone(), api_url);

    // Wake the UI loop whenever the controller publishes a new state
    let tx_state = events.sender();
    let mut state_rx = controller.subscribe();
    tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            if tx_state.send(AppEvent::StateChanged).is_err() {
                break;
            }
        }
    });

    // One-off health probe for the header
    let tx_health = events.sender();
    tokio::spawn(async move {
        let status = match client.health().await {
            Ok(status) => HealthStatus::Online(status),
            Err(err) => {
                tracing::warn!(error = %err, "health check failed");
                HealthStatus::Offline(err.to_string())
            }
        };
        let _ = tx_health.send(AppEvent::Health(status));
    });

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }

    if app.submission_running() {
        tracing::info!("quitting with a request still outstanding");
    }
    Ok(())
}
