mod config;
mod quiz;
mod screens;

use std::sync::Arc;

use dotenv::dotenv;
use log::{debug, info};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};

use config::Config;
use quiz::catalog::Catalog;
use quiz::clock::SystemClock;
use quiz::session::{Action, Phase, Session, SessionError};
use quiz::Scenario;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> HandlerResult {
    // A .env file is optional; everything has a default.
    let _ = dotenv();

    pretty_env_logger::init();
    info!("Starting triage drill...");

    let config = Config::from_env();
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };
    info!("Loaded {} scenarios", catalog.len());
    for scenario in catalog.scenarios() {
        debug!(
            "Scenario {}: {} options, answer key {:?}",
            scenario.id,
            scenario.options.len(),
            scenario.correct_option().map(|o| o.id)
        );
    }

    let clock = SystemClock::new();
    let mut session = Session::new(Arc::new(catalog));
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    show(&mut stdout, &render(&session)).await?;
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if matches!(input.to_lowercase().as_str(), "q" | "quit" | "exit") {
            break;
        }

        let action = action_for(&session, input);
        let answering = matches!(action, Action::SelectAnswer(_));
        match session.apply(action, &clock) {
            Ok(next) => {
                if let Some(answer) = next.answers().last().filter(|_| answering) {
                    show(
                        &mut stdout,
                        &format!("Answer recorded in {:.1}s.\n\n", answer.response_time),
                    )
                    .await?;
                }
                session = next;
            }
            Err(SessionError::UnknownOptionSelected { .. }) => {
                let hint = session
                    .current_scenario()
                    .map(option_hint)
                    .unwrap_or_default();
                show(&mut stdout, &hint).await?;
                continue;
            }
            Err(e) => {
                show(&mut stdout, &format!("{}\n", e)).await?;
            }
        }
        show(&mut stdout, &render(&session)).await?;
    }

    debug!("Input closed, leaving after {} answers", session.answers().len());
    info!("Goodbye!");
    Ok(())
}

async fn show(stdout: &mut Stdout, text: &str) -> HandlerResult {
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

fn render(session: &Session) -> String {
    let text = match (session.phase(), session.current_scenario()) {
        (Phase::Playing, Some(scenario)) => {
            screens::scenario(session.current_index(), session.catalog().len(), scenario)
        }
        (Phase::Results, _) => screens::results(session),
        _ => screens::intro(session.catalog()),
    };
    format!("\n{}", text)
}

fn action_for(session: &Session, input: &str) -> Action {
    match (session.phase(), session.current_scenario()) {
        (Phase::Playing, Some(scenario)) => Action::SelectAnswer(option_id_for(scenario, input)),
        (Phase::Results, _) => Action::Restart,
        _ => Action::Start,
    }
}

/// Accepts an option number, a category name, or its first letter.
fn option_id_for(scenario: &Scenario, input: &str) -> String {
    if let Ok(n) = input.parse::<usize>() {
        if let Some(option) = n.checked_sub(1).and_then(|i| scenario.options.get(i)) {
            return option.id.as_str().to_string();
        }
    }

    let lowered = input.to_lowercase();
    if lowered.chars().count() == 1 {
        if let Some(option) = scenario
            .options
            .iter()
            .find(|o| o.id.as_str().starts_with(lowered.as_str()))
        {
            return option.id.as_str().to_string();
        }
    }
    lowered
}

fn option_hint(scenario: &Scenario) -> String {
    let names = scenario
        .options
        .iter()
        .map(|o| o.id.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Please choose 1-{} or one of: {}\n> ",
        scenario.options.len(),
        names
    )
}
