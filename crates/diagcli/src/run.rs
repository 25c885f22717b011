//! Interactive driver: turns stdin lines into wizard events

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use diagcore::core::logging::log_wizard_configuration;
use diagcore::wizard::{
    AuthMailbox, ContactForm, HostSnapshot, HttpTransport, LoginWidgetAuth, ScenarioId, WizardSession, WizardState,
};
use diagcore::{config, WizardConfig};

use crate::cli::RunArgs;
use crate::console::ConsoleView;

type ConsoleSession = WizardSession<ConsoleView, HttpTransport>;

/// What the user typed, after driver commands were handled
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Text(String),
    /// `/next` — press the call-to-action without picking a scenario
    Next,
    Quit,
}

/// Merges CLI flags over the environment configuration
pub fn build_config(args: &RunArgs) -> WizardConfig {
    let mut config = WizardConfig::from_env();
    config.require_identity |= args.require_identity;
    config.enable_diagnostic_log |= args.diagnostic_log;
    config.post_submit_download |= args.download;
    config.advance_without_scenario_guard |= args.no_scenario_guard;
    match args.success_delay_ms {
        Some(ms) => config.with_success_delay(Duration::from_millis(ms)),
        None => config,
    }
}

pub async fn run(args: RunArgs) -> Result<()> {
    let config = build_config(&args);
    let base_url = args.base_url.clone().unwrap_or_else(|| config::BASE_URL.clone());
    log_wizard_configuration(&config, &base_url);

    let host = args
        .init_data
        .as_deref()
        .map(HostSnapshot::from_init_data)
        .unwrap_or_else(HostSnapshot::absent);
    let transport = HttpTransport::new(&base_url).with_context(|| format!("Invalid backend URL: {}", base_url))?;
    let view = ConsoleView::new(args.download_dir.clone().unwrap_or_else(|| PathBuf::from(".")));

    let mut session = WizardSession::new(config, view, transport, Arc::new(host), AuthMailbox::new());

    if let Some(json) = args.login_json.as_deref() {
        let auth: LoginWidgetAuth = serde_json::from_str(json).context("Invalid --login-json")?;
        session.handle_login_widget_auth(auth);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    drive(&mut session, &mut lines).await
}

async fn drive<R: AsyncBufRead + Unpin>(session: &mut ConsoleSession, lines: &mut Lines<R>) -> Result<()> {
    loop {
        match session.state() {
            WizardState::ScenarioSelect => {
                prompt("Номер сценария (1-6), /next, /quit:");
                match next_input(session, lines).await? {
                    Input::Quit => return Ok(()),
                    Input::Next => ignore(session.proceed_to_contact()),
                    Input::Text(raw) => match raw.parse::<ScenarioId>() {
                        Ok(id) => ignore(session.select_scenario(id)),
                        Err(e) => println!("{}", e),
                    },
                }
            }
            WizardState::InsightShown => {
                prompt("Enter — продолжить:");
                match next_input(session, lines).await? {
                    Input::Quit => return Ok(()),
                    Input::Next | Input::Text(_) => ignore(session.proceed_to_contact()),
                }
            }
            WizardState::ContactForm => {
                let Some(form) = read_form(session, lines).await? else {
                    return Ok(());
                };
                session.view_mut().form = form;
                ignore(session.submit_contact().await);
            }
            WizardState::Success => {
                print_trace(session);
                return Ok(());
            }
        }
    }
}

/// Asks for name, email and telegram; `None` when the user quits
async fn read_form<R: AsyncBufRead + Unpin>(
    session: &mut ConsoleSession,
    lines: &mut Lines<R>,
) -> Result<Option<ContactForm>> {
    // Keep what was typed before so a failed submit can be corrected
    let previous = session.view().form.clone();
    let mut values = Vec::with_capacity(3);
    for (label, old) in [
        ("Имя", previous.name),
        ("Email", previous.email),
        ("Telegram (необязательно)", previous.telegram),
    ] {
        if old.is_empty() {
            prompt(&format!("{}:", label));
        } else {
            prompt(&format!("{} [{}]:", label, old));
        }
        match next_input(session, lines).await? {
            Input::Quit => return Ok(None),
            Input::Next => values.push(old),
            Input::Text(text) if text.trim().is_empty() => values.push(old),
            Input::Text(text) => values.push(text),
        }
    }
    let mut values = values.into_iter();
    Ok(Some(ContactForm {
        name: values.next().unwrap_or_default(),
        email: values.next().unwrap_or_default(),
        telegram: values.next().unwrap_or_default(),
    }))
}

/// Reads one line, handling `/login`, `/trace` and `/quit` on the way
async fn next_input<R: AsyncBufRead + Unpin>(session: &mut ConsoleSession, lines: &mut Lines<R>) -> Result<Input> {
    loop {
        let Some(line) = lines.next_line().await? else {
            return Ok(Input::Quit);
        };
        match parse_command(&line) {
            Command::Login(json) => match serde_json::from_str::<LoginWidgetAuth>(json) {
                Ok(auth) => session.handle_login_widget_auth(auth),
                Err(e) => println!("Некорректный JSON авторизации: {}", e),
            },
            Command::Trace => print_trace(session),
            Command::Quit => return Ok(Input::Quit),
            Command::Next => return Ok(Input::Next),
            Command::Text(text) => return Ok(Input::Text(text.to_string())),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Login(&'a str),
    Trace,
    Quit,
    Next,
    Text(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    if let Some(json) = trimmed.strip_prefix("/login ") {
        return Command::Login(json.trim());
    }
    match trimmed {
        "/trace" => Command::Trace,
        "/quit" | "/exit" => Command::Quit,
        "/next" => Command::Next,
        _ => Command::Text(line),
    }
}

fn print_trace(session: &ConsoleSession) {
    if let Some(trace) = session.diagnostic_trace() {
        println!("── trace ({} entries) ──", trace.len());
        println!("{}", trace.render());
    }
}

fn prompt(text: &str) {
    println!("{}", text);
}

/// Wizard errors are already on the status line; only log them here
fn ignore<T>(result: Result<T, diagcore::WizardError>) {
    if let Err(e) = result {
        log::debug!("Wizard event refused: {}", e);
    }
}
