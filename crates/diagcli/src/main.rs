use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use strum::IntoEnumIterator;

use diagcore::config::{self, auth};
use diagcore::core::init_logger;
use diagcore::wizard::telegram_auth::{verify_init_data, verify_login_widget};
use diagcore::wizard::{LoginWidgetAuth, ScenarioId};

mod cli;
mod console;
mod run;

use cli::{Cli, Commands, RunArgs};

/// Entry point of the terminal host
///
/// Parses CLI arguments and dispatches to the subcommand; `run` is the default.
///
/// # Errors
/// Returns an error if initialization fails or a verification does not pass.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env before any config is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            log::info!("Starting interactive wizard");
            run::run(args).await
        }
        Commands::Scenarios => {
            print_scenarios();
            Ok(())
        }
        Commands::VerifyInitData { init_data, bot_token } => {
            let token = resolve_token(bot_token)?;
            let user_id = verify_init_data(&init_data, &token, auth::max_age())?;
            println!("✅ initData valid, user id: {}", user_id);
            Ok(())
        }
        Commands::VerifyLogin { auth_json, bot_token } => {
            let token = resolve_token(bot_token)?;
            let widget_auth: LoginWidgetAuth = serde_json::from_str(&auth_json).context("Invalid --auth-json")?;
            let user_id = verify_login_widget(&widget_auth, &token, auth::max_age())?;
            println!("✅ Login Widget auth valid, user id: {}", user_id);
            Ok(())
        }
    }
}

fn resolve_token(flag: Option<String>) -> Result<String> {
    let token = flag.unwrap_or_else(|| config::BOT_TOKEN.clone());
    if token.trim().is_empty() {
        bail!("Bot token is not set: pass --bot-token or set DIAG_BOT_TOKEN");
    }
    Ok(token)
}

fn print_scenarios() {
    for id in ScenarioId::iter() {
        let insight = id.insight();
        println!("{}. {}", id.number(), id.title());
        println!("{}", console::html_to_text(insight.display_text));
        println!("   → {}", insight.call_to_action_label);
        println!();
    }
}
