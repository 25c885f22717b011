use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "itdiag")]
#[command(author, version, about = "Terminal host for the IT-risk diagnostics wizard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk through the wizard interactively (default)
    Run(RunArgs),

    /// Print the scenario catalogue
    Scenarios,

    /// Verify a Mini App initData string and print the user id
    VerifyInitData {
        /// Raw initData query string
        #[arg(long)]
        init_data: String,

        /// Bot token (defaults to DIAG_BOT_TOKEN / BOT_TOKEN)
        #[arg(long)]
        bot_token: Option<String>,
    },

    /// Verify a Login Widget auth object (JSON) and print the user id
    VerifyLogin {
        /// Auth object as passed to the widget's onauth callback
        #[arg(long)]
        auth_json: String,

        /// Bot token (defaults to DIAG_BOT_TOKEN / BOT_TOKEN)
        #[arg(long)]
        bot_token: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Backend base URL (defaults to DIAG_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// initData as the Mini-App runtime would provide it
    #[arg(long)]
    pub init_data: Option<String>,

    /// Login Widget auth object (JSON) delivered right after start
    #[arg(long)]
    pub login_json: Option<String>,

    /// Refuse to submit without a Telegram identity
    #[arg(long)]
    pub require_identity: bool,

    /// Keep a diagnostic trace (print it with /trace)
    #[arg(long)]
    pub diagnostic_log: bool,

    /// Download the checklist after a successful submission
    #[arg(long)]
    pub download: bool,

    /// Allow continuing to the contact form without a scenario
    #[arg(long)]
    pub no_scenario_guard: bool,

    /// Where downloaded files are saved
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// Delay before the success screen, in milliseconds (max 2000)
    #[arg(long)]
    pub success_delay_ms: Option<u64>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
