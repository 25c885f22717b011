//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Logging of the active wizard variant at startup

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config::WizardConfig;

/// Initialize logger for both console and file output
///
/// The terminal logger writes to stderr so it never interleaves with a host
/// that renders the wizard on stdout.
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(LevelFilter::Warn, Config::default(), TerminalMode::Stderr, ColorChoice::Auto),
        WriteLogger::new(LevelFilter::Debug, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the wizard variant at application startup
pub fn log_wizard_configuration(config: &WizardConfig, base_url: &str) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🧭 Wizard configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Backend: {}", base_url);
    log::info!("Submit endpoint: {}", config.submit_path);
    log::info!("Require identity: {}", config.require_identity);
    log::info!("Diagnostic trace: {}", config.enable_diagnostic_log);
    log::info!("Post-submit download: {} ({})", config.post_submit_download, config.download_path);
    log::info!("Scenario guard disabled: {}", config.advance_without_scenario_guard);
    log::info!("Success delay: {} ms", config.success_delay.as_millis());
}
