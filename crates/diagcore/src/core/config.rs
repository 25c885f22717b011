use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration for the diagnostics wizard
/// Base URL of the backend serving `/submit` and `/download`
/// Read from DIAG_BASE_URL environment variable
/// Default: http://127.0.0.1:8000
pub static BASE_URL: Lazy<String> =
    Lazy::new(|| env::var("DIAG_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()));

/// Log file path
/// Read from DIAG_LOG_FILE environment variable
/// Default: itdiag.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DIAG_LOG_FILE").unwrap_or_else(|_| "itdiag.log".to_string()));

/// Bot token used to verify initData / Login Widget signatures
/// Read from DIAG_BOT_TOKEN or BOT_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("DIAG_BOT_TOKEN")
        .or_else(|_| env::var("BOT_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Refuse submissions without a Telegram identity
/// Read from DIAG_REQUIRE_IDENTITY environment variable
pub static REQUIRE_IDENTITY: Lazy<bool> = Lazy::new(|| env_flag("DIAG_REQUIRE_IDENTITY"));

/// Keep an in-memory diagnostic trace of wizard events
/// Read from DIAG_DIAGNOSTIC_LOG environment variable
pub static DIAGNOSTIC_LOG: Lazy<bool> = Lazy::new(|| env_flag("DIAG_DIAGNOSTIC_LOG"));

/// Download the checklist asset after a successful submission
/// Read from DIAG_POST_SUBMIT_DOWNLOAD environment variable
pub static POST_SUBMIT_DOWNLOAD: Lazy<bool> = Lazy::new(|| env_flag("DIAG_POST_SUBMIT_DOWNLOAD"));

/// Let "continue" advance to the contact form with no scenario selected
/// Read from DIAG_ADVANCE_WITHOUT_SCENARIO environment variable
pub static ADVANCE_WITHOUT_SCENARIO: Lazy<bool> = Lazy::new(|| env_flag("DIAG_ADVANCE_WITHOUT_SCENARIO"));

/// Delay between server acknowledgement and the success screen (milliseconds)
/// Read from DIAG_SUCCESS_DELAY_MS environment variable
pub static SUCCESS_DELAY_MS: Lazy<u64> = Lazy::new(|| {
    env::var("DIAG_SUCCESS_DELAY_MS")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(timing::SUCCESS_DELAY_MS)
});

/// Parses boolean-ish env values: 1/true/yes/on (case-insensitive)
fn env_flag(name: &str) -> bool {
    env::var(name).map(|v| parse_flag(&v)).unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Backend endpoint paths
pub mod endpoints {
    /// Lead submission endpoint (POST, JSON body)
    pub const SUBMIT: &str = "/submit";

    /// Checklist download endpoint (GET, binary attachment)
    pub const DOWNLOAD: &str = "/download";

    /// Filename used when the server sends no Content-Disposition
    pub const DEFAULT_ASSET_NAME: &str = "checklist.pdf";
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for the submission call (in seconds)
    /// The wizard applies no timeout of its own; this is the transport bound.
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Presentational timing
pub mod timing {
    use super::Duration;

    /// Delay between server acknowledgement and the success screen (milliseconds)
    pub const SUCCESS_DELAY_MS: u64 = 1000;

    /// Upper bound for the success delay (milliseconds)
    pub const MAX_SUCCESS_DELAY_MS: u64 = 2000;

    /// Success delay duration
    pub fn success_delay() -> Duration {
        Duration::from_millis(SUCCESS_DELAY_MS)
    }
}

/// Identity verification configuration
pub mod auth {
    use super::Duration;

    /// Maximum age of initData / Login Widget payloads (24 hours)
    pub const MAX_AUTH_AGE_SECS: u64 = 86_400;

    /// Maximum auth age duration
    pub fn max_age() -> Duration {
        Duration::from_secs(MAX_AUTH_AGE_SECS)
    }
}

/// Variant switches of the wizard
///
/// The observed deployments differ only in these knobs, so one core is
/// configured per deployment instead of maintaining separate copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    /// Refuse to submit when no Telegram identity could be resolved
    pub require_identity: bool,
    /// Keep an append-only diagnostic trace of wizard events
    pub enable_diagnostic_log: bool,
    /// Fetch the checklist asset after a successful submission
    pub post_submit_download: bool,
    /// Let "continue" advance to the contact form with no scenario selected
    pub advance_without_scenario_guard: bool,
    /// Cosmetic delay between server acknowledgement and the success screen
    pub success_delay: Duration,
    /// Relative path of the submission endpoint
    pub submit_path: String,
    /// Relative path of the download endpoint (used when the server supplies none)
    pub download_path: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            require_identity: false,
            enable_diagnostic_log: false,
            post_submit_download: false,
            advance_without_scenario_guard: false,
            success_delay: timing::success_delay(),
            submit_path: endpoints::SUBMIT.to_string(),
            download_path: endpoints::DOWNLOAD.to_string(),
        }
    }
}

impl WizardConfig {
    /// Builds the configuration from `DIAG_*` environment variables
    pub fn from_env() -> Self {
        Self {
            require_identity: *REQUIRE_IDENTITY,
            enable_diagnostic_log: *DIAGNOSTIC_LOG,
            post_submit_download: *POST_SUBMIT_DOWNLOAD,
            advance_without_scenario_guard: *ADVANCE_WITHOUT_SCENARIO,
            ..Self::default()
        }
        .with_success_delay(Duration::from_millis(*SUCCESS_DELAY_MS))
    }

    /// Sets the success delay, clamped to [`timing::MAX_SUCCESS_DELAY_MS`]
    pub fn with_success_delay(mut self, delay: Duration) -> Self {
        self.success_delay = delay.min(Duration::from_millis(timing::MAX_SUCCESS_DELAY_MS));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        for v in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(parse_flag(v), "{v:?} should be on");
        }
        for v in ["", "0", "false", "off", "nope"] {
            assert!(!parse_flag(v), "{v:?} should be off");
        }
    }

    #[test]
    fn test_default_config() {
        let config = WizardConfig::default();
        assert!(!config.require_identity);
        assert!(!config.advance_without_scenario_guard);
        assert_eq!(config.success_delay, Duration::from_millis(1000));
        assert_eq!(config.submit_path, "/submit");
        assert_eq!(config.download_path, "/download");
    }

    #[test]
    fn test_success_delay_is_clamped() {
        let config = WizardConfig::default().with_success_delay(Duration::from_secs(10));
        assert_eq!(config.success_delay, Duration::from_millis(2000));

        let config = WizardConfig::default().with_success_delay(Duration::ZERO);
        assert_eq!(config.success_delay, Duration::ZERO);
    }
}
