//! Application configuration
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/finview/config.toml)
//! 3. Built-in defaults (lowest priority)

use crate::session::{PaymentMode, PaymentTiming};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

mod serialization;

#[cfg(test)]
mod tests;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Theme name: "Dark", "Light", "Monokai", "Nord"
    pub theme: String,

    /// Demo feed: scripted decode events instead of a real feed
    pub demo_feed: bool,

    /// File to tail for decode payloads (one per line) when not in demo mode
    pub feed_path: Option<PathBuf>,

    /// Scanner capability settings
    pub scanner: ScannerConfig,

    /// Payment flow settings
    pub payment: PaymentConfig,

    /// Signed-in account shown by the stub auth provider
    pub account: AccountConfig,

    /// Payment record storage
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "Dark".to_string(),
            demo_feed: true,
            feed_path: None,
            scanner: ScannerConfig::default(),
            payment: PaymentConfig::default(),
            account: AccountConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// What the permission stub should answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionSetting {
    #[default]
    Grant,
    Deny,
}

impl PermissionSetting {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionSetting::Grant => "grant",
            PermissionSetting::Deny => "deny",
        }
    }
}

/// Scanner capability settings
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Permission stub decision
    pub permission: PermissionSetting,
    /// Simulated permission-dialog delay before the decision lands
    pub prompt_delay_ms: u64,
    /// Delay between scripted demo decodes
    pub demo_interval_ms: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            permission: PermissionSetting::Grant,
            prompt_delay_ms: 600,
            demo_interval_ms: 6000,
        }
    }
}

impl ScannerConfig {
    pub fn prompt_delay(&self) -> Duration {
        Duration::from_millis(self.prompt_delay_ms)
    }

    pub fn demo_interval(&self) -> Duration {
        Duration::from_millis(self.demo_interval_ms)
    }

    fn from_file(file: Option<FileScanner>) -> Self {
        let defaults = Self::default();
        let Some(file) = file else {
            return defaults;
        };
        Self {
            permission: file.permission.unwrap_or(defaults.permission),
            prompt_delay_ms: file.prompt_delay_ms.unwrap_or(defaults.prompt_delay_ms),
            demo_interval_ms: file.demo_interval_ms.unwrap_or(defaults.demo_interval_ms),
        }
    }
}

/// Payment flow settings
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// "simulate" (in-app fake payment) or "handoff" (external URI opener)
    pub mode: PaymentMode,
    /// Simulated processing delay
    pub pending_delay_ms: u64,
    /// How long the success state stays on screen
    pub success_display_ms: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        // 2s + 2s matches the original product behavior
        Self {
            mode: PaymentMode::Simulate,
            pending_delay_ms: 2000,
            success_display_ms: 2000,
        }
    }
}

impl PaymentConfig {
    pub fn timing(&self) -> PaymentTiming {
        PaymentTiming {
            pending_delay: Duration::from_millis(self.pending_delay_ms),
            success_display: Duration::from_millis(self.success_display_ms),
        }
    }

    fn from_file(file: Option<FilePayment>) -> Self {
        let defaults = Self::default();
        let Some(file) = file else {
            return defaults;
        };
        Self {
            mode: file
                .mode
                .as_deref()
                .and_then(parse_payment_mode)
                .unwrap_or(defaults.mode),
            pending_delay_ms: file.pending_delay_ms.unwrap_or(defaults.pending_delay_ms),
            success_display_ms: file
                .success_display_ms
                .unwrap_or(defaults.success_display_ms),
        }
    }
}

pub(crate) fn parse_payment_mode(value: &str) -> Option<PaymentMode> {
    match value {
        "simulate" => Some(PaymentMode::Simulate),
        "handoff" => Some(PaymentMode::Handoff),
        _ => None,
    }
}

/// Account identity used by the stub auth provider
#[derive(Debug, Clone)]
pub struct AccountConfig {
    pub name: String,
    pub email: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            name: "Pratyush Mohanty".to_string(),
            email: "pratyush@example.com".to_string(),
        }
    }
}

impl AccountConfig {
    fn from_file(file: Option<FileAccount>) -> Self {
        let defaults = Self::default();
        let Some(file) = file else {
            return defaults;
        };
        Self {
            name: file.name.unwrap_or(defaults.name),
            email: file.email.unwrap_or(defaults.email),
        }
    }
}

/// Payment record storage settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub enabled: bool,
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("./payments"),
        }
    }
}

impl StorageConfig {
    fn from_file(file: Option<FileStorage>) -> Self {
        let defaults = Self::default();
        let Some(file) = file else {
            return defaults;
        };
        Self {
            enabled: file.enabled.unwrap_or(defaults.enabled),
            dir: file.dir.map(PathBuf::from).unwrap_or(defaults.dir),
        }
    }
}

/// Log file rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogRotation::Hourly => "hourly",
            LogRotation::Daily => "daily",
            LogRotation::Never => "never",
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level for the finview target ("info", "debug", ...)
    pub level: String,
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_prefix: String,
    pub file_rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_prefix: "finview".to_string(),
            file_rotation: LogRotation::default(),
        }
    }
}

impl LoggingConfig {
    fn from_file(file: Option<FileLogging>) -> Self {
        let defaults = Self::default();
        let Some(file) = file else {
            return defaults;
        };
        Self {
            level: file.level.unwrap_or(defaults.level),
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file.file_dir.map(PathBuf::from).unwrap_or(defaults.file_dir),
            file_prefix: file.file_prefix.unwrap_or(defaults.file_prefix),
            file_rotation: file.file_rotation.unwrap_or(defaults.file_rotation),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure (everything optional; defaults fill the gaps)
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub theme: Option<String>,
    pub demo_feed: Option<bool>,
    pub feed_path: Option<String>,

    /// Optional [scanner] section
    pub scanner: Option<FileScanner>,

    /// Optional [payment] section
    pub payment: Option<FilePayment>,

    /// Optional [account] section
    pub account: Option<FileAccount>,

    /// Optional [storage] section
    pub storage: Option<FileStorage>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileScanner {
    pub permission: Option<PermissionSetting>,
    pub prompt_delay_ms: Option<u64>,
    pub demo_interval_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct FilePayment {
    pub mode: Option<String>,
    pub pending_delay_ms: Option<u64>,
    pub success_display_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileAccount {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileStorage {
    pub enabled: Option<bool>,
    pub dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_prefix: Option<String>,
    pub file_rotation: Option<LogRotation>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/finview/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("finview").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        // Config::default().to_toml() is the single source of the template
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A broken config fails fast with a clear error instead of silently
    /// falling back to defaults while the user debugs the wrong thing.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\nCONFIG ERROR - failed to parse {}\n", path.display());
                    eprintln!("  {}\n", e);
                    eprintln!("  To reset, delete the file and restart finview.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\nCONFIG ERROR - cannot read {}: {}\n", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        let file = Self::load_file_config();
        let defaults = Self::default();

        // Theme: env > file > default
        let theme = std::env::var("FINVIEW_THEME")
            .ok()
            .or(file.theme)
            .unwrap_or(defaults.theme);

        // Demo feed: env (runtime flag) > file > default
        let demo_feed = std::env::var("FINVIEW_DEMO")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .ok()
            .or(file.demo_feed)
            .unwrap_or(defaults.demo_feed);

        // Feed path: env > file
        let feed_path = std::env::var("FINVIEW_FEED")
            .ok()
            .or(file.feed_path)
            .map(PathBuf::from);

        let scanner = ScannerConfig::from_file(file.scanner);

        // Payment mode env override on top of the file section
        let mut payment = PaymentConfig::from_file(file.payment);
        if let Some(mode) = std::env::var("FINVIEW_PAYMENT_MODE")
            .ok()
            .as_deref()
            .and_then(parse_payment_mode)
        {
            payment.mode = mode;
        }

        let account = AccountConfig::from_file(file.account);
        let storage = StorageConfig::from_file(file.storage);
        let logging = LoggingConfig::from_file(file.logging);

        Self {
            theme,
            demo_feed,
            feed_path,
            scanner,
            payment,
            account,
            storage,
            logging,
        }
    }
}
