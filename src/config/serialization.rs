//! Config serialization to TOML
//!
//! Single source of truth for the config file format. The generated
//! template carries inline comments so users can discover options without
//! reading the docs.

use super::Config;

impl Config {
    /// Serialize the full config as a commented TOML template
    pub fn to_toml(&self) -> String {
        let feed_path = match &self.feed_path {
            Some(path) => format!("feed_path = \"{}\"", path.display()),
            None => "# feed_path = \"/tmp/finview-feed.txt\"   # tail this file for payloads"
                .to_string(),
        };

        format!(
            r#"# finview configuration
# Precedence: environment variables > this file > built-in defaults
# Env overrides: FINVIEW_THEME, FINVIEW_DEMO, FINVIEW_FEED, FINVIEW_PAYMENT_MODE

# Theme: "Dark", "Light", "Monokai", "Nord"
theme = "{theme}"

# Scripted demo decode feed (no scanner hardware needed)
demo_feed = {demo_feed}
{feed_path}

[scanner]
# Permission stub decision: "grant" or "deny"
permission = "{permission}"
# Simulated permission-dialog delay
prompt_delay_ms = {prompt_delay_ms}
# Delay between scripted demo decodes
demo_interval_ms = {demo_interval_ms}

[payment]
# "simulate" = in-app fake payment, "handoff" = open payload as a URI
mode = "{mode}"
pending_delay_ms = {pending_delay_ms}
success_display_ms = {success_display_ms}

[account]
name = "{account_name}"
email = "{account_email}"

[storage]
# Append completed payment attempts as JSON Lines
enabled = {storage_enabled}
dir = "{storage_dir}"

[logging]
# Level for the finview target: "error", "warn", "info", "debug", "trace"
level = "{log_level}"
file_enabled = {file_enabled}
file_dir = "{file_dir}"
file_prefix = "{file_prefix}"
# Rotation: "hourly", "daily", "never"
file_rotation = "{file_rotation}"
"#,
            theme = self.theme,
            demo_feed = self.demo_feed,
            feed_path = feed_path,
            permission = self.scanner.permission.as_str(),
            prompt_delay_ms = self.scanner.prompt_delay_ms,
            demo_interval_ms = self.scanner.demo_interval_ms,
            mode = self.payment.mode.name(),
            pending_delay_ms = self.payment.pending_delay_ms,
            success_display_ms = self.payment.success_display_ms,
            account_name = self.account.name,
            account_email = self.account.email,
            storage_enabled = self.storage.enabled,
            storage_dir = self.storage.dir.display(),
            log_level = self.logging.level,
            file_enabled = self.logging.file_enabled,
            file_dir = self.logging.file_dir.display(),
            file_prefix = self.logging.file_prefix,
            file_rotation = self.logging.file_rotation.as_str(),
        )
    }
}
