//! Configuration management.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Longest accepted poll interval, one week.
const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
}

/// CoWIN API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server root, without trailing slash (default: production CDN)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// User-Agent sent with every request. The CDN rejects requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://cdn-api.co-vin.in/api".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows; U; Windows NT 5.1; en-US; rv:1.9.0.7) Gecko/2009021910 Firefox/3.0.7"
        .to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// What to watch and how often.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// District to search (takes precedence over pincode)
    #[serde(default)]
    pub district_id: Option<u32>,
    /// Six digit postal code to search
    #[serde(default)]
    pub pincode: Option<u32>,
    /// Age of the person booking; sessions with a higher age limit are skipped
    #[serde(default = "default_min_age_limit")]
    pub min_age_limit: u32,
    /// Only accept this vaccine (case-insensitive)
    #[serde(default)]
    pub vaccine: Option<String>,
    /// Minutes to sleep between polls
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    /// Exit after the first poll with matches
    #[serde(default)]
    pub stop_if_found: bool,
    /// Raise a desktop notification on matches
    #[serde(default = "default_notify")]
    pub notify: bool,
    /// Request an OTP for `mobile` on matches
    #[serde(default)]
    pub request_otp: bool,
    /// Ten digit mobile number registered with CoWIN
    #[serde(default)]
    pub mobile: Option<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            district_id: None,
            pincode: None,
            min_age_limit: default_min_age_limit(),
            vaccine: None,
            interval_minutes: default_interval_minutes(),
            stop_if_found: false,
            notify: default_notify(),
            request_otp: false,
            mobile: None,
        }
    }
}

fn default_min_age_limit() -> u32 {
    18
}

fn default_interval_minutes() -> u64 {
    1
}

fn default_notify() -> bool {
    true
}

impl WatchConfig {
    /// Sleep between two polls.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }
}

/// Desktop notification text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_message")]
    pub message: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            message: default_message(),
        }
    }
}

fn default_title() -> String {
    "COWIN Alert".to_string()
}

fn default_message() -> String {
    "COWIN appointments available".to_string()
}

impl Config {
    /// Load configuration from default location.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if config_path.exists() {
            Self::from_file(&config_path.to_string_lossy())
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &str) -> Result<Self> {
        let expanded = expand_path(path);
        let content = std::fs::read_to_string(&expanded)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("cowin-watch")
            .join("config.toml")
    }

    /// Check the values a watch depends on.
    pub fn validate(&self) -> Result<()> {
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be greater than zero");
        }
        if self.watch.interval_minutes == 0 {
            bail!("watch.interval_minutes must be greater than zero");
        }
        if self.watch.interval_minutes > MAX_INTERVAL_MINUTES {
            bail!(
                "watch.interval_minutes must be at most {} (one week)",
                MAX_INTERVAL_MINUTES
            );
        }
        if let Some(pincode) = self.watch.pincode {
            if !(100_000..=999_999).contains(&pincode) {
                bail!("pincode {} is not a six digit postal code", pincode);
            }
        }
        if let Some(mobile) = &self.watch.mobile {
            if !is_valid_mobile(mobile) {
                bail!("mobile number '{}' must be ten digits", mobile);
            }
        }
        if self.watch.request_otp && self.watch.mobile.is_none() {
            bail!("request_otp is set but no mobile number is configured");
        }
        Ok(())
    }
}

/// True for a bare ten digit number.
pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile.len() == 10 && mobile.chars().all(|c| c.is_ascii_digit())
}

/// Expand ~ to home directory.
fn expand_path(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.api.base_url, "https://cdn-api.co-vin.in/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.watch.min_age_limit, 18);
        assert_eq!(config.watch.interval(), Duration::from_secs(60));
        assert!(config.watch.notify);
        assert!(!config.watch.stop_if_found);
        assert_eq!(config.notification.title, "COWIN Alert");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [watch]
            district_id = 395
            interval_minutes = 5
            vaccine = "COVISHIELD"
            "#,
        )
        .unwrap();
        assert_eq!(config.watch.district_id, Some(395));
        assert_eq!(config.watch.interval(), Duration::from_secs(300));
        assert_eq!(config.watch.vaccine.as_deref(), Some("COVISHIELD"));
        assert_eq!(config.watch.min_age_limit, 18);
        assert!(config.watch.notify);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.watch.interval_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_interval_is_rejected_without_overflow() {
        let config = Config::from_toml(
            r#"
            [watch]
            district_id = 395
            interval_minutes = 9223372036854775807
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
        assert_eq!(config.watch.interval(), Duration::from_secs(u64::MAX));

        let mut config = Config::default();
        config.watch.interval_minutes = MAX_INTERVAL_MINUTES;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_pincode_and_mobile() {
        let mut config = Config::default();
        config.watch.pincode = Some(400067);
        config.watch.mobile = Some("9876543210".to_string());
        config.watch.request_otp = true;
        assert!(config.validate().is_ok());

        config.watch.pincode = Some(4000);
        assert!(config.validate().is_err());

        config.watch.pincode = Some(400067);
        config.watch.mobile = Some("98765-43210".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_otp_needs_mobile() {
        let mut config = Config::default();
        config.watch.request_otp = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expand_path_leaves_absolute_paths() {
        assert_eq!(expand_path("/etc/cowin.toml"), "/etc/cowin.toml");
    }
}
