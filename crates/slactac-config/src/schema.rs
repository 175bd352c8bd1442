//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(default)]
    pub detector: DetectorConfig,

    #[serde(default)]
    pub picker: PickerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Host page markup contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Marker class of a label element.
    #[serde(default = "default_label_class")]
    pub label_class: String,

    /// Marker class of the sidebar list. Absent containers fall back to the
    /// whole document.
    #[serde(default = "default_sidebar_class")]
    pub sidebar_class: String,

    /// Node data key holding a label's origin tag.
    #[serde(default = "default_origin_key")]
    pub origin_key: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            label_class: default_label_class(),
            sidebar_class: default_sidebar_class(),
            origin_key: default_origin_key(),
        }
    }
}

fn default_label_class() -> String {
    "p-channel_sidebar__name".to_string()
}

fn default_sidebar_class() -> String {
    "p-channel_sidebar__list".to_string()
}

fn default_origin_key() -> String {
    "slactacOrigin".to_string()
}

/// Change detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Quiet window before a reconciliation fires.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl DetectorConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

/// Picker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Hosts the picker may activate on. A page matches a host exactly or
    /// as a subdomain.
    #[serde(default = "default_target_hosts")]
    pub target_hosts: Vec<String>,

    /// Candidates narrower or shorter than this are ignored.
    #[serde(default = "default_min_size_px")]
    pub min_size_px: f64,

    /// Candidates wider or taller than this share of the viewport are ignored.
    #[serde(default = "default_max_viewport_fraction")]
    pub max_viewport_fraction: f64,

    /// Cursor shown while picking.
    #[serde(default = "default_cursor")]
    pub cursor: String,
}

impl PickerConfig {
    /// Whether `hostname` is one of the target hosts or a subdomain of one.
    pub fn matches_host(&self, hostname: &str) -> bool {
        let hostname = hostname.trim().trim_end_matches('.').to_ascii_lowercase();
        if hostname.is_empty() {
            return false;
        }
        self.target_hosts.iter().any(|host| {
            let host = host.trim().to_ascii_lowercase();
            !host.is_empty()
                && (hostname == host
                    || hostname
                        .strip_suffix(host.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.')))
        })
    }
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            target_hosts: default_target_hosts(),
            min_size_px: default_min_size_px(),
            max_viewport_fraction: default_max_viewport_fraction(),
            cursor: default_cursor(),
        }
    }
}

fn default_target_hosts() -> Vec<String> {
    vec!["app.slack.com".to_string()]
}

fn default_min_size_px() -> f64 {
    4.0
}

fn default_max_viewport_fraction() -> f64 {
    0.8
}

fn default_cursor() -> String {
    "crosshair".to_string()
}

/// Persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the file-backed tiers.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Sync-tier key of the override dictionary.
    #[serde(default = "default_overrides_key")]
    pub overrides_key: String,

    /// Local-tier key of the last picked channel name.
    #[serde(default = "default_last_picked_key")]
    pub last_picked_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            overrides_key: default_overrides_key(),
            last_picked_key: default_last_picked_key(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".slactac"))
        .unwrap_or_else(|| PathBuf::from(".slactac"))
}

fn default_overrides_key() -> String {
    "chatRoomOverrides".to_string()
}

fn default_last_picked_key() -> String {
    "lastPickedChannel".to_string()
}

/// Message authentication and content filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// The only sender identity whose messages are processed.
    #[serde(default = "default_extension_id")]
    pub extension_id: String,

    /// Extra case-insensitive patterns that disqualify an override value.
    #[serde(default)]
    pub extra_denylist: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            extension_id: default_extension_id(),
            extra_denylist: Vec::new(),
        }
    }
}

fn default_extension_id() -> String {
    "slactac".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
