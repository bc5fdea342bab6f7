// File: src/config.rs
// Purpose: Assistant configuration parsed from health-form.toml

use anyhow::{Context, Result};
use health_form_validation::NumberLocale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Assistant configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AssistantConfig {
    #[serde(default)]
    pub form: FormConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub format: FormatConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Where the form and its derived inputs live in the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Element id of the prediction form
    #[serde(default = "default_form_id")]
    pub form_id: String,

    #[serde(default = "default_weight_field")]
    pub weight_field: String,

    #[serde(default = "default_height_field")]
    pub height_field: String,

    #[serde(default = "default_bmi_field")]
    pub bmi_field: String,
}

/// Delays of every deferred action, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,

    #[serde(default = "default_banner_ms")]
    pub banner_ms: u64,

    #[serde(default = "default_banner_fade_ms")]
    pub banner_fade_ms: u64,

    /// Delay before the result card is scrolled into view after submit
    #[serde(default = "default_scroll_delay_ms")]
    pub scroll_delay_ms: u64,

    /// Busy indicator lifetime, counted from the scroll
    #[serde(default = "default_busy_restore_ms")]
    pub busy_restore_ms: u64,

    #[serde(default = "default_toast_enter_ms")]
    pub toast_enter_ms: u64,

    #[serde(default = "default_toast_visible_ms")]
    pub toast_visible_ms: u64,

    #[serde(default = "default_toast_exit_ms")]
    pub toast_exit_ms: u64,

    #[serde(default = "default_print_delay_ms")]
    pub print_delay_ms: u64,
}

/// Numeric display formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub locale: NumberLocale,
}

/// Export file naming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

// Default values
fn default_form_id() -> String {
    "predictionForm".to_string()
}

fn default_weight_field() -> String {
    "weight".to_string()
}

fn default_height_field() -> String {
    "height".to_string()
}

fn default_bmi_field() -> String {
    "bmi".to_string()
}

fn default_highlight_ms() -> u64 {
    5000
}

fn default_banner_ms() -> u64 {
    10_000
}

fn default_banner_fade_ms() -> u64 {
    500
}

fn default_scroll_delay_ms() -> u64 {
    100
}

fn default_busy_restore_ms() -> u64 {
    2000
}

fn default_toast_enter_ms() -> u64 {
    10
}

fn default_toast_visible_ms() -> u64 {
    3000
}

fn default_toast_exit_ms() -> u64 {
    300
}

fn default_print_delay_ms() -> u64 {
    500
}

fn default_file_prefix() -> String {
    "data-prediksi-diabetes".to_string()
}

fn default_true() -> bool {
    true
}

// Default implementations
impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_id: default_form_id(),
            weight_field: default_weight_field(),
            height_field: default_height_field(),
            bmi_field: default_bmi_field(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            highlight_ms: default_highlight_ms(),
            banner_ms: default_banner_ms(),
            banner_fade_ms: default_banner_fade_ms(),
            scroll_delay_ms: default_scroll_delay_ms(),
            busy_restore_ms: default_busy_restore_ms(),
            toast_enter_ms: default_toast_enter_ms(),
            toast_visible_ms: default_toast_visible_ms(),
            toast_exit_ms: default_toast_exit_ms(),
            print_delay_ms: default_print_delay_ms(),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            locale: NumberLocale::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
        }
    }
}

impl TimingConfig {
    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    pub fn banner(&self) -> Duration {
        Duration::from_millis(self.banner_ms)
    }

    pub fn banner_fade(&self) -> Duration {
        Duration::from_millis(self.banner_fade_ms)
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }

    pub fn busy_restore(&self) -> Duration {
        Duration::from_millis(self.busy_restore_ms)
    }

    pub fn toast_enter(&self) -> Duration {
        Duration::from_millis(self.toast_enter_ms)
    }

    pub fn toast_visible(&self) -> Duration {
        Duration::from_millis(self.toast_visible_ms)
    }

    pub fn toast_exit(&self) -> Duration {
        Duration::from_millis(self.toast_exit_ms)
    }

    pub fn print_delay(&self) -> Duration {
        Duration::from_millis(self.print_delay_ms)
    }
}

impl AssistantConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./health-form.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("health-form.toml")
    }

    /// Parse TOML text; blank text yields the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = toml::from_str(content)?;
        Ok(config)
    }
}
