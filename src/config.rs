//! Editor configuration.
//!
//! Settings are held in memory and can be exported to or imported from JSON by
//! an embedding application. The editor itself never reads or writes a config
//! file: the overlay document is the only persisted state.

use serde::{Deserialize, Serialize};

use crate::document::DocumentFormat;
use crate::raster::DisplayBounds;
use crate::render::LabelMetrics;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Top-level editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version of the configuration format
    pub version: u32,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Display area the background image is fitted into
    #[serde(default = "default_display_width")]
    pub display_width: u32,
    #[serde(default = "default_display_height")]
    pub display_height: u32,

    /// Pixels kept free around the image when fitting it to the display
    #[serde(default = "default_display_margin")]
    pub display_margin: u32,

    /// Format used by save-as when the chosen extension is not recognized
    #[serde(default)]
    pub default_save_format: DocumentFormat,

    /// Pointer behavior
    #[serde(default)]
    pub interaction: InteractionConfig,

    /// Overlay drawing
    #[serde(default)]
    pub overlay: OverlayConfig,
}

fn default_display_width() -> u32 {
    1920
}

fn default_display_height() -> u32 {
    1080
}

fn default_display_margin() -> u32 {
    100
}

/// Pointer and edit-mode settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// When false the overlay is view-only: no dragging, no edit dialogs
    pub editable: bool,
    /// Largest pointer distance, in pixels, at which a button still counts as hit
    pub hit_tolerance: f64,
    /// Maximum gap between two presses that form a double click
    pub double_click_interval_ms: u64,
    /// Maximum pointer travel between the two presses of a double click
    pub double_click_distance: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            editable: true,
            hit_tolerance: 24.0,
            double_click_interval_ms: 400,
            double_click_distance: 4.0,
        }
    }
}

/// Label size estimate used by hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub label_char_width: f64,
    pub label_height: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        let metrics = LabelMetrics::default();
        Self {
            label_char_width: metrics.char_width,
            label_height: metrics.height,
        }
    }
}

impl OverlayConfig {
    pub fn label_metrics(&self) -> LabelMetrics {
        LabelMetrics {
            char_width: self.label_char_width,
            height: self.label_height,
        }
    }
}

impl EditorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LogLevel::default(),
            display_width: default_display_width(),
            display_height: default_display_height(),
            display_margin: default_display_margin(),
            default_save_format: DocumentFormat::default(),
            interaction: InteractionConfig::default(),
            overlay: OverlayConfig::default(),
        }
    }

    pub fn display_bounds(&self) -> DisplayBounds {
        DisplayBounds::new(self.display_width, self.display_height)
    }

    /// Settings as pretty JSON, for a host that stores them itself.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Settings handed over by an embedding host. Missing fields take their
    /// defaults.
    ///
    /// The binary never calls this: it reads no files and no environment, and
    /// runs on [`EditorConfig::default`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Rejected editor settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse editor settings: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Written by a newer build of the editor
    #[error(
        "Editor settings version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },
}
