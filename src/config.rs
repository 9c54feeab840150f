//! Gallery configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! are the base layer; a user file only needs the keys it overrides.
//!
//! ## Configuration Options
//!
//! ```toml
//! [api]
//! client_id = ""                          # Photo API access key (required for network commands)
//! base_url = "https://api.unsplash.com/"
//! per_page = 20                           # Browse page size (1-30)
//! timeout_secs = 30
//!
//! [layout]
//! columns = 3
//! cell_padding = 6.0                      # Inset on every side of each cell
//! fallback_height = 180.0                 # Item height when no estimator is supplied
//!
//! [grid]
//! chrome_height = 90.0                    # Viewport height not available to rows
//! rows_per_screen = 4.0                   # Item height = (viewport - chrome) / rows
//!
//! [input]
//! active_border = "#0000ff"
//! inactive_border = "#d3d3d3"
//! background = "#ffffff"
//! animation_ms = 300
//! float_offset = 20.0                     # Upward label travel when floated
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::floating_label::{Color, FloatingLabelStyle};
use crate::layout::MasonryConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Photo API connection settings.
    pub api: ApiConfig,
    /// Masonry layout parameters.
    pub layout: LayoutConfig,
    /// Item height estimation for the grid.
    pub grid: GridConfig,
    /// Floating-label input appearance.
    pub input: InputConfig,
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.per_page == 0 || self.api.per_page > 30 {
            return Err(ConfigError::Validation(
                "api.per_page must be 1-30".into(),
            ));
        }
        if self.layout.columns == 0 {
            return Err(ConfigError::Validation(
                "layout.columns must be at least 1".into(),
            ));
        }
        if self.layout.cell_padding < 0.0 {
            return Err(ConfigError::Validation(
                "layout.cell_padding must not be negative".into(),
            ));
        }
        if self.grid.rows_per_screen <= 0.0 {
            return Err(ConfigError::Validation(
                "grid.rows_per_screen must be positive".into(),
            ));
        }
        for (key, value) in [
            ("input.active_border", &self.input.active_border),
            ("input.inactive_border", &self.input.inactive_border),
            ("input.background", &self.input.background),
        ] {
            if Color::from_hex(value).is_none() {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a #rrggbb color, got {value:?}"
                )));
            }
        }
        Ok(())
    }

    /// Error unless a client id has been supplied by file or flag.
    pub fn require_client_id(&self) -> Result<&str, ConfigError> {
        if self.api.client_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api.client_id is not set (use config.toml or --client-id)".into(),
            ));
        }
        Ok(&self.api.client_id)
    }
}

/// Photo API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Access key sent as the `client_id` query parameter.
    pub client_id: String,
    /// API root; endpoint paths are resolved relative to it.
    pub base_url: String,
    /// Number of photos per browse page.
    pub per_page: u32,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            base_url: "https://api.unsplash.com/".to_string(),
            per_page: 20,
            timeout_secs: 30,
        }
    }
}

/// Masonry layout parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub columns: usize,
    pub cell_padding: f64,
    pub fallback_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let masonry = MasonryConfig::default();
        Self {
            columns: masonry.columns,
            cell_padding: masonry.cell_padding,
            fallback_height: masonry.fallback_height,
        }
    }
}

impl LayoutConfig {
    pub fn to_masonry(&self) -> MasonryConfig {
        MasonryConfig {
            columns: self.columns,
            cell_padding: self.cell_padding,
            fallback_height: self.fallback_height,
        }
    }
}

/// Grid height estimation: `(viewport_height - chrome_height) / rows_per_screen`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub chrome_height: f64,
    pub rows_per_screen: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            chrome_height: 90.0,
            rows_per_screen: 4.0,
        }
    }
}

/// Floating-label input appearance.
///
/// The CLI has no text field; front ends embedding the library build one
/// with [`FloatingLabelInput::from_config`](crate::floating_label::FloatingLabelInput::from_config).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub active_border: String,
    pub inactive_border: String,
    pub background: String,
    pub animation_ms: u32,
    pub float_offset: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            active_border: "#0000ff".to_string(),
            inactive_border: "#d3d3d3".to_string(),
            background: "#ffffff".to_string(),
            animation_ms: 300,
            float_offset: 20.0,
        }
    }
}

impl InputConfig {
    /// Resolve into a widget style. Unparseable colors fall back to the
    /// widget defaults; [`GalleryConfig::validate`] rejects them earlier.
    pub fn to_style(&self) -> FloatingLabelStyle {
        let defaults = FloatingLabelStyle::default();
        FloatingLabelStyle {
            active_border: Color::from_hex(&self.active_border).unwrap_or(defaults.active_border),
            inactive_border: Color::from_hex(&self.inactive_border)
                .unwrap_or(defaults.inactive_border),
            background: Color::from_hex(&self.background).unwrap_or(defaults.background),
            animation_ms: self.animation_ms,
            float_offset: self.float_offset,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file.
///
/// A missing file yields the stock defaults; a malformed one is an error.
pub fn load_config(path: &Path) -> Result<GalleryConfig, ConfigError> {
    if !path.exists() {
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(overlay))
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Masonry Gallery Configuration
# =============================
# All settings are optional except api.client_id for network commands.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Photo API
# ---------------------------------------------------------------------------
[api]
# Access key sent with every request as the client_id query parameter.
client_id = ""
# API root. Endpoints "photos" and "search/photos" are resolved under it.
base_url = "https://api.unsplash.com/"
# Photos per browse page (1-30).
per_page = 20
# Per-request timeout in seconds.
timeout_secs = 30

# ---------------------------------------------------------------------------
# Masonry layout
# ---------------------------------------------------------------------------
[layout]
# Items are dealt into columns in order: 0, 1, 2, 0, 1, 2, ...
columns = 3
# Inset applied on every side of each cell.
cell_padding = 6.0
# Item height used when no height estimator is supplied.
fallback_height = 180.0

# ---------------------------------------------------------------------------
# Grid height estimation
# ---------------------------------------------------------------------------
[grid]
# Each item is (viewport height - chrome_height) / rows_per_screen tall.
chrome_height = 90.0
rows_per_screen = 4.0

# ---------------------------------------------------------------------------
# Floating-label input
# ---------------------------------------------------------------------------
[input]
active_border = "#0000ff"
inactive_border = "#d3d3d3"
background = "#ffffff"
# Label float/rest animation length in milliseconds.
animation_ms = 300
# How far the label travels upward when floated.
float_offset = 20.0
"##
}
