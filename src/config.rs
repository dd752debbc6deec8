//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content directory next to the JSON documents and is optional: stock
//! defaults are used for anything it does not set.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! assets_dir = "images"     # Directory (inside content/) copied to the site
//!
//! [theme]
//! default = "system"        # "system", "light" or "dark"
//!
//! [layout]
//! max_tech_stack = 4        # Tech badges on a project card before "+N"
//! max_highlights = 3        # Highlights listed on a card
//!
//! [scroll]
//! debounce_ms = 50          # Quiet period before re-deriving the active section
//! edge_margin = 100.0       # Pixels a section must intrude into the viewport
//!
//! [preview]
//! close_delay_ms = 300      # Exit animation before the overlay is hidden
//!
//! [images]
//! placeholder_base = "https://placehold.co"
//!
//! [colors.light]
//! background = "#ffffff"
//! surface = "#f8fafc"
//! text = "#0f172a"
//! text_muted = "#64748b"
//! border = "#e2e8f0"
//! accent = "#3b82f6"
//! accent_hover = "#2563eb"
//!
//! [colors.dark]
//! background = "#0b1120"
//! surface = "#111827"
//! text = "#e5e7eb"
//! text_muted = "#94a3b8"
//! border = "#1f2937"
//! accent = "#60a5fa"
//! accent_hover = "#93c5fd"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [colors.light]
//! accent = "#16a34a"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::theme::Theme;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Asset directory inside the content root, copied verbatim to the output.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    pub colors: ColorConfig,
    pub theme: ThemeConfig,
    pub layout: LayoutConfig,
    pub scroll: ScrollConfig,
    pub preview: PreviewConfig,
    pub images: ImagesConfig,
}

fn default_assets_dir() -> String {
    "images".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            colors: ColorConfig::default(),
            theme: ThemeConfig::default(),
            layout: LayoutConfig::default(),
            scroll: ScrollConfig::default(),
            preview: PreviewConfig::default(),
            images: ImagesConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.max_tech_stack == 0 {
            return Err(ConfigError::Validation(
                "layout.max_tech_stack must be at least 1".into(),
            ));
        }
        if self.layout.max_highlights == 0 {
            return Err(ConfigError::Validation(
                "layout.max_highlights must be at least 1".into(),
            ));
        }
        if !self.scroll.edge_margin.is_finite() || self.scroll.edge_margin < 0.0 {
            return Err(ConfigError::Validation(
                "scroll.edge_margin must be a non-negative number".into(),
            ));
        }
        if !self.images.placeholder_base.starts_with("http://")
            && !self.images.placeholder_base.starts_with("https://")
        {
            return Err(ConfigError::Validation(
                "images.placeholder_base must be an http(s) URL".into(),
            ));
        }
        if self.assets_dir.trim().is_empty() || Path::new(&self.assets_dir).is_absolute() {
            return Err(ConfigError::Validation(
                "assets_dir must be a relative path".into(),
            ));
        }
        Ok(())
    }
}

/// Which theme a first-time visitor sees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Follow `prefers-color-scheme`.
    #[default]
    System,
    Light,
    Dark,
}

impl ThemePreference {
    /// Forced theme, or `None` to follow the system.
    pub fn forced(self) -> Option<Theme> {
        match self {
            ThemePreference::System => None,
            ThemePreference::Light => Some(Theme::Light),
            ThemePreference::Dark => Some(Theme::Dark),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub default: ThemePreference,
}

/// Card truncation limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub max_tech_stack: usize,
    pub max_highlights: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_tech_stack: 4,
            max_highlights: 3,
        }
    }
}

/// Active-section tracking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    pub debounce_ms: u64,
    pub edge_margin: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            debounce_ms: crate::sections::DEFAULT_DEBOUNCE.as_millis() as u64,
            edge_margin: crate::sections::DEFAULT_EDGE_MARGIN,
        }
    }
}

impl ScrollConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub close_delay_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: crate::preview::DEFAULT_CLOSE_DELAY.as_millis() as u64,
        }
    }
}

impl PreviewConfig {
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

/// Placeholder image service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Base URL; placeholders are `{base}/{w}x{h}?text={label}`.
    pub placeholder_base: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            placeholder_base: "https://placehold.co".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    /// Card and overlay panels.
    pub surface: String,
    pub text: String,
    /// Secondary text: dates, captions, metadata labels.
    pub text_muted: String,
    pub border: String,
    /// Links, buttons, active navigation item.
    pub accent: String,
    pub accent_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            surface: "#f8fafc".to_string(),
            text: "#0f172a".to_string(),
            text_muted: "#64748b".to_string(),
            border: "#e2e8f0".to_string(),
            accent: "#3b82f6".to_string(),
            accent_hover: "#2563eb".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0b1120".to_string(),
            surface: "#111827".to_string(),
            text: "#e5e7eb".to_string(),
            text_muted: "#94a3b8".to_string(),
            border: "#1f2937".to_string(),
            accent: "#60a5fa".to_string(),
            accent_hover: "#93c5fd".to_string(),
        }
    }

    fn css_vars(&self, indent: &str) -> String {
        [
            ("--color-bg", &self.background),
            ("--color-surface", &self.surface),
            ("--color-text", &self.text),
            ("--color-text-muted", &self.text_muted),
            ("--color-border", &self.border),
            ("--color-accent", &self.accent),
            ("--color-accent-hover", &self.accent_hover),
        ]
        .iter()
        .map(|(name, value)| format!("{indent}{name}: {value};"))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio configuration
# ===================
# Place this file at content/config.toml. All settings are optional; remove
# any you don't need. Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory inside content/ that is copied to the site as-is.
assets_dir = "images"

# ---------------------------------------------------------------------------
# Theme
# ---------------------------------------------------------------------------
[theme]
# What a first-time visitor sees: "system" follows prefers-color-scheme.
# A visitor's own choice (theme toggle) is remembered and always wins.
default = "system"

# ---------------------------------------------------------------------------
# Card layout
# ---------------------------------------------------------------------------
[layout]
# Tech badges shown on a project card; the rest collapse into "+N".
max_tech_stack = 4

# Highlights listed on a card.
max_highlights = 3

# ---------------------------------------------------------------------------
# Active-section tracking (home page navigation)
# ---------------------------------------------------------------------------
[scroll]
# Quiet period after scroll/resize before the active section is re-derived.
debounce_ms = 50

# A section counts as visible once it intrudes this many pixels into the
# viewport from either edge.
edge_margin = 100.0

# ---------------------------------------------------------------------------
# Preview overlay
# ---------------------------------------------------------------------------
[preview]
# Exit animation length before the overlay is removed.
close_delay_ms = 300

# ---------------------------------------------------------------------------
# Missing images
# ---------------------------------------------------------------------------
[images]
# Placeholder service used when an image is missing.
placeholder_base = "https://placehold.co"

# ---------------------------------------------------------------------------
# Colors - Light mode
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
surface = "#f8fafc"       # Cards, overlay panel
text = "#0f172a"
text_muted = "#64748b"    # Dates, captions, metadata labels
border = "#e2e8f0"
accent = "#3b82f6"        # Links, buttons, active nav item
accent_hover = "#2563eb"

# ---------------------------------------------------------------------------
# Colors - Dark mode
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0b1120"
surface = "#111827"
text = "#e5e7eb"
text_muted = "#94a3b8"
border = "#1f2937"
accent = "#60a5fa"
accent_hover = "#93c5fd"
"##
}

/// Generate CSS custom properties from color config.
///
/// Light values are the base. Dark values apply when the visitor toggled to
/// dark (`data-theme="dark"` on `<html>`) or when no explicit choice was made
/// and the system prefers dark.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
{light}
}}

[data-theme="dark"] {{
{dark}
}}

@media (prefers-color-scheme: dark) {{
    :root:not([data-theme]) {{
{dark_nested}
    }}
}}"#,
        light = colors.light.css_vars("    "),
        dark = colors.dark.css_vars("    "),
        dark_nested = colors.dark.css_vars("        "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_colors() {
        let config = SiteConfig::default();
        assert_eq!(config.colors.light.background, "#ffffff");
        assert_eq!(config.colors.dark.background, "#0b1120");
    }

    #[test]
    fn default_config_mirrors_controller_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.scroll.debounce(), crate::sections::DEFAULT_DEBOUNCE);
        assert_eq!(config.scroll.edge_margin, 100.0);
        assert_eq!(config.preview.close_delay(), crate::preview::DEFAULT_CLOSE_DELAY);
        assert_eq!(config.theme.default, ThemePreference::System);
        assert_eq!(config.assets_dir, "images");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[colors.light]
accent = "#16a34a"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.colors.light.accent, "#16a34a");
        assert_eq!(config.colors.light.text, "#0f172a");
        assert_eq!(config.colors.dark.accent, "#60a5fa");
        assert_eq!(config.layout.max_tech_stack, 4);
    }

    #[test]
    fn parse_theme_preference() {
        let config: SiteConfig = toml::from_str("[theme]\ndefault = \"dark\"\n").unwrap();
        assert_eq!(config.theme.default.forced(), Some(Theme::Dark));
        assert_eq!(ThemePreference::System.forced(), None);
    }

    #[test]
    fn integer_edge_margin_is_accepted() {
        let config: SiteConfig = toml::from_str("[scroll]\nedge_margin = 80\n").unwrap();
        assert_eq!(config.scroll.edge_margin, 80.0);
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.light.accent = "#f0f0f0".to_string();
        colors.dark.accent = "#1a1a1a".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-accent: #f0f0f0;"));
        assert!(css.contains("--color-accent: #1a1a1a;"));
    }

    #[test]
    fn generate_css_covers_toggle_and_system_preference() {
        let css = generate_color_css(&ColorConfig::default());
        assert!(css.contains("[data-theme=\"dark\"]"));
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
        assert!(css.contains(":root:not([data-theme])"));
        for var in [
            "--color-bg:",
            "--color-surface:",
            "--color-text:",
            "--color-text-muted:",
            "--color-border:",
            "--color-accent:",
            "--color-accent-hover:",
        ] {
            assert!(css.contains(var), "{var}");
        }
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.layout.max_highlights, 3);
    }

    #[test]
    fn load_config_reads_fixture() {
        let tmp = crate::test_helpers::setup_fixtures();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.colors.light.accent, "#2563eb");
        assert_eq!(config.layout.max_tech_stack, 3);
        // Unspecified values are defaults
        assert_eq!(config.colors.dark.background, "#0b1120");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[layout]\nmax_tech_stack = 0\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r##"
[colors.light]
background = "#fff"
text = "#000"
"##,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r##"
[colors.light]
background = "#fafafa"
"##,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let light = merged.get("colors").unwrap().get("light").unwrap();
        assert_eq!(light.get("background").unwrap().as_str(), Some("#fafafa"));
        assert_eq!(light.get("text").unwrap().as_str(), Some("#000"));
    }

    #[test]
    fn merge_toml_scalar_replaces_table() {
        let base: toml::Value = toml::from_str("[layout]\nmax_highlights = 3\n").unwrap();
        let overlay: toml::Value = toml::from_str("layout = 1").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("layout").unwrap().as_integer(), Some(1));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[layout]\nmax_tech = 2\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[colors.light]\nbg = \"#fff\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_theme_value_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[theme]\ndefault = \"sepia\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_edge_margin() {
        let mut config = SiteConfig::default();
        config.scroll.edge_margin = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_placeholder() {
        let mut config = SiteConfig::default();
        config.images.placeholder_base = "placehold.co".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_absolute_assets_dir() {
        let mut config = SiteConfig::default();
        config.assets_dir = "/etc".into();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.colors.light.accent, defaults.colors.light.accent);
        assert_eq!(config.colors.dark.surface, defaults.colors.dark.surface);
        assert_eq!(config.layout.max_tech_stack, defaults.layout.max_tech_stack);
        assert_eq!(config.scroll.debounce_ms, defaults.scroll.debounce_ms);
        assert_eq!(config.preview.close_delay_ms, defaults.preview.close_delay_ms);
        assert_eq!(config.images.placeholder_base, defaults.images.placeholder_base);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        for section in ["colors", "theme", "layout", "scroll", "preview", "images"] {
            assert!(val.get(section).is_some(), "{section}");
        }
    }
}
