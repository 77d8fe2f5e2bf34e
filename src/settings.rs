//! Loading of the analyzer settings document.
//!
//! The format follows the file extension. A missing file is not an error
//! (`Ok(None)`); anything else that goes wrong is reported as a
//! `SettingsError` and the caller decides whether to continue without
//! settings.

use crate::error::SettingsError;
use crate::models::settings::AnalyzerSettings;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load and validate settings from `path`.
pub fn load_settings(path: &Path) -> Result<Option<AnalyzerSettings>, SettingsError> {
    if !path.exists() {
        debug!("no settings file at {}", path.display());
        return Ok(None);
    }
    let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let parse_err = |format: &'static str, message: String| SettingsError::Parse {
        path: path.to_path_buf(),
        format,
        message,
    };
    let settings: AnalyzerSettings = match ext.as_str() {
        "toml" => toml::from_str(&text).map_err(|e| parse_err("TOML", e.to_string()))?,
        "yaml" | "yml" => {
            // An empty YAML document deserializes to unit, not a map.
            if text.trim().is_empty() {
                AnalyzerSettings::default()
            } else {
                serde_yaml::from_str(&text).map_err(|e| parse_err("YAML", e.to_string()))?
            }
        }
        "json" => serde_json::from_str(&text).map_err(|e| parse_err("JSON", e.to_string()))?,
        _ => {
            return Err(SettingsError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };
    settings.validate().map_err(SettingsError::Invalid)?;
    debug!(
        "loaded settings from {} ({} included, {} excluded rules)",
        path.display(),
        settings.include_rules.len(),
        settings.exclude_rules.len()
    );
    Ok(Some(settings))
}
