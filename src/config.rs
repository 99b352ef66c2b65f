use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pixel constants driving the chat window layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub window_width: f32,
    pub start_gap: f32,
    pub end_gap: f32,
    pub between_gap: f32,
    pub hidden_menu_width: f32,
    /// Viewports narrower than this use the single-window compact layout.
    pub small_viewport_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            window_width: 340.0,
            start_gap: 10.0,
            end_gap: 10.0,
            between_gap: 5.0,
            hidden_menu_width: 170.0,
            small_viewport_width: 576.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("window_width", self.window_width),
            ("hidden_menu_width", self.hidden_menu_width),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("start_gap", self.start_gap),
            ("end_gap", self.end_gap),
            ("between_gap", self.between_gap),
            ("small_viewport_width", self.small_viewport_width),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        Ok(())
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn config_path() -> PathBuf {
    home_dir().join(".chat-dock").join("layout.json")
}

pub fn load() -> (LayoutConfig, Vec<String>) {
    load_from(&config_path())
}

/// Reads a layout file, falling back to defaults. Problems are reported as
/// warnings rather than failing startup.
pub fn load_from(path: &Path) -> (LayoutConfig, Vec<String>) {
    let mut warnings = Vec::new();
    if !path.exists() {
        log::debug!("no layout config at {}, using defaults", path.display());
        return (LayoutConfig::default(), warnings);
    }

    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) => {
            warnings.push(format!("failed to read {}: {err}", path.display()));
            return (LayoutConfig::default(), warnings);
        }
    };

    let config: LayoutConfig = match serde_json::from_slice(&data) {
        Ok(config) => config,
        Err(err) => {
            warnings.push(format!("failed to parse {}: {err}", path.display()));
            return (LayoutConfig::default(), warnings);
        }
    };

    if let Err(err) = config.validate() {
        warnings.push(format!("invalid layout config in {}: {err}", path.display()));
        return (LayoutConfig::default(), warnings);
    }

    log::info!("loaded layout config from {}", path.display());
    (config, warnings)
}

pub fn save_to(path: &Path, config: &LayoutConfig) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(config)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;

    fs::write(&tmp_path, bytes)?;
    match fs::rename(&tmp_path, path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if path.exists() {
                fs::remove_file(path)?;
                fs::rename(&tmp_path, path)?;
                Ok(())
            } else {
                Err(rename_err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "chat_dock_config_{prefix}_{}_{}.json",
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn missing_file_yields_defaults_without_warnings() {
        let path = temp_file("missing");
        let (config, warnings) = load_from(&path);
        assert_eq!(config, LayoutConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn partial_file_keeps_defaults_for_absent_fields() {
        let path = temp_file("partial");
        fs::write(&path, r#"{ "window_width": 300.0 }"#).expect("fixture should write");

        let (config, warnings) = load_from(&path);
        assert!(warnings.is_empty());
        assert_eq!(config.window_width, 300.0);
        assert_eq!(config.hidden_menu_width, 170.0);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_file_falls_back_with_warning() {
        let path = temp_file("malformed");
        fs::write(&path, "{ not json").expect("fixture should write");

        let (config, warnings) = load_from(&path);
        assert_eq!(config, LayoutConfig::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("failed to parse"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let path = temp_file("invalid");
        fs::write(&path, r#"{ "window_width": 0.0 }"#).expect("fixture should write");

        let (config, warnings) = load_from(&path);
        assert_eq!(config, LayoutConfig::default());
        assert!(warnings[0].contains("window_width must be greater than zero"));

        let negative = LayoutConfig {
            between_gap: -1.0,
            ..LayoutConfig::default()
        };
        assert_eq!(
            negative.validate(),
            Err(ConfigError::Negative {
                field: "between_gap",
                value: -1.0
            })
        );

        let _ = fs::remove_file(path);
    }

    #[test]
    fn saved_config_reloads() {
        let path = temp_file("saved");
        let config = LayoutConfig {
            hidden_menu_width: 200.0,
            ..LayoutConfig::default()
        };
        save_to(&path, &config).expect("config should save");

        let (reloaded, warnings) = load_from(&path);
        assert!(warnings.is_empty());
        assert_eq!(reloaded, config);

        let _ = fs::remove_file(path);
    }
}
