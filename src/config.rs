// Desktop configuration, loaded once at startup from a JSON file.
// Every field has a default so a partial (or missing) file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::state::geometry::{Position, Size};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "RETRODESK_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "retrodesk.json";

/// Placement of newly opened windows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CascadeConfig {
    pub origin: Position,
    pub step: i32,
    pub cycle: u32,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            origin: Position::new(60, 40),
            step: 30,
            cycle: 8,
        }
    }
}

/// Window frame metrics used for layout and hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChromeConfig {
    pub title_bar_height: u32,
    pub button_width: u32,
    pub grip_size: u32,
    /// Horizontal and vertical space a restored window leaves free in the viewport
    pub viewport_margin: Size,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            title_bar_height: 16,
            button_width: 24,
            grip_size: 16,
            viewport_margin: Size::new(20, 60),
        }
    }
}

/// Desktop pixels covered by one terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesktopConfig {
    pub taskbar_height: u32,
    pub default_window_size: Size,
    pub min_window_size: Size,
    pub cascade: CascadeConfig,
    pub first_z_index: u32,
    pub drag_threshold: i32,
    pub double_click_ms: u64,
    pub undo_depth: usize,
    pub chrome: ChromeConfig,
    pub cell: CellConfig,
    pub data_dir: PathBuf,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            taskbar_height: 48,
            default_window_size: Size::new(600, 600),
            min_window_size: Size::new(200, 160),
            cascade: CascadeConfig::default(),
            first_z_index: 10,
            drag_threshold: 4,
            double_click_ms: 450,
            undo_depth: 20,
            chrome: ChromeConfig::default(),
            cell: CellConfig::default(),
            data_dir: PathBuf::from(".retrodesk"),
        }
    }
}

impl DesktopConfig {
    /// Parse a config document
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Zero cell sizes would divide by zero when mapping cells to pixels
    fn sanitized(mut self) -> Self {
        self.cell.width = self.cell.width.max(1);
        self.cell.height = self.cell.height.max(1);
        self
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Path named by `RETRODESK_CONFIG`, or `retrodesk.json`
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = DesktopConfig::from_json(
            r#"{ "taskbarHeight": 32, "cascade": { "step": 10 } }"#,
        )
        .unwrap();

        assert_eq!(config.taskbar_height, 32);
        assert_eq!(config.cascade.step, 10);
        assert_eq!(config.cascade.cycle, 8);
        assert_eq!(config.default_window_size, Size::new(600, 600));
        assert_eq!(config.undo_depth, 20);
    }

    #[test]
    fn test_zero_cell_size_is_clamped() {
        let config = DesktopConfig::from_json(r#"{ "cell": { "width": 0, "height": 0 } }"#).unwrap();
        assert_eq!(config.cell, CellConfig { width: 1, height: 1 });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retrodesk.json");
        std::fs::write(&path, r#"{ "cell": { "width": 0 } }"#).unwrap();
        let loaded = DesktopConfig::load(&path).unwrap();
        assert_eq!(loaded.cell.width, 1);
        assert_eq!(loaded.cell.height, 16);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DesktopConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, DesktopConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            DesktopConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
