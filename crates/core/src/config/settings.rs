use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const DEFAULT_EXECUTABLE: &str = "cmake";

const CONFIG_FILE_NAMES: &[&str] = &[".cmake-targets.json", "cmake-targets.json"];

/// User-facing options for the adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ToolConfig {
    /// Appended to the source directory to form the build directory
    pub build_suffix: String,
    /// CMake generator override; empty means CMake's default
    pub generator: String,
    /// CMake binary, a bare name is resolved through `PATH`
    pub executable: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            build_suffix: String::new(),
            generator: String::new(),
            executable: DEFAULT_EXECUTABLE.to_string(),
        }
    }
}

impl ToolConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Walk up from `start_path` looking for a config file
    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    return Some(config_path);
                }
            }

            current = current.parent()?;
        }
    }
}
