use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cursor::DEFAULT_TAB_WIDTH;
use crate::error::{EditorError, Result};

pub const MAX_TAB_WIDTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tab_width: usize,
    // ステータス行で `列 - 行` を表示する列 (1-based)
    pub ruler_column: u16,
    pub log_file: Option<PathBuf>,
    pub sync_system_clipboard: bool,
}

fn default_log_file() -> Option<PathBuf> {
    // debug build でのみデフォルトでログを取る
    if cfg!(debug_assertions) {
        Some(PathBuf::from("tinyvi.log"))
    } else {
        None
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            ruler_column: 50,
            log_file: default_log_file(),
            sync_system_clipboard: false,
        }
    }
}

impl Config {
    // `~/.config/tinyvi/config.toml`
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("tinyvi");
            path.push("config.toml");
            path
        })
    }

    // 明示されたファイルが無いのはエラー。デフォルトの場所に無ければ既定値
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents).map_err(|source| EditorError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_TAB_WIDTH).contains(&self.tab_width) {
            return Err(EditorError::InvalidConfig(format!(
                "tab_width must be between 1 and {MAX_TAB_WIDTH}"
            )));
        }
        if self.ruler_column == 0 {
            return Err(EditorError::InvalidConfig(
                "ruler_column must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
